/// Default Gemini REST base, including the trailing `models/` segment.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Operation appended to the model path.
pub const GENERATE_CONTENT_OPERATION: &str = "generateContent";

pub const ROLE_USER: &str = "user";
pub const ROLE_MODEL: &str = "model";
