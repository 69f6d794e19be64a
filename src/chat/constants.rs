pub const WELCOME_MESSAGE_ID: u64 = 1;

/// Largest id accepted from stored history, the largest integer a JavaScript number holds exactly.
pub const MAX_MESSAGE_ID: u64 = (1 << 53) - 1;

pub const WELCOME_TEXT: &str = "Hello! I am a highly responsible and helpful AI assistant powered by KOS. Ask me anything, and I'll do my best to provide you with an accurate and complete answer.";

pub const SYSTEM_PROMPT: &str = "You are a highly responsible, knowledgeable, and helpful AI chatbot for KOS food delivery platform. Your primary goal is to provide accurate, informative, and complete answers to every question the user asks. Always maintain a professional and friendly tone. Help users with food orders, delivery questions, restaurant information, and any other queries related to the food delivery service.";

/// Session storage key holding the serialized message sequence.
pub const HISTORY_STORAGE_KEY: &str = "kosChatHistory";

pub const MAX_SOURCES: usize = 3;

pub const PROCESSING_ERROR_TEXT: &str =
    "Sorry, I encountered an error while processing your request.";
pub const CONNECTION_ERROR_TEXT: &str =
    "Error: Could not connect to the service. Please check your connection and try again.";
pub const UNEXPECTED_API_ERROR_TEXT: &str = "An unexpected API error occurred.";

pub const API_KEY_ENV_VAR: &str = "KOS_GEMINI_API_KEY";
pub const MODEL_ENV_VAR: &str = "KOS_GEMINI_MODEL";
pub const API_BASE_ENV_VAR: &str = "KOS_GEMINI_API_BASE";
