use std::collections::HashMap;
use std::sync::Mutex;

use crate::chat::error::ChatResult;
#[cfg(any(not(target_arch = "wasm32"), all(target_arch = "wasm32", feature = "wasm-web")))]
use crate::chat::error::storage_error;

/// Session-scoped string key/value store holding the chat history.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> ChatResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ChatResult<()>;
    fn remove(&self, key: &str) -> ChatResult<()>;
}

/// Storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get(&self, key: &str) -> ChatResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ChatResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ChatResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSessionStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{storage_error, ChatResult, SessionStorage};

    /// Keeps one `<key>.json` file per entry under a directory, e.g. a per-session temp dir.
    #[derive(Clone, Debug)]
    pub struct FileSessionStorage {
        dir: PathBuf,
    }

    impl FileSessionStorage {
        pub fn new(dir: impl AsRef<Path>) -> Self {
            Self {
                dir: dir.as_ref().to_path_buf(),
            }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> PathBuf {
            let file_name: String = key
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            self.dir.join(format!("{file_name}.json"))
        }
    }

    impl SessionStorage for FileSessionStorage {
        fn get(&self, key: &str) -> ChatResult<Option<String>> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(contents) if contents.is_empty() => Ok(None),
                Ok(contents) => Ok(Some(contents)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(storage_error(format!(
                    "Failed to read session file for '{key}': {err}"
                ))),
            }
        }

        fn set(&self, key: &str, value: &str) -> ChatResult<()> {
            fs::create_dir_all(&self.dir).map_err(|err| {
                storage_error(format!("Failed to create session directory: {err}"))
            })?;
            fs::write(self.path_for(key), value).map_err(|err| {
                storage_error(format!("Failed to write session file for '{key}': {err}"))
            })
        }

        fn remove(&self, key: &str) -> ChatResult<()> {
            match fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(storage_error(format!(
                    "Failed to remove session file for '{key}': {err}"
                ))),
            }
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub use web::WebSessionStorage;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
mod web {
    use wasm_bindgen::JsValue;
    use web_sys::Storage;

    use super::{storage_error, ChatResult, SessionStorage};
    use crate::chat::error::ChatError;

    /// The browser's `window.sessionStorage`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WebSessionStorage;

    impl WebSessionStorage {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> ChatResult<Storage> {
            let window = web_sys::window()
                .ok_or_else(|| storage_error("window object is not available in this environment"))?;
            window
                .session_storage()
                .map_err(map_js_error)?
                .ok_or_else(|| storage_error("sessionStorage is unavailable"))
        }
    }

    impl SessionStorage for WebSessionStorage {
        fn get(&self, key: &str) -> ChatResult<Option<String>> {
            Self::storage()?.get_item(key).map_err(map_js_error)
        }

        fn set(&self, key: &str, value: &str) -> ChatResult<()> {
            Self::storage()?.set_item(key, value).map_err(map_js_error)
        }

        fn remove(&self, key: &str) -> ChatResult<()> {
            Self::storage()?.remove_item(key).map_err(map_js_error)
        }
    }

    fn map_js_error(err: JsValue) -> ChatError {
        let detail = err
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(&err)
                    .ok()
                    .and_then(|value| value.as_string())
            })
            .unwrap_or_else(|| format!("{err:?}"));
        storage_error(format!("Web storage error: {detail}"))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("kos-chat-test-{}-{}", name, std::process::id()));
        path
    }

    #[test]
    fn in_memory_roundtrip() {
        let storage = InMemorySessionStorage::new();
        assert_eq!(storage.get("kosChatHistory").unwrap(), None);
        storage.set("kosChatHistory", "[]").unwrap();
        assert_eq!(storage.get("kosChatHistory").unwrap().as_deref(), Some("[]"));
        storage.remove("kosChatHistory").unwrap();
        assert_eq!(storage.get("kosChatHistory").unwrap(), None);
    }

    #[test]
    fn file_roundtrip_with_scoped_keys() {
        let dir = temp_dir("roundtrip");
        let storage = FileSessionStorage::new(&dir);

        storage.set("kosChatHistory:alice", "[1]").unwrap();
        storage.set("kosChatHistory:bob", "[2]").unwrap();
        assert_eq!(
            storage.get("kosChatHistory:alice").unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(storage.get("kosChatHistory:bob").unwrap().as_deref(), Some("[2]"));

        storage.remove("kosChatHistory:alice").unwrap();
        storage.remove("kosChatHistory:alice").unwrap();
        assert_eq!(storage.get("kosChatHistory:alice").unwrap(), None);

        let _ = std::fs::remove_dir_all(dir);
    }
}
