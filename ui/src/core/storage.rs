//! Session-scoped key/value persistence.
//!
//! Values live as long as the browser tab (web `sessionStorage`) or the
//! process (desktop, tests). Stores are shared handles with interior
//! mutability so the participation gate and the views can hold clones.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub type SharedSession = Arc<dyn SessionStore + Send + Sync>;

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .map(|values| values.get(key).cloned())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

/// `window.sessionStorage`; silently degrades to "nothing stored" when the
/// browser denies access (private mode, sandboxed frames).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStore;

#[cfg(target_arch = "wasm32")]
impl BrowserSessionStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.session_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "sessionStorage write rejected");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            storage.remove_item(key).ok();
        }
    }
}

/// Store appropriate for the running platform.
pub fn platform_session() -> SharedSession {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(BrowserSessionStore)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(MemorySessionStore::new())
    }
}
