//! Browser LocalStorage backend

use crate::persistence::{KeyValueStore, PersistError};

/// `KeyValueStore` over `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the page's LocalStorage, `None` if unavailable (private mode etc.)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> PersistError {
    PersistError::Storage(format!("{e:?}"))
}

impl KeyValueStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}
