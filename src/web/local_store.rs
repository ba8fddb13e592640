use web_sys::{Storage, Window};

use crate::capability::Store;
use crate::error::{GameError, GameResult};
use crate::highscores::{ScoreEntry, decode_scores, encode_scores};

/// High scores in `localStorage` under a single key.
pub struct LocalStore {
    storage: Option<Storage>,
    key: String,
}

impl LocalStore {
    /// Private browsing modes may deny storage; reads and writes then fail
    /// with [`GameError::StoreUnavailable`].
    pub fn new(window: &Window, key: &str) -> Self {
        Self { storage: window.local_storage().ok().flatten(), key: key.to_string() }
    }

    fn storage(&self) -> GameResult<&Storage> {
        self.storage.as_ref().ok_or_else(|| GameError::StoreUnavailable("localStorage unavailable".into()))
    }
}

fn js_err(err: wasm_bindgen::JsValue) -> GameError { GameError::StoreUnavailable(format!("{err:?}")) }

impl Store for LocalStore {
    fn load_high_scores(&self) -> GameResult<Vec<ScoreEntry>> {
        let blob = self.storage()?.get_item(&self.key).map_err(js_err)?;
        decode_scores(blob.as_deref())
    }

    fn save_high_scores(&mut self, entries: &[ScoreEntry]) -> GameResult<()> {
        let blob = encode_scores(entries)?;
        self.storage()?.set_item(&self.key, &blob).map_err(js_err)
    }
}
