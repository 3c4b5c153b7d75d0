//! Favorites persistence - one JSON file holding the ordered name list

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("pokesearch").join("favorites.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted list. A missing file is the empty list.
    pub async fn load(&self) -> Result<Vec<String>, String> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(format!("Failed to read favorites: {e}")),
        };
        serde_json::from_str(&json).map_err(|e| format!("Favorites file corrupted: {e}"))
    }

    /// Rewrite the whole list. Called after every mutation.
    pub async fn save(&self, names: &[String]) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create favorites directory: {e}"))?;
        }
        let json = serde_json::to_string_pretty(names)
            .map_err(|e| format!("Failed to serialize favorites: {e}"))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| format!("Failed to write favorites: {e}"))
    }
}

static STORE: OnceLock<FavoritesStore> = OnceLock::new();

/// Pin the process-wide store to a path. Later calls are ignored.
pub fn init_store(path: PathBuf) -> &'static FavoritesStore {
    let _ = STORE.set(FavoritesStore::new(path));
    store()
}

pub fn store() -> &'static FavoritesStore {
    STORE.get_or_init(|| FavoritesStore::new(FavoritesStore::default_path()))
}
