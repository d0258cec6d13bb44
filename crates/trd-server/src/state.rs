use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state passed to all route handlers. Handlers load
/// domain state from disk per request. The per-record YAML stores tolerate
/// concurrent writers (one file per record), but the vector index is a single
/// JSON file, so every read-modify-write cycle on it must hold `index_lock`
/// or two concurrent uploads would each persist a copy missing the other's
/// rows.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub index_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            index_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
    }
}
