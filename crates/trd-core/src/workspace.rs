use crate::config::Config;
use crate::error::Result;
use crate::io;
use crate::paths;
use std::path::Path;

/// Initialize the `.trd/` layout under `root`. Idempotent: an existing
/// config is left untouched. Returns true if a fresh config was written.
pub fn init(root: &Path, name: &str) -> Result<bool> {
    io::ensure_dir(&root.join(paths::PROJECTS_DIR))?;
    io::ensure_dir(&root.join(paths::DOCUMENTS_DIR))?;
    io::ensure_dir(&root.join(paths::TEXT_INPUTS_DIR))?;
    io::ensure_dir(&root.join(paths::ANALYSES_DIR))?;
    io::ensure_dir(&root.join(paths::APPROVALS_DIR))?;
    io::ensure_dir(&root.join(paths::INDEX_DIR))?;

    let config_path = paths::config_path(root);
    if config_path.exists() {
        return Ok(false);
    }
    Config::new(name).save(root)?;
    Ok(true)
}

pub fn is_initialized(root: &Path) -> bool {
    paths::config_path(root).exists()
}
