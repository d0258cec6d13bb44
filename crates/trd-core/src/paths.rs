use crate::error::{Result, TrdError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TRD_DIR: &str = ".trd";
pub const PROJECTS_DIR: &str = ".trd/projects";
pub const DOCUMENTS_DIR: &str = ".trd/documents";
pub const TEXT_INPUTS_DIR: &str = ".trd/text_inputs";
pub const ANALYSES_DIR: &str = ".trd/analyses";
pub const APPROVALS_DIR: &str = ".trd/approvals";
pub const INDEX_DIR: &str = ".trd/index";

pub const CONFIG_FILE: &str = ".trd/config.yaml";
pub const VECTORS_FILE: &str = ".trd/index/vectors.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn trd_dir(root: &Path) -> PathBuf {
    root.join(TRD_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn project_path(root: &Path, id: &str) -> PathBuf {
    root.join(PROJECTS_DIR).join(format!("{id}.yaml"))
}

pub fn document_path(root: &Path, id: &str) -> PathBuf {
    root.join(DOCUMENTS_DIR).join(format!("{id}.yaml"))
}

pub fn text_input_path(root: &Path, id: &str) -> PathBuf {
    root.join(TEXT_INPUTS_DIR).join(format!("{id}.yaml"))
}

pub fn analysis_path(root: &Path, id: &str) -> PathBuf {
    root.join(ANALYSES_DIR).join(format!("{id}.yaml"))
}

pub fn approval_path(root: &Path, id: &str) -> PathBuf {
    root.join(APPROVALS_DIR).join(format!("{id}.yaml"))
}

pub fn vectors_path(root: &Path) -> PathBuf {
    root.join(VECTORS_FILE)
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Validate a record id. UUIDs and hand-picked slugs both satisfy this;
/// anything with spaces, uppercase, or path separators does not.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(TrdError::InvalidId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
