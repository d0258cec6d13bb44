use crate::error::{Result, TrdError};
use crate::io;
use crate::paths;
use crate::types::DocumentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An uploaded source document. Content is stored inline; the vector index
/// holds the chunked, embedded form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default = "default_user")]
    pub user_email: String,
    pub name: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    pub status: DocumentStatus,
}

fn default_user() -> String {
    "guest".to_string()
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, file_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_email: default_user(),
            name: name.into(),
            file_type: file_type.into(),
            upload_date: Utc::now(),
            file_path: None,
            content: content.into(),
            meta: None,
            status: DocumentStatus::Uploaded,
        }
    }

    pub fn create(root: &Path, doc: Document) -> Result<Document> {
        paths::validate_id(&doc.id)?;
        if paths::document_path(root, &doc.id).exists() {
            return Err(TrdError::DocumentExists(doc.id));
        }
        doc.save(root)?;
        Ok(doc)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let path = paths::document_path(root, id);
        if !path.exists() {
            return Err(TrdError::DocumentNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// All documents, newest upload first.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut docs: Vec<Document> = Vec::new();
        for path in io::list_yaml_files(&root.join(paths::DOCUMENTS_DIR))? {
            let data = std::fs::read_to_string(&path)?;
            docs.push(serde_yaml::from_str(&data)?);
        }
        docs.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(docs)
    }

    pub fn exists_by_name(root: &Path, name: &str) -> Result<bool> {
        Ok(Self::list(root)?.iter().any(|d| d.name == name))
    }

    pub fn set_status(root: &Path, id: &str, status: DocumentStatus) -> Result<Self> {
        let mut doc = Self::load(root, id)?;
        doc.status = status;
        doc.save(root)?;
        Ok(doc)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::document_path(root, &self.id), data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let doc = Document::new("doc-1", "policy.txt", "txt", "coverage terms");
        Document::create(dir.path(), doc).unwrap();

        let loaded = Document::load(dir.path(), "doc-1").unwrap();
        assert_eq!(loaded.name, "policy.txt");
        assert_eq!(loaded.status, DocumentStatus::Uploaded);
        assert_eq!(loaded.user_email, "guest");
    }

    #[test]
    fn duplicate_id_is_conflict() {
        let dir = TempDir::new().unwrap();
        Document::create(dir.path(), Document::new("doc-1", "a.txt", "txt", "a")).unwrap();
        assert!(matches!(
            Document::create(dir.path(), Document::new("doc-1", "b.txt", "txt", "b")),
            Err(TrdError::DocumentExists(_))
        ));
    }

    #[test]
    fn exists_by_name_checks_listing() {
        let dir = TempDir::new().unwrap();
        Document::create(dir.path(), Document::new("doc-1", "a.txt", "txt", "a")).unwrap();
        assert!(Document::exists_by_name(dir.path(), "a.txt").unwrap());
        assert!(!Document::exists_by_name(dir.path(), "missing.txt").unwrap());
    }

    #[test]
    fn set_status_persists() {
        let dir = TempDir::new().unwrap();
        Document::create(dir.path(), Document::new("doc-1", "a.txt", "txt", "a")).unwrap();
        Document::set_status(dir.path(), "doc-1", DocumentStatus::Indexed).unwrap();
        let loaded = Document::load(dir.path(), "doc-1").unwrap();
        assert_eq!(loaded.status, DocumentStatus::Indexed);
    }
}
