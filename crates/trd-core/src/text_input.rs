use crate::error::{Result, TrdError};
use crate::io;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ad hoc text supplied by a caller without an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TextInput {
    pub fn new(id: impl Into<String>, title: Option<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn create(root: &Path, input: TextInput) -> Result<TextInput> {
        paths::validate_id(&input.id)?;
        input.save(root)?;
        Ok(input)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let path = paths::text_input_path(root, id);
        if !path.exists() {
            return Err(TrdError::TextInputNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut inputs: Vec<TextInput> = Vec::new();
        for path in io::list_yaml_files(&root.join(paths::TEXT_INPUTS_DIR))? {
            let data = std::fs::read_to_string(&path)?;
            inputs.push(serde_yaml::from_str(&data)?);
        }
        inputs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inputs)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::text_input_path(root, &self.id), data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let input = TextInput::new("ti-1", Some("notes".into()), "requirement sketch");
        TextInput::create(dir.path(), input).unwrap();
        let loaded = TextInput::load(dir.path(), "ti-1").unwrap();
        assert_eq!(loaded.content, "requirement sketch");
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            TextInput::load(dir.path(), "ghost"),
            Err(TrdError::TextInputNotFound(_))
        ));
    }
}
