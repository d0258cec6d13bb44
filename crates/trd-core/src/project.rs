use crate::error::{Result, TrdError};
use crate::io;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Owner of documents and generated analyses. Generation requests are
/// validated against this store before anything runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Line of business used to scope vector retrieval for this project.
    pub lob: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lob: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lob: lob.into(),
            created_at: Utc::now(),
        }
    }

    pub fn create(
        root: &Path,
        id: impl Into<String>,
        name: impl Into<String>,
        lob: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        paths::validate_id(&id)?;
        if paths::project_path(root, &id).exists() {
            return Err(TrdError::ProjectExists(id));
        }
        let project = Self::new(id, name, lob);
        project.save(root)?;
        Ok(project)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let path = paths::project_path(root, id);
        if !path.exists() {
            return Err(TrdError::ProjectNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut projects = Vec::new();
        for path in io::list_yaml_files(&root.join(paths::PROJECTS_DIR))? {
            let data = std::fs::read_to_string(&path)?;
            projects.push(serde_yaml::from_str(&data)?);
        }
        Ok(projects)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::project_path(root, &self.id), data.as_bytes())
    }
}
