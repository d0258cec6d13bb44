use crate::error::{Result, TrdError};
use crate::io;
use crate::paths;
use crate::types::AnalysisStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// A stored generation result. `results` carries the section payload:
/// `{ "sections": [ { key, title, content, sources }, ... ] }` on success,
/// or `{ "message": ... }` when generation failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    pub results: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// Listing row without the heavy `original_text`/`results` payloads.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub status: AnalysisStatus,
    pub project_id: Option<String>,
    pub document_id: Option<String>,
    pub user_email: Option<String>,
}

impl Analysis {
    pub fn save(&self, root: &Path) -> Result<()> {
        paths::validate_id(&self.id)?;
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::analysis_path(root, &self.id), data.as_bytes())
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let path = paths::analysis_path(root, id);
        if !path.exists() {
            return Err(TrdError::AnalysisNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Paginated summaries, newest first. Full payloads are deliberately not
    /// loaded here; callers wanting `results` fetch by id.
    pub fn list(root: &Path, limit: usize, offset: usize) -> Result<Vec<AnalysisSummary>> {
        let mut all: Vec<Analysis> = Vec::new();
        for path in io::list_yaml_files(&root.join(paths::ANALYSES_DIR))? {
            let data = std::fs::read_to_string(&path)?;
            all.push(serde_yaml::from_str(&data)?);
        }
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|a| AnalysisSummary {
                id: a.id,
                title: a.title,
                date: a.date,
                status: a.status,
                project_id: a.project_id,
                document_id: a.document_id,
                user_email: a.user_email,
            })
            .collect())
    }
}
