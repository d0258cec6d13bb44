use crate::analysis::Analysis;
use crate::error::{Result, TrdError};
use crate::io;
use crate::paths;
use crate::types::ApprovalStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Approval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub id: String,
    pub analysis_id: String,
    pub status: ApprovalStatus,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_summary: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_response: Option<String>,
}

impl Approval {
    /// Open a pending approval for an existing analysis.
    pub fn create(
        root: &Path,
        analysis_id: &str,
        approver_email: Option<String>,
    ) -> Result<Self> {
        let analysis = Analysis::load(root, analysis_id)?;
        let now = Utc::now();
        let approval = Self {
            id: uuid::Uuid::new_v4().to_string(),
            analysis_id: analysis.id,
            status: ApprovalStatus::Pending,
            created_date: now,
            updated_date: now,
            approver_email,
            results_summary: Some(serde_json::json!({
                "title": analysis.title,
                "status": analysis.status,
            })),
            approver_response: None,
        };
        approval.save(root)?;
        Ok(approval)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let path = paths::approval_path(root, id);
        if !path.exists() {
            return Err(TrdError::ApprovalNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut approvals: Vec<Approval> = Vec::new();
        for path in io::list_yaml_files(&root.join(paths::APPROVALS_DIR))? {
            let data = std::fs::read_to_string(&path)?;
            approvals.push(serde_yaml::from_str(&data)?);
        }
        approvals.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(approvals)
    }

    /// Record a decision. Only a pending approval can be decided; deciding an
    /// already-decided approval is a conflict.
    pub fn decide(
        root: &Path,
        id: &str,
        status: ApprovalStatus,
        approver_response: Option<String>,
    ) -> Result<Self> {
        if status == ApprovalStatus::Pending {
            return Err(TrdError::InvalidRequest(
                "decision must be 'approved' or 'rejected'".into(),
            ));
        }
        let mut approval = Self::load(root, id)?;
        if approval.status != ApprovalStatus::Pending {
            return Err(TrdError::ApprovalDecided(id.to_string()));
        }
        approval.status = status;
        approval.updated_date = Utc::now();
        approval.approver_response = approver_response;
        approval.save(root)?;
        Ok(approval)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::approval_path(root, &self.id), data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisStatus;
    use tempfile::TempDir;

    fn seed_analysis(root: &Path) -> String {
        let analysis = Analysis {
            id: "an-1".into(),
            title: "TRD".into(),
            date: Utc::now(),
            status: AnalysisStatus::Completed,
            original_text: None,
            results: serde_json::json!({ "sections": [] }),
            project_id: None,
            document_id: None,
            user_email: None,
        };
        analysis.save(root).unwrap();
        analysis.id
    }

    #[test]
    fn create_requires_existing_analysis() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Approval::create(dir.path(), "ghost", None),
            Err(TrdError::AnalysisNotFound(_))
        ));
    }

    #[test]
    fn create_then_decide() {
        let dir = TempDir::new().unwrap();
        let analysis_id = seed_analysis(dir.path());
        let approval = Approval::create(dir.path(), &analysis_id, Some("lead@example.com".into())).unwrap();
        assert_eq!(approval.status, ApprovalStatus::Pending);

        let decided = Approval::decide(
            dir.path(),
            &approval.id,
            ApprovalStatus::Approved,
            Some("looks complete".into()),
        )
        .unwrap();
        assert_eq!(decided.status, ApprovalStatus::Approved);
        assert!(decided.updated_date >= decided.created_date);
    }

    #[test]
    fn deciding_twice_is_conflict() {
        let dir = TempDir::new().unwrap();
        let analysis_id = seed_analysis(dir.path());
        let approval = Approval::create(dir.path(), &analysis_id, None).unwrap();
        Approval::decide(dir.path(), &approval.id, ApprovalStatus::Rejected, None).unwrap();
        assert!(matches!(
            Approval::decide(dir.path(), &approval.id, ApprovalStatus::Approved, None),
            Err(TrdError::ApprovalDecided(_))
        ));
    }

    #[test]
    fn pending_is_not_a_decision() {
        let dir = TempDir::new().unwrap();
        let analysis_id = seed_analysis(dir.path());
        let approval = Approval::create(dir.path(), &analysis_id, None).unwrap();
        assert!(matches!(
            Approval::decide(dir.path(), &approval.id, ApprovalStatus::Pending, None),
            Err(TrdError::InvalidRequest(_))
        ));
    }
}
