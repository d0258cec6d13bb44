use crate::error::{Result, TrdError};
use serde::Serialize;

// ---------------------------------------------------------------------------
// TrdSection
// ---------------------------------------------------------------------------

/// A selectable section of a Technical Requirements Document.
///
/// The catalog is defined by the service and never mutated by clients;
/// its order is the order sections appear in a generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrdSection {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const CATALOG: &[TrdSection] = &[
    TrdSection {
        key: "executive_summary",
        title: "Executive Summary",
        description: "High-level summary of the initiative, its drivers, and expected outcomes.",
    },
    TrdSection {
        key: "project_overview",
        title: "Project Overview",
        description: "Background, stakeholders, and the business context of the project.",
    },
    TrdSection {
        key: "scope",
        title: "Scope",
        description: "What is in and out of scope for the delivery.",
    },
    TrdSection {
        key: "functional_requirements",
        title: "Functional Requirements",
        description: "Capabilities the system must provide, stated as testable requirements.",
    },
    TrdSection {
        key: "non_functional_requirements",
        title: "Non-Functional Requirements",
        description: "Performance, availability, security, and compliance constraints.",
    },
    TrdSection {
        key: "data_requirements",
        title: "Data Requirements",
        description: "Entities, data flows, retention, and quality expectations.",
    },
    TrdSection {
        key: "integration_requirements",
        title: "Integration Requirements",
        description: "External systems, interfaces, and exchange formats involved.",
    },
    TrdSection {
        key: "assumptions_and_constraints",
        title: "Assumptions and Constraints",
        description: "Conditions taken as given and limits the solution must respect.",
    },
    TrdSection {
        key: "acceptance_criteria",
        title: "Acceptance Criteria",
        description: "Conditions under which the delivery is considered complete.",
    },
    TrdSection {
        key: "glossary",
        title: "Glossary",
        description: "Domain terms and abbreviations used throughout the document.",
    },
];

/// The full ordered section catalog.
pub fn catalog() -> &'static [TrdSection] {
    CATALOG
}

/// Look up a section by key.
pub fn find(key: &str) -> Option<&'static TrdSection> {
    CATALOG.iter().find(|s| s.key == key)
}

/// Validate a client-supplied list of section keys, returning the matched
/// sections in catalog order (not request order). Duplicates collapse.
pub fn resolve_keys(keys: &[String]) -> Result<Vec<&'static TrdSection>> {
    for key in keys {
        if find(key).is_none() {
            return Err(TrdError::UnknownSection(key.clone()));
        }
    }
    Ok(CATALOG
        .iter()
        .filter(|s| keys.iter().any(|k| k == s.key))
        .collect())
}
