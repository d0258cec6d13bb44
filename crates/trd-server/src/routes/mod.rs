pub mod analyses;
pub mod analyze;
pub mod approvals;
pub mod documents;
pub mod generate;
pub mod health;
pub mod projects;
pub mod search;
pub mod sections;
pub mod text_inputs;
