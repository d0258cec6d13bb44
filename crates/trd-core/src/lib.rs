pub mod analysis;
pub mod approval;
pub mod chunker;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod ingest;
pub mod io;
pub mod paths;
pub mod project;
pub mod section;
pub mod text_input;
pub mod types;
pub mod vector;
pub mod workspace;

pub use error::{Result, TrdError};
