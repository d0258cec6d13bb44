use crate::output::print_json;
use trd_core::config::Config;
use trd_core::generation::{self, GenerationRequest};
use trd_core::vector::VectorIndex;
use trd_core::embedding;
use std::path::Path;

pub fn run(
    root: &Path,
    project_id: &str,
    document_ids: Vec<String>,
    text_input_ids: Vec<String>,
    sections: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let embedder = embedding::from_config(&config)?;
    let writer = generation::writer_from_config(&config)?;
    let index = VectorIndex::open(root)?;

    let request = GenerationRequest {
        project_id: project_id.to_string(),
        document_ids,
        text_input_ids,
        // No --section flags means all sections.
        selected_sections: if sections.is_empty() {
            None
        } else {
            Some(sections)
        },
    };

    let analysis = generation::run_generation(
        root,
        &index,
        embedder.as_ref(),
        writer.as_ref(),
        &config,
        &request,
    )?;

    if json {
        print_json(&analysis)?;
        return Ok(());
    }

    println!("{} [{}] {}", analysis.id, analysis.status, analysis.title);
    if let Some(sections) = analysis.results.get("sections").and_then(|s| s.as_array()) {
        for section in sections {
            if let Some(title) = section.get("title").and_then(|t| t.as_str()) {
                println!("  - {title}");
            }
        }
    }
    if let Some(message) = analysis.results.get("message").and_then(|m| m.as_str()) {
        println!("  error: {message}");
    }
    Ok(())
}
