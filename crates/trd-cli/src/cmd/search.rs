use crate::output::{preview, print_json, print_table};
use trd_core::config::Config;
use trd_core::embedding;
use trd_core::vector::VectorIndex;
use std::path::Path;

pub fn run(
    root: &Path,
    query: &str,
    lob: Option<&str>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let embedder = embedding::from_config(&config)?;
    let index = VectorIndex::open(root)?;

    let hits = index.search(embedder.as_ref(), query, lob, limit)?;

    if json {
        print_json(&hits)?;
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    let rows = hits
        .iter()
        .map(|h| {
            vec![
                format!("{:.3}", h.score),
                h.document_name.clone(),
                h.lob.clone(),
                preview(&h.content, 60),
            ]
        })
        .collect();
    print_table(&["SCORE", "DOCUMENT", "LOB", "CONTENT"], rows);
    Ok(())
}
