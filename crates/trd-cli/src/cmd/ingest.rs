use crate::output::print_json;
use trd_core::config::Config;
use trd_core::vector::VectorIndex;
use trd_core::{embedding, ingest};
use std::path::Path;

/// Walk a folder of `.txt`/`.md` files and index each as a document.
pub fn run(root: &Path, dir: &Path, lob: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let lob = lob
        .map(|l| l.to_string())
        .unwrap_or_else(|| config.project.default_lob.clone());

    let embedder = embedding::from_config(&config)?;
    let mut index = VectorIndex::open(root)?;

    let (docs, chunks) =
        ingest::ingest_dir(root, &mut index, embedder.as_ref(), &config, dir, &lob)?;

    if json {
        print_json(&serde_json::json!({
            "documents": docs,
            "chunks": chunks,
            "lob": lob,
        }))?;
    } else {
        println!("Indexed {docs} document(s), {chunks} chunk(s) [lob: {lob}]");
    }
    Ok(())
}
