use crate::analysis::Analysis;
use crate::config::{Config, WriterProvider};
use crate::document::Document;
use crate::embedding::Embedder;
use crate::error::{Result, TrdError};
use crate::project::Project;
use crate::section::{self, TrdSection};
use crate::text_input::TextInput;
use crate::types::AnalysisStatus;
use crate::vector::{SearchHit, VectorIndex};
use chrono::Utc;
use serde::Deserialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// A request to produce a TRD for a project from stored documents and
/// ad hoc text inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub project_id: String,
    #[serde(default)]
    pub document_ids: Vec<String>,
    #[serde(default)]
    pub text_input_ids: Vec<String>,
    /// `None` means every catalog section. `Some([])` is rejected: a request
    /// that names zero sections has nothing to generate.
    #[serde(default)]
    pub selected_sections: Option<Vec<String>>,
}

impl GenerationRequest {
    /// Resolve and validate the request against stored state. Returns the
    /// owning project and the sections to produce, in catalog order.
    pub fn resolve(&self, root: &Path) -> Result<(Project, Vec<&'static TrdSection>)> {
        let project = Project::load(root, &self.project_id)?;

        for id in &self.document_ids {
            Document::load(root, id)?;
        }
        for id in &self.text_input_ids {
            TextInput::load(root, id)?;
        }

        let sections = match &self.selected_sections {
            None => section::catalog().iter().collect(),
            Some(keys) if keys.is_empty() => return Err(TrdError::EmptySectionSelection),
            Some(keys) => section::resolve_keys(keys)?,
        };
        Ok((project, sections))
    }
}

// ---------------------------------------------------------------------------
// SectionWriter
// ---------------------------------------------------------------------------

/// Produces the body text of one section from retrieved chunks and any
/// ad hoc notes attached to the request.
pub trait SectionWriter: Send + Sync {
    fn write_section(
        &self,
        section: &TrdSection,
        hits: &[SearchHit],
        notes: &[String],
    ) -> Result<String>;
}

/// Build the writer named by the config.
pub fn writer_from_config(config: &Config) -> Result<Box<dyn SectionWriter>> {
    match config.generation.provider {
        WriterProvider::Extractive => Ok(Box::new(ExtractiveWriter)),
        WriterProvider::Gemini => {
            let key = Config::gemini_api_key().ok_or_else(|| {
                TrdError::Provider("GEMINI_API_KEY not set for gemini writer".into())
            })?;
            Ok(Box::new(GeminiWriter::new(key, config.generation.model.clone())))
        }
    }
}

// ---------------------------------------------------------------------------
// ExtractiveWriter
// ---------------------------------------------------------------------------

/// Offline writer: composes each section from the retrieved chunks with
/// source attributions. No model call involved.
pub struct ExtractiveWriter;

impl SectionWriter for ExtractiveWriter {
    fn write_section(
        &self,
        section: &TrdSection,
        hits: &[SearchHit],
        notes: &[String],
    ) -> Result<String> {
        let mut body = String::new();
        body.push_str(section.description);
        body.push_str("\n\n");

        if hits.is_empty() && notes.is_empty() {
            body.push_str("No source material matched this section.");
            return Ok(body);
        }

        for hit in hits {
            body.push_str(hit.content.trim());
            body.push_str(&format!("\n[source: {}]\n\n", hit.document_name));
        }
        for note in notes {
            body.push_str(note.trim());
            body.push_str("\n[source: text input]\n\n");
        }
        Ok(body.trim_end().to_string())
    }
}

// ---------------------------------------------------------------------------
// GeminiWriter
// ---------------------------------------------------------------------------

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// Remote writer backed by the Gemini `generateContent` endpoint. Retrieved
/// context is inlined into the prompt.
pub struct GeminiWriter {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiWriter {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            model,
        }
    }

    fn prompt(section: &TrdSection, hits: &[SearchHit], notes: &[String]) -> String {
        let mut prompt = format!(
            "Write the '{}' section of a Technical Requirements Document.\n\
             Section purpose: {}\n\nSource material:\n",
            section.title, section.description
        );
        for hit in hits {
            prompt.push_str(&format!("- ({}) {}\n", hit.document_name, hit.content));
        }
        for note in notes {
            prompt.push_str(&format!("- (text input) {note}\n"));
        }
        prompt.push_str("\nWrite only the section body, grounded in the source material.");
        prompt
    }
}

impl SectionWriter for GeminiWriter {
    fn write_section(
        &self,
        section: &TrdSection,
        hits: &[SearchHit],
        notes: &[String],
    ) -> Result<String> {
        let url = format!(
            "{GEMINI_API_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [ { "parts": [ { "text": Self::prompt(section, hits, notes) } ] } ],
        });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| TrdError::Provider(format!("generateContent request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TrdError::Provider(format!(
                "generateContent returned {}",
                response.status()
            )));
        }
        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| TrdError::Provider(format!("generateContent decode failed: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| TrdError::Provider("generateContent returned no candidates".into()))
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Run a generation request end to end: validate, retrieve per section,
/// write, and persist the result as an `Analysis`.
///
/// A writer failure does not surface as an error: the analysis is persisted
/// as `failed` with the message in `results.message`, which is what callers
/// see.
pub fn run_generation(
    root: &Path,
    index: &VectorIndex,
    embedder: &dyn Embedder,
    writer: &dyn SectionWriter,
    config: &Config,
    request: &GenerationRequest,
) -> Result<Analysis> {
    let (project, sections) = request.resolve(root)?;

    let notes: Vec<String> = request
        .text_input_ids
        .iter()
        .map(|id| TextInput::load(root, id).map(|t| t.content))
        .collect::<Result<_>>()?;

    let mut produced = Vec::with_capacity(sections.len());
    let mut failure: Option<String> = None;

    for section in &sections {
        let query = format!("{} {}", section.title, section.description);
        let mut hits = index.search(embedder, &query, Some(&project.lob), config.generation.top_k)?;
        // When the request names documents, retrieval is scoped to them.
        if !request.document_ids.is_empty() {
            hits.retain(|h| request.document_ids.contains(&h.document_id));
        }

        match writer.write_section(section, &hits, &notes) {
            Ok(content) => {
                let mut sources: Vec<String> = Vec::new();
                for hit in &hits {
                    if !sources.contains(&hit.document_name) {
                        sources.push(hit.document_name.clone());
                    }
                }
                produced.push(serde_json::json!({
                    "key": section.key,
                    "title": section.title,
                    "content": content,
                    "sources": sources,
                }));
            }
            Err(e) => {
                tracing::warn!(section = section.key, error = %e, "section generation failed");
                failure = Some(format!("section '{}' failed: {e}", section.key));
                break;
            }
        }
    }

    let (status, results) = match failure {
        None => (
            AnalysisStatus::Completed,
            serde_json::json!({ "sections": produced }),
        ),
        Some(message) => (AnalysisStatus::Failed, serde_json::json!({ "message": message })),
    };

    let analysis = Analysis {
        id: uuid::Uuid::new_v4().to_string(),
        title: format!("TRD for {}", project.name),
        date: Utc::now(),
        status,
        original_text: if notes.is_empty() {
            None
        } else {
            Some(notes.join("\n\n"))
        },
        results,
        project_id: Some(project.id.clone()),
        document_id: request.document_ids.first().cloned(),
        user_email: None,
    };
    analysis.save(root)?;
    tracing::info!(analysis = %analysis.id, status = %analysis.status, "generation finished");
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use crate::ingest;
    use tempfile::TempDir;

    fn seed(root: &Path) -> (Config, HashEmbedder, VectorIndex) {
        let config = Config::new("test");
        config.save(root).unwrap();
        Project::create(root, "proj-1", "Claims Portal", "personal_auto").unwrap();

        let embedder = HashEmbedder::new(64);
        let mut index = VectorIndex::open(root).unwrap();
        let doc = Document::create(
            root,
            Document::new(
                "doc-1",
                "policy.txt",
                "txt",
                "Collision coverage applies to the insured vehicle. \
                 The deductible is due per occurrence. \
                 Claims must be reported within thirty days.",
            ),
        )
        .unwrap();
        ingest::ingest_document(root, &mut index, &embedder, &config, &doc, "personal_auto")
            .unwrap();
        (config, embedder, index)
    }

    fn request(sections: Option<Vec<&str>>) -> GenerationRequest {
        GenerationRequest {
            project_id: "proj-1".into(),
            document_ids: vec!["doc-1".into()],
            text_input_ids: Vec::new(),
            selected_sections: sections.map(|s| s.iter().map(|k| k.to_string()).collect()),
        }
    }

    #[test]
    fn empty_selection_is_rejected() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());
        let err = request(Some(vec![])).resolve(dir.path()).unwrap_err();
        assert!(matches!(err, TrdError::EmptySectionSelection));
    }

    #[test]
    fn unknown_project_is_not_found() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());
        let mut req = request(None);
        req.project_id = "ghost".into();
        assert!(matches!(
            req.resolve(dir.path()),
            Err(TrdError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn unknown_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());
        let mut req = request(None);
        req.document_ids.push("missing-doc".into());
        assert!(matches!(
            req.resolve(dir.path()),
            Err(TrdError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn omitted_selection_generates_all_sections() {
        let dir = TempDir::new().unwrap();
        let (config, embedder, index) = seed(dir.path());
        let analysis = run_generation(
            dir.path(),
            &index,
            &embedder,
            &ExtractiveWriter,
            &config,
            &request(None),
        )
        .unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Completed);
        let sections = analysis.results["sections"].as_array().unwrap();
        assert_eq!(sections.len(), section::catalog().len());
    }

    #[test]
    fn subset_selection_generates_exactly_that_subset_in_catalog_order() {
        let dir = TempDir::new().unwrap();
        let (config, embedder, index) = seed(dir.path());
        let analysis = run_generation(
            dir.path(),
            &index,
            &embedder,
            &ExtractiveWriter,
            &config,
            &request(Some(vec!["glossary", "scope"])),
        )
        .unwrap();
        let sections = analysis.results["sections"].as_array().unwrap();
        let keys: Vec<_> = sections.iter().map(|s| s["key"].as_str().unwrap()).collect();
        assert_eq!(keys, vec!["scope", "glossary"]);
    }

    #[test]
    fn generated_sections_cite_their_sources() {
        let dir = TempDir::new().unwrap();
        let (config, embedder, index) = seed(dir.path());
        let analysis = run_generation(
            dir.path(),
            &index,
            &embedder,
            &ExtractiveWriter,
            &config,
            &request(Some(vec!["functional_requirements"])),
        )
        .unwrap();
        let sections = analysis.results["sections"].as_array().unwrap();
        let sources = sections[0]["sources"].as_array().unwrap();
        assert!(sources.iter().any(|s| s == "policy.txt"));
    }

    #[test]
    fn writer_failure_marks_analysis_failed() {
        struct FailingWriter;
        impl SectionWriter for FailingWriter {
            fn write_section(
                &self,
                _section: &TrdSection,
                _hits: &[SearchHit],
                _notes: &[String],
            ) -> Result<String> {
                Err(TrdError::Provider("model unavailable".into()))
            }
        }

        let dir = TempDir::new().unwrap();
        let (config, embedder, index) = seed(dir.path());
        let analysis = run_generation(
            dir.path(),
            &index,
            &embedder,
            &FailingWriter,
            &config,
            &request(Some(vec!["scope"])),
        )
        .unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Failed);
        let message = analysis.results["message"].as_str().unwrap();
        assert!(message.contains("model unavailable"));
    }

    #[test]
    fn text_inputs_feed_the_writer() {
        let dir = TempDir::new().unwrap();
        let (config, embedder, index) = seed(dir.path());
        TextInput::create(
            dir.path(),
            TextInput::new("ti-1", None, "Latency must stay under 200ms."),
        )
        .unwrap();

        let mut req = request(Some(vec!["non_functional_requirements"]));
        req.text_input_ids.push("ti-1".into());

        let analysis = run_generation(
            dir.path(),
            &index,
            &embedder,
            &ExtractiveWriter,
            &config,
            &req,
        )
        .unwrap();
        let content = analysis.results["sections"][0]["content"].as_str().unwrap();
        assert!(content.contains("Latency must stay under 200ms."));
        assert_eq!(analysis.original_text.as_deref(), Some("Latency must stay under 200ms."));
    }
}
