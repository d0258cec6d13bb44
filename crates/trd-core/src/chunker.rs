use crate::config::ChunkingConfig;

/// Separator ladder, coarsest first. The empty separator is the hard
/// character-window fallback for text with no structure at all.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

// ---------------------------------------------------------------------------
// Chunker
// ---------------------------------------------------------------------------

/// Recursive character splitter. Breaks text on the coarsest separator that
/// produces pieces within `chunk_size`, recursing into oversized pieces with
/// the next separator, then merges adjacent pieces back up to the target
/// size carrying `chunk_overlap` trailing characters between consecutive
/// chunks. Separators stay attached to the preceding piece, so every chunk
/// is a contiguous substring of the input.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        // An overlap at or above the chunk size would never make progress.
        let chunk_overlap = chunk_overlap.min(chunk_size.saturating_sub(1));
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let fragments = self.fragments(text, SEPARATORS);
        self.merge(fragments)
    }

    /// Break `text` into pieces no longer than `chunk_size` characters.
    fn fragments(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }
        let Some((sep, rest)) = separators.split_first() else {
            return vec![text.to_string()];
        };
        if sep.is_empty() {
            return window_split(text, self.chunk_size);
        }

        let parts = split_inclusive(text, sep);
        if parts.len() == 1 {
            // Separator absent; try the next, finer one.
            return self.fragments(text, rest);
        }
        parts
            .into_iter()
            .flat_map(|p| {
                if char_len(&p) > self.chunk_size {
                    self.fragments(&p, rest)
                } else {
                    vec![p]
                }
            })
            .collect()
    }

    /// Greedily pack fragments into chunks, carrying the overlap tail of
    /// each emitted chunk into the next.
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for frag in fragments {
            let frag_len = char_len(&frag);
            if current_len + frag_len > self.chunk_size && !current.is_empty() {
                chunks.push(current.clone());
                let tail = char_tail(&current, self.chunk_overlap);
                current_len = char_len(&tail);
                current = tail;
            }
            current.push_str(&frag);
            current_len += frag_len;
        }
        if !current.trim().is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Last `n` characters of `s`.
fn char_tail(s: &str, n: usize) -> String {
    let len = char_len(s);
    if n == 0 || len == 0 {
        return String::new();
    }
    s.chars().skip(len.saturating_sub(n)).collect()
}

/// Split keeping the separator attached to the preceding piece, so that the
/// concatenation of all pieces reproduces the input.
fn split_inclusive(text: &str, sep: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(sep) {
        let end = pos + sep.len();
        parts.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

/// Hard split into windows of at most `size` characters.
fn window_split(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|c| c.iter().collect::<String>())
        .collect()
}
