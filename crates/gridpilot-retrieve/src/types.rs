//! Retrieval types.

use serde::Serialize;

/// One snippet of the loaded corpus.
#[derive(Debug, Clone)]
pub struct Snippet {
    /// Originating file name, or `builtin` for compiled-in notes.
    pub source: String,
    /// Position of the snippet within its source, 0-based.
    pub chunk_index: usize,
    pub text: String,
}

/// A ranked retrieval result.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalHit {
    /// 1-based position in descending score order.
    pub rank: usize,
    pub score: f64,
    pub source: String,
    /// Snippet text, truncated to [`crate::MAX_EXCERPT_CHARS`].
    pub text: String,
}
