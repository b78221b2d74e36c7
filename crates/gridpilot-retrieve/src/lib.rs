//! Grounded-knowledge retrieval for the dispatch pipeline.
//!
//! A placeholder for real vector search: plain-text files are split into
//! paragraph snippets and scored by lexical overlap with the query. The
//! retrieval contract (ranked hits, source attribution, capped excerpts)
//! is what a vector index would slot into.

pub mod chunk;
pub mod knowledge;
pub mod types;

pub use knowledge::KnowledgeBase;
pub use types::{RetrievalHit, Snippet};

/// Excerpt cap on retrieved text, long pages get truncated.
pub const MAX_EXCERPT_CHARS: usize = 800;
