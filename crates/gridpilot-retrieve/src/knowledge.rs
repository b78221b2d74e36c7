//! Knowledge base loading and lexical search.

use std::collections::HashSet;
use std::path::Path;

use gridpilot_core::{Error, Result};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::chunk::{split_paragraphs, DEFAULT_CHUNK_SIZE};
use crate::types::{RetrievalHit, Snippet};
use crate::MAX_EXCERPT_CHARS;

/// Compiled-in engineering notes used when no corpus directory is
/// provisioned. Real deployments point `GRIDPILOT_KNOWLEDGE_DIR` at their
/// own documents.
const DEFAULT_NOTES: &[(&str, &str)] = &[
    (
        "builtin/curtailment",
        "Curtailment is the forced reduction of renewable generation output, \
         usually ordered when grid export capacity is congested. Charging a \
         co-located battery during the clipped midday hours recovers energy \
         that would otherwise be curtailed and shifts it into the evening peak.",
    ),
    (
        "builtin/bess-soc",
        "BESS state of charge should be kept between 10% and 90% for most \
         lithium chemistries; sustained operation at the extremes accelerates \
         capacity fade. Leave charge headroom ahead of forecast clipping \
         windows so the plant can absorb surplus generation.",
    ),
    (
        "builtin/grid-limits",
        "Interconnection agreements cap export at the point of interconnection. \
         Inverter clipping typically starts near 90% of nameplate forecast on \
         clear days, so dispatch plans treat the export limit, not the panel \
         output, as the binding constraint.",
    ),
    (
        "builtin/cycling",
        "Every charge/discharge cycle costs battery life. A dispatch plan \
         should only cycle the BESS when the recovered energy is worth more \
         than the cycle wear, which is why optimizers carry a small cycling \
         penalty alongside the curtailment objective.",
    ),
];

/// In-memory snippet corpus with lexical search.
pub struct KnowledgeBase {
    snippets: Vec<Snippet>,
}

impl KnowledgeBase {
    /// Load `.txt` and `.md` files from a corpus directory.
    ///
    /// Identical snippets (by content hash) are kept once, first source wins.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Retrieval(format!(
                "knowledge directory {} does not exist",
                dir.display()
            )));
        }

        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("txt") | Some("md")
                )
            })
            .collect();
        entries.sort();

        let mut snippets = Vec::new();
        let mut seen = HashSet::new();
        for path in &entries {
            let text = match std::fs::read_to_string(path) {
                Ok(t) => t,
                Err(e) => {
                    warn!("Skipping unreadable corpus file {}: {}", path.display(), e);
                    continue;
                }
            };
            let source = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            for (chunk_index, text) in split_paragraphs(&text, DEFAULT_CHUNK_SIZE)
                .into_iter()
                .enumerate()
            {
                if seen.insert(content_hash(&text)) {
                    snippets.push(Snippet {
                        source: source.clone(),
                        chunk_index,
                        text,
                    });
                }
            }
        }

        info!(
            "Loaded {} snippets from {} corpus files in {}",
            snippets.len(),
            entries.len(),
            dir.display()
        );
        Ok(Self { snippets })
    }

    /// The compiled-in default corpus.
    pub fn with_defaults() -> Self {
        let snippets = DEFAULT_NOTES
            .iter()
            .map(|(source, text)| Snippet {
                source: source.to_string(),
                chunk_index: 0,
                text: text.to_string(),
            })
            .collect();
        Self { snippets }
    }

    /// Load the configured directory, or fall back to the default corpus.
    pub fn from_config(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::load(dir),
            None => Ok(Self::with_defaults()),
        }
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Top-k snippets by lexical overlap with the query.
    ///
    /// Score is the fraction of query terms present plus a small bonus per
    /// repeated occurrence. Zero-score snippets are dropped.
    pub fn search(&self, query: &str, k: usize) -> Vec<RetrievalHit> {
        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower
            .split_whitespace()
            .filter(|t| t.len() > 2)
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &Snippet)> = self
            .snippets
            .iter()
            .filter_map(|snippet| {
                let text_lower = snippet.text.to_lowercase();
                let matched = terms.iter().filter(|t| text_lower.contains(**t)).count();
                if matched == 0 {
                    return None;
                }
                let occurrences: usize = terms
                    .iter()
                    .map(|t| text_lower.matches(*t).count())
                    .sum();
                let score = matched as f64 / terms.len() as f64
                    + 0.05 * (occurrences - matched) as f64;
                Some((score, snippet))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(i, (score, snippet))| RetrievalHit {
                rank: i + 1,
                score,
                source: snippet.source.clone(),
                text: truncate(&snippet.text, MAX_EXCERPT_CHARS),
            })
            .collect()
    }
}

fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, text) in files {
            std::fs::write(dir.path().join(name), text).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_missing_dir_fails() {
        assert!(KnowledgeBase::load(Path::new("/nonexistent/corpus")).is_err());
    }

    #[test]
    fn test_load_skips_non_text_files() {
        let dir = corpus_dir(&[
            ("notes.txt", "Solar curtailment happens at noon."),
            ("image.png", "binary-ish"),
        ]);
        let kb = KnowledgeBase::load(dir.path()).unwrap();
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn test_duplicate_chunks_kept_once() {
        let dir = corpus_dir(&[
            ("a.txt", "Identical paragraph about batteries."),
            ("b.txt", "Identical paragraph about batteries."),
        ]);
        let kb = KnowledgeBase::load(dir.path()).unwrap();
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn test_search_ranks_by_overlap() {
        let dir = corpus_dir(&[(
            "notes.md",
            "Battery charging absorbs clipped solar output.\n\n\
             Wind farms face different curtailment patterns.\n\n\
             Scheduled maintenance windows reduce availability.",
        )]);
        let kb = KnowledgeBase::load(dir.path()).unwrap();

        let hits = kb.search("solar battery charging", 3);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].rank, 1);
        assert!(hits[0].text.contains("Battery charging"));
        // Maintenance snippet shares no terms, so it never appears.
        assert!(hits.iter().all(|h| !h.text.contains("maintenance")));
    }

    #[test]
    fn test_search_respects_k() {
        let kb = KnowledgeBase::with_defaults();
        let hits = kb.search("battery curtailment dispatch", 2);
        assert!(hits.len() <= 2);
    }

    #[test]
    fn test_search_off_topic_returns_nothing() {
        let kb = KnowledgeBase::with_defaults();
        assert!(kb.search("zzz qqq xxyyzz", 3).is_empty());
    }

    #[test]
    fn test_excerpt_truncation() {
        let long = "curtailment ".repeat(200);
        let dir = corpus_dir(&[("long.txt", long.as_str())]);
        let kb = KnowledgeBase::load(dir.path()).unwrap();

        let hits = kb.search("curtailment", 1);
        assert!(hits[0].text.len() <= MAX_EXCERPT_CHARS + 3);
        assert!(hits[0].text.ends_with("..."));
    }

    #[test]
    fn test_defaults_cover_domain_terms() {
        let kb = KnowledgeBase::with_defaults();
        assert!(!kb.is_empty());
        assert!(!kb.search("curtailment", 3).is_empty());
        assert!(!kb.search("state of charge", 3).is_empty());
    }
}
