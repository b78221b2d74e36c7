//! Paragraph chunking for corpus files.
//!
//! Splits on markdown headers and blank lines first, then falls back to
//! sentence and word boundaries for paragraphs longer than the chunk size.

use once_cell::sync::Lazy;
use regex::Regex;

/// Target snippet size in characters. Larger than the retrieval excerpt cap
/// so truncation still marks snippets that ran long.
pub const DEFAULT_CHUNK_SIZE: usize = 1200;

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());

/// Split a document into paragraph-sized snippets.
pub fn split_paragraphs(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    for section in split_sections(text) {
        for paragraph in section.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if paragraph.len() <= chunk_size {
                chunks.push(paragraph.to_string());
            } else {
                chunks.extend(split_long(paragraph, chunk_size));
            }
        }
    }
    chunks
}

/// Split on markdown headers, keeping each header with its body.
fn split_sections(text: &str) -> Vec<String> {
    let starts: Vec<usize> = HEADER.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        return vec![text.to_string()];
    }

    let mut sections = Vec::new();
    if starts[0] > 0 {
        sections.push(text[..starts[0]].to_string());
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        sections.push(text[start..end].to_string());
    }
    sections
}

/// Break an over-long paragraph at sentence boundaries, then words.
fn split_long(paragraph: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for piece in paragraph.split_inclusive(". ") {
        if current.len() + piece.len() > chunk_size && !current.is_empty() {
            chunks.push(current.trim().to_string());
            current = String::new();
        }
        if piece.len() > chunk_size {
            // A single run-on sentence; fall back to word packing.
            for word in piece.split_whitespace() {
                if current.len() + word.len() + 1 > chunk_size && !current.is_empty() {
                    chunks.push(current.trim().to_string());
                    current = String::new();
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
        } else {
            current.push_str(piece);
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}
