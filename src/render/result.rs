//! Synthesis output and tag accounting.

use serde::{Deserialize, Serialize};

/// Structural tags every artifact carries: root, head, body and main.
pub const SCAFFOLD_TAGS: [&str; 4] = ["html", "head", "body", "main"];

/// Running count of structural tags, keyed by tag name in first-use order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTally {
    entries: Vec<(String, usize)>,
}

impl TagTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tally already holding the fixed scaffold.
    pub fn with_scaffold() -> Self {
        let mut tally = Self::new();
        for tag in SCAFFOLD_TAGS {
            tally.record(tag);
        }
        tally
    }

    /// Count one emitted element.
    pub fn record(&mut self, tag: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == tag) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((tag.to_string(), 1)),
        }
    }

    /// Total number of structural elements counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Count for a single tag name.
    pub fn count(&self, tag: &str) -> usize {
        self.entries
            .iter()
            .find(|(name, _)| name == tag)
            .map_or(0, |(_, count)| *count)
    }

    /// Distinct tag names, in first-use order.
    pub fn tags_used(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// Statistics collected while synthesizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupStats {
    /// Page sections emitted
    pub page_count: usize,

    /// Heading blocks emitted
    pub heading_count: usize,

    /// Paragraph blocks emitted
    pub paragraph_count: usize,
}

impl MarkupStats {
    /// Total content blocks emitted.
    pub fn block_count(&self) -> usize {
        self.heading_count + self.paragraph_count
    }
}

/// A synthesized HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// The HTML text
    pub content: String,

    /// Structural tag tally
    pub tags: TagTally,

    /// Block and page counts
    pub stats: MarkupStats,
}

impl Synthesis {
    /// Number of structural tags emitted.
    pub fn tag_count(&self) -> usize {
        self.tags.total()
    }

    /// Length of the content in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// The artifact bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.content.into_bytes()
    }
}
