//! Page content and classified blocks.

use serde::{Deserialize, Serialize};

/// Raw text extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Page index (0-based)
    pub index: usize,

    /// Extracted text, `None` when the page yielded nothing
    pub text: Option<String>,
}

impl PageContent {
    /// Create page content, folding empty text into `None`.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            index,
            text: if text.is_empty() { None } else { Some(text) },
        }
    }

    /// A page with no extractable text.
    pub fn empty(index: usize) -> Self {
        Self { index, text: None }
    }

    /// Text of the page, empty when absent.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Semantic role of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Paragraph,
}

/// One classified unit of page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    kind: BlockKind,
    text: String,
    page_index: usize,
}

impl ContentBlock {
    /// Create a block from a line of text.
    ///
    /// Returns `None` if the text is empty after trimming.
    pub fn new(kind: BlockKind, text: &str, page_index: usize) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            text: text.to_string(),
            page_index,
        })
    }

    /// Block role.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Trimmed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Page the block came from (0-based).
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn is_heading(&self) -> bool {
        self.kind == BlockKind::Heading
    }
}

/// The classified blocks of a single page, in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedPage {
    /// Page index (0-based)
    pub index: usize,

    /// Blocks in source line order
    pub blocks: Vec<ContentBlock>,
}

impl ClassifiedPage {
    pub fn new(index: usize, blocks: Vec<ContentBlock>) -> Self {
        Self { index, blocks }
    }

    /// 1-based page number for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
