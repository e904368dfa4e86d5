//! Heading/paragraph classification.
//!
//! Page text is split into lines, blank lines are dropped and every
//! remaining line becomes one [`ContentBlock`]. The role of each line comes
//! from a pluggable [`LineClassifier`]; the default is [`UppercaseHeuristic`].

use std::sync::Arc;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{BlockKind, ClassifiedPage, ContentBlock, PageContent};

/// Default upper bound (exclusive) on heading length, in characters.
pub const DEFAULT_MAX_HEADING_LEN: usize = 100;

/// Decides the role of a single line.
pub trait LineClassifier: Send + Sync {
    /// Classify a non-blank, trimmed line.
    fn classify(&self, line: &str) -> BlockKind;
}

/// Short, all-caps lines are headings; everything else is a paragraph.
///
/// A line is all-caps when it has at least one letter and no lowercase
/// letter. Digits, punctuation and spaces do not count either way.
#[derive(Debug, Clone, Copy)]
pub struct UppercaseHeuristic {
    max_len: usize,
}

impl UppercaseHeuristic {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Default for UppercaseHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADING_LEN)
    }
}

impl LineClassifier for UppercaseHeuristic {
    fn classify(&self, line: &str) -> BlockKind {
        if line.chars().count() < self.max_len && is_uppercase_line(line) {
            BlockKind::Heading
        } else {
            BlockKind::Paragraph
        }
    }
}

fn is_uppercase_line(line: &str) -> bool {
    let mut has_upper = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Options for classification.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Headings must be shorter than this many characters
    pub max_heading_len: usize,

    /// Apply NFC and collapse inner whitespace before classifying
    pub normalize: bool,
}

impl ClassifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading length bound.
    pub fn with_max_heading_len(mut self, len: usize) -> Self {
        self.max_heading_len = len;
        self
    }

    /// Enable or disable text normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            max_heading_len: DEFAULT_MAX_HEADING_LEN,
            normalize: false,
        }
    }
}

/// Unicode NFC plus whitespace collapsing for a single line.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    whitespace: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
        }
    }

    pub fn normalize(&self, line: &str) -> String {
        let composed: String = line.nfc().collect();
        self.whitespace
            .replace_all(composed.trim(), " ")
            .into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns raw page text into ordered content blocks.
///
/// Holds no per-call state, so the same input always yields the same blocks.
#[derive(Clone)]
pub struct StructureClassifier {
    strategy: Arc<dyn LineClassifier>,
    normalizer: Option<TextNormalizer>,
}

impl StructureClassifier {
    /// Classifier with default options.
    pub fn new() -> Self {
        Self::with_options(&ClassifyOptions::default())
    }

    /// Classifier using the uppercase heuristic configured by `options`.
    pub fn with_options(options: &ClassifyOptions) -> Self {
        Self {
            strategy: Arc::new(UppercaseHeuristic::new(options.max_heading_len)),
            normalizer: options.normalize.then(TextNormalizer::new),
        }
    }

    /// Replace the line classification strategy.
    pub fn with_strategy(mut self, strategy: Arc<dyn LineClassifier>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Classify the raw text of one page.
    pub fn classify(&self, page_index: usize, raw_text: &str) -> Vec<ContentBlock> {
        raw_text
            .split(is_line_break)
            .filter_map(|line| {
                let line = match &self.normalizer {
                    Some(n) => n.normalize(line),
                    None => line.trim().to_string(),
                };
                if line.is_empty() {
                    return None;
                }
                let kind = self.strategy.classify(&line);
                ContentBlock::new(kind, &line, page_index)
            })
            .collect()
    }

    /// Classify an extracted page.
    pub fn classify_page(&self, page: &PageContent) -> ClassifiedPage {
        ClassifiedPage::new(page.index, self.classify(page.index, page.text()))
    }

    /// Classify pages in order.
    pub fn classify_pages<'a, I>(&self, pages: I) -> Vec<ClassifiedPage>
    where
        I: IntoIterator<Item = &'a PageContent>,
    {
        pages.into_iter().map(|p| self.classify_page(p)).collect()
    }
}

impl Default for StructureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StructureClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureClassifier")
            .field("normalize", &self.normalizer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(blocks: &[ContentBlock]) -> Vec<BlockKind> {
        blocks.iter().map(|b| b.kind()).collect()
    }

    #[test]
    fn test_heading_then_paragraph() {
        let blocks = StructureClassifier::new().classify(0, "HELLO\nThis is body text.");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind(), BlockKind::Heading);
        assert_eq!(blocks[0].text(), "HELLO");
        assert_eq!(blocks[1].kind(), BlockKind::Paragraph);
        assert_eq!(blocks[1].text(), "This is body text.");
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let blocks = StructureClassifier::new().classify(3, "\n   \r\nINTRO\r\n\t\nBody\n");
        assert_eq!(kinds(&blocks), vec![BlockKind::Heading, BlockKind::Paragraph]);
        assert!(blocks.iter().all(|b| b.page_index() == 3));
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let classifier = StructureClassifier::new();
        assert!(classifier.classify(0, "").is_empty());
        assert!(classifier.classify_page(&PageContent::empty(4)).is_empty());
    }

    #[test]
    fn test_uppercase_rules() {
        let h = UppercaseHeuristic::default();
        assert_eq!(h.classify("CAPÍTULO 1: INTRODUCCIÓN"), BlockKind::Heading);
        assert_eq!(h.classify("Capítulo 1"), BlockKind::Paragraph);
        assert_eq!(h.classify("2024"), BlockKind::Paragraph);
        assert_eq!(h.classify("--- ***"), BlockKind::Paragraph);
        assert_eq!(h.classify("NASA uses lowercase too"), BlockKind::Paragraph);
    }

    #[test]
    fn test_length_threshold() {
        let h = UppercaseHeuristic::default();
        let just_under = "A".repeat(99);
        let at_limit = "A".repeat(100);
        assert_eq!(h.classify(&just_under), BlockKind::Heading);
        assert_eq!(h.classify(&at_limit), BlockKind::Paragraph);

        let h = UppercaseHeuristic::new(5);
        assert_eq!(h.classify("ABCD"), BlockKind::Heading);
        assert_eq!(h.classify("ABCDE"), BlockKind::Paragraph);
    }

    #[test]
    fn test_classification_is_repeatable() {
        let classifier = StructureClassifier::new();
        let text = "RESUMEN\nPrimer párrafo.\nSEGUNDA PARTE\nOtro párrafo.";
        let first = classifier.classify(1, text);
        let second = classifier.classify(1, text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalization() {
        let classifier =
            StructureClassifier::with_options(&ClassifyOptions::new().with_normalize(true));
        // "e" + combining acute accent composes to "é"
        let blocks = classifier.classify(0, "Cafe\u{301}   con    leche");
        assert_eq!(blocks[0].text(), "Café con leche");

        let plain = StructureClassifier::new().classify(0, "a    b");
        assert_eq!(plain[0].text(), "a    b");
    }

    #[test]
    fn test_custom_strategy() {
        struct AllParagraphs;
        impl LineClassifier for AllParagraphs {
            fn classify(&self, _line: &str) -> BlockKind {
                BlockKind::Paragraph
            }
        }

        let classifier = StructureClassifier::new().with_strategy(Arc::new(AllParagraphs));
        let blocks = classifier.classify(0, "TITLE\nbody");
        assert_eq!(kinds(&blocks), vec![BlockKind::Paragraph, BlockKind::Paragraph]);
    }

    #[test]
    fn test_classify_pages_preserves_order() {
        let pages = vec![
            PageContent::new(0, "ONE\nfirst"),
            PageContent::empty(1),
            PageContent::new(2, "third"),
        ];
        let classified = StructureClassifier::new().classify_pages(&pages);
        assert_eq!(classified.len(), 3);
        assert_eq!(classified[0].blocks.len(), 2);
        assert!(classified[1].is_empty());
        assert_eq!(classified[2].number(), 3);
    }
}
