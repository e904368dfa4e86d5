//! Rendering options and configuration.

/// Default document language.
pub const DEFAULT_LANGUAGE: &str = "es";

/// Default accessibility level label.
pub const DEFAULT_ACCESSIBILITY_LEVEL: &str = "AA";

/// Options for synthesizing the HTML artifact.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Value of the root `lang` attribute
    pub language: String,

    /// Accessibility level label carried in the head
    pub accessibility_level: String,

    /// Heading level for heading blocks (3-6); page headings use level 2
    pub block_heading_level: u8,

    /// Emit a `generator` meta tag with the crate version
    pub include_generator_meta: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the accessibility level label.
    pub fn with_accessibility_level(mut self, level: impl Into<String>) -> Self {
        self.accessibility_level = level.into();
        self
    }

    /// Set the heading level used for heading blocks.
    pub fn with_block_heading_level(mut self, level: u8) -> Self {
        self.block_heading_level = level.clamp(3, 6);
        self
    }

    /// Enable or disable the generator meta tag.
    pub fn with_generator_meta(mut self, include: bool) -> Self {
        self.include_generator_meta = include;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            accessibility_level: DEFAULT_ACCESSIBILITY_LEVEL.to_string(),
            block_heading_level: 3,
            include_generator_meta: true,
        }
    }
}
