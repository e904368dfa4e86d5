//! Accessible HTML synthesis.
//!
//! Output layout:
//!
//! ```text
//! <html lang> <head>…</head> <body> skip-link <main>
//!   <section aria-labelledby> <h2>Página N</h2> blocks… </section>   (one per page)
//! </main> </body> </html>
//! ```
//!
//! Structural tag count = 4 (html/head/body/main) + 2 per page section
//! (section + page heading) + 1 per block.

use std::fmt::Write as _;

use crate::error::Result;
use crate::model::{BlockKind, ClassifiedPage, ContentBlock};

use super::{MarkupStats, RenderOptions, Synthesis, TagTally};

/// Anchor of the main content region.
pub const MAIN_CONTENT_ID: &str = "contenido";

const SKIP_LINK_LABEL: &str = "Saltar al contenido principal";
const PAGE_LABEL: &str = "Página";
const PAGE_HEADING_TAG: &str = "h2";

/// Escape text for embedding in HTML element content or attribute values.
///
/// Control characters other than tab are dropped.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Convert classified pages to an HTML document.
pub fn to_html(title: &str, pages: &[ClassifiedPage], options: &RenderOptions) -> Result<Synthesis> {
    MarkupSynthesizer::new(options.clone()).synthesize(title, pages)
}

/// Renders classified blocks into an accessibility-annotated HTML document.
///
/// Output depends only on the title, the pages and the options.
#[derive(Debug, Clone, Default)]
pub struct MarkupSynthesizer {
    options: RenderOptions,
}

impl MarkupSynthesizer {
    /// Create a new synthesizer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render the document.
    pub fn synthesize(&self, title: &str, pages: &[ClassifiedPage]) -> Result<Synthesis> {
        let mut out = String::new();
        let mut tags = TagTally::with_scaffold();
        let mut stats = MarkupStats::default();

        self.write_head(&mut out, title)?;

        writeln!(out, "<body>")?;
        writeln!(
            out,
            "<a class=\"skip-link\" href=\"#{}\">{}</a>",
            MAIN_CONTENT_ID, SKIP_LINK_LABEL
        )?;
        writeln!(out, "<main id=\"{}\">", MAIN_CONTENT_ID)?;

        for page in pages {
            self.write_page(&mut out, page, &mut tags, &mut stats)?;
        }

        writeln!(out, "</main>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;

        Ok(Synthesis {
            content: out,
            tags,
            stats,
        })
    }

    fn write_head(&self, out: &mut String, title: &str) -> Result<()> {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"{}\">", escape_html(&self.options.language))?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(
            out,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        if self.options.include_generator_meta {
            writeln!(
                out,
                "<meta name=\"generator\" content=\"accesspdf {}\">",
                env!("CARGO_PKG_VERSION")
            )?;
        }
        writeln!(
            out,
            "<meta name=\"accessibility-level\" content=\"{}\">",
            escape_html(&self.options.accessibility_level)
        )?;
        writeln!(out, "<title>{}</title>", escape_html(title))?;
        writeln!(out, "</head>")?;
        Ok(())
    }

    fn write_page(
        &self,
        out: &mut String,
        page: &ClassifiedPage,
        tags: &mut TagTally,
        stats: &mut MarkupStats,
    ) -> Result<()> {
        let number = page.number();
        let heading_id = format!("pagina-{}", number);

        writeln!(out, "<section aria-labelledby=\"{}\">", heading_id)?;
        tags.record("section");
        writeln!(
            out,
            "<{tag} id=\"{id}\">{label} {number}</{tag}>",
            tag = PAGE_HEADING_TAG,
            id = heading_id,
            label = PAGE_LABEL,
            number = number
        )?;
        tags.record(PAGE_HEADING_TAG);
        stats.page_count += 1;

        for block in &page.blocks {
            self.write_block(out, block, tags, stats)?;
        }

        writeln!(out, "</section>")?;
        Ok(())
    }

    fn write_block(
        &self,
        out: &mut String,
        block: &ContentBlock,
        tags: &mut TagTally,
        stats: &mut MarkupStats,
    ) -> Result<()> {
        let tag = match block.kind() {
            BlockKind::Heading => {
                stats.heading_count += 1;
                heading_tag(self.options.block_heading_level)
            }
            BlockKind::Paragraph => {
                stats.paragraph_count += 1;
                "p"
            }
        };
        writeln!(out, "<{tag}>{}</{tag}>", escape_html(block.text()), tag = tag)?;
        tags.record(tag);
        Ok(())
    }
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        0..=3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}
