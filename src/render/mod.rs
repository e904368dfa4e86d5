//! Rendering module: accessible HTML synthesis and JSON reports.

mod html;
mod json;
mod options;
mod result;

pub use html::{escape_html, to_html, MarkupSynthesizer, MAIN_CONTENT_ID};
pub use json::{report_to_json, to_json, JsonFormat};
pub use options::{RenderOptions, DEFAULT_ACCESSIBILITY_LEVEL, DEFAULT_LANGUAGE};
pub use result::{MarkupStats, Synthesis, TagTally, SCAFFOLD_TAGS};
