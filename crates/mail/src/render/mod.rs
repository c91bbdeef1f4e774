//! PDF rendering of the finished Markdown document

mod command;

pub use command::CommandPdfRenderer;

use anyhow::Result;
use std::path::Path;

/// Turns Markdown text into a PDF file
pub trait PdfRenderer {
    /// Render `markdown` with the given document title into `output`
    fn render(&self, markdown: &str, title: &str, output: &Path) -> Result<()>;
}
