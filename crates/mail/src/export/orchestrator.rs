//! Export orchestration
//!
//! Owns the scratch directory for one run, drives the walk, and flushes the
//! assembled document to Markdown and PDF. The flush runs whether or not the
//! walk succeeded, so a run that fails partway still leaves a usable partial
//! export behind.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::document::{DEFAULT_TITLE, ExportDocument};
use super::filter::DateFilter;
use super::normalize::NormalizeOptions;
use super::walker::{FolderWalker, WalkStats};
use crate::decode::MessageDecoder;
use crate::provider::MailFolder;
use crate::render::PdfRenderer;

/// Markdown file written when no output path is given
pub const DEFAULT_OUTPUT: &str = "mail_export.md";

/// Prefix of the per-run scratch directory
const DEFAULT_TEMP_PREFIX: &str = "mailbook_";

/// Options for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Inclusive minimum received time
    pub min_date: Option<DateTime<Utc>>,
    /// Markdown output path; the PDF uses the same base name
    pub output: Option<PathBuf>,
    /// Document title
    pub title: String,
    /// Prefix for the scratch directory name
    pub temp_prefix: String,
    pub normalize: NormalizeOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            min_date: None,
            output: None,
            title: DEFAULT_TITLE.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            normalize: NormalizeOptions::default(),
        }
    }
}

/// Result of a completed export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub markdown_path: PathBuf,
    pub pdf_path: PathBuf,
    pub stats: WalkStats,
}

/// Export `root` and its subfolders to Markdown and PDF
///
/// Message-level problems never fail the export. A folder-tree failure is
/// returned after the partial document has been written. Failing to write
/// either output file is returned as is.
pub fn export_folder(
    root: &dyn MailFolder,
    decoder: &dyn MessageDecoder,
    renderer: &dyn PdfRenderer,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let markdown_path = markdown_path(options.output.as_deref())?;
    let mut document = ExportDocument::new(&options.title);

    let (walked, stats) = run_walk(root, decoder, options, &mut document);

    let pdf_path = finalize(&document, &markdown_path, renderer, &options.title)?;
    walked?;

    info!(
        "Exported {} messages from {} folders ({} filtered, {} protected, {} errors)",
        stats.messages_exported,
        stats.folders_visited,
        stats.messages_filtered,
        stats.messages_protected,
        stats.errors
    );

    Ok(ExportReport {
        markdown_path,
        pdf_path,
        stats,
    })
}

/// Absolute Markdown output path
fn markdown_path(output: Option<&Path>) -> Result<PathBuf> {
    let path = output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT));
    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve output path {}", path.display()))
}

/// Walk inside a scratch directory that lives exactly as long as the walk
fn run_walk(
    root: &dyn MailFolder,
    decoder: &dyn MessageDecoder,
    options: &ExportOptions,
    document: &mut ExportDocument,
) -> (Result<()>, WalkStats) {
    let scratch = match tempfile::Builder::new()
        .prefix(&options.temp_prefix)
        .tempdir()
    {
        Ok(dir) => dir,
        Err(e) => {
            let err = anyhow::Error::new(e).context("Failed to create scratch directory");
            return (Err(err), WalkStats::default());
        }
    };

    let mut walker = FolderWalker::new(decoder, scratch.path())
        .with_filter(DateFilter::new(options.min_date))
        .with_options(options.normalize);
    let result = walker.walk(root, document);
    let stats = walker.into_stats();

    release_scratch(scratch);
    (result, stats)
}

/// Remove the scratch directory; failures are logged, not propagated
fn release_scratch(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        warn!(
            "Failed to clean up scratch directory {}: {}",
            path.display(),
            e
        );
    }
}

/// Write the Markdown file and render the PDF next to it
fn finalize(
    document: &ExportDocument,
    markdown_path: &Path,
    renderer: &dyn PdfRenderer,
    title: &str,
) -> Result<PathBuf> {
    let content = document.render();

    if let Some(parent) = markdown_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    fs::write(markdown_path, &content)
        .with_context(|| format!("Failed to write {}", markdown_path.display()))?;
    info!(
        "Wrote {} messages to {}",
        document.message_count(),
        markdown_path.display()
    );

    let pdf_path = markdown_path.with_extension("pdf");
    renderer
        .render(&content, title, &pdf_path)
        .with_context(|| format!("Failed to render {}", pdf_path.display()))?;
    info!("Wrote PDF to {}", pdf_path.display());

    Ok(pdf_path)
}
