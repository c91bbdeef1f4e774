//! Export pipeline
//!
//! Walks a folder tree, extracts every message that passes the date filter,
//! and assembles one Markdown document. The orchestrator owns the scratch
//! directory for per-message containers and always flushes whatever was
//! assembled, even when the walk fails partway.

mod document;
mod filter;
mod hash;
mod normalize;
mod orchestrator;
mod walker;

pub use document::{DEFAULT_TITLE, ExportDocument};
pub use filter::{DateFilter, parse_min_date};
pub use hash::{SHORT_HASH_LEN, fallback_identifier, short_hash, storage_name};
pub use normalize::{
    NormalizeOptions, build_record, escape_markdown, normalize_body, render_record,
};
pub use orchestrator::{DEFAULT_OUTPUT, ExportOptions, ExportReport, export_folder};
pub use walker::{ExtractError, FolderWalker, WalkStats};
