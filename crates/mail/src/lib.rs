//! Mail crate - Folder-tree export to Markdown and PDF
//!
//! This crate provides the export pipeline and its seams:
//! - Domain models (FolderPath, ReceivedTime, DecodedMessage, MessageRecord)
//! - Folder-tree provider traits with in-memory and Maildir bindings
//! - Message decoding with a distinguishable "protected content" failure
//! - Depth-first walk with date filtering and per-message failure containment
//! - Document assembly and PDF rendering through an external converter
//!
//! Everything runs on the calling thread; the walk is strictly sequential.

pub mod config;
pub mod decode;
pub mod export;
pub mod models;
pub mod provider;
pub mod render;

pub use config::ExportSettings;
pub use decode::{DecodeError, EmlDecoder, MessageDecoder};
pub use export::{
    DateFilter, ExportDocument, ExportOptions, ExportReport, FolderWalker, NormalizeOptions,
    WalkStats, export_folder, parse_min_date,
};
pub use models::{DecodedMessage, FolderPath, MessageRecord, ReceivedTime};
pub use provider::{
    ItemCollection, MailFolder, MaildirFolder, MemoryFolder, MemoryMessage, RawMessage,
    resolve_folder,
};
pub use render::{CommandPdfRenderer, PdfRenderer};
