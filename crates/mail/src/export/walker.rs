//! Depth-first folder traversal

use anyhow::{Context, Result};
use log::{debug, error, info};
use std::path::Path;

use super::document::ExportDocument;
use super::filter::DateFilter;
use super::hash::{fallback_identifier, short_hash, storage_name};
use super::normalize::{NormalizeOptions, build_record};
use crate::decode::{DecodeError, MessageDecoder};
use crate::models::{FolderPath, MessageRecord};
use crate::provider::{MailFolder, RawMessage, SortKey};

/// Failure while extracting a single message
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to save message: {0:#}")]
    Save(anyhow::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ExtractError {
    /// Protected content is expected and skipped without logging
    pub fn is_protected(&self) -> bool {
        matches!(self, ExtractError::Decode(e) if e.is_protected())
    }
}

/// Statistics from a walk
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    /// Number of folders entered
    pub folders_visited: usize,
    /// Number of items returned by the folders' collections
    pub messages_seen: usize,
    /// Number of messages written to the document
    pub messages_exported: usize,
    /// Number of items rejected by the per-message date check
    pub messages_filtered: usize,
    /// Number of messages skipped as protected content
    pub messages_protected: usize,
    /// Number of messages that failed to extract
    pub errors: usize,
}

/// Walks a folder tree and feeds extracted messages into a document
///
/// Message-level failures are logged and counted; the walk carries on with
/// the next message. Failures reading the folder tree itself abort the walk.
pub struct FolderWalker<'a> {
    decoder: &'a dyn MessageDecoder,
    scratch_dir: &'a Path,
    filter: DateFilter,
    options: NormalizeOptions,
    stats: WalkStats,
}

impl<'a> FolderWalker<'a> {
    /// Create a walker that serializes messages into `scratch_dir`
    pub fn new(decoder: &'a dyn MessageDecoder, scratch_dir: &'a Path) -> Self {
        Self {
            decoder,
            scratch_dir,
            filter: DateFilter::none(),
            options: NormalizeOptions::default(),
            stats: WalkStats::default(),
        }
    }

    pub fn with_filter(mut self, filter: DateFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    pub fn into_stats(self) -> WalkStats {
        self.stats
    }

    /// Walk `root` and everything below it
    pub fn walk(&mut self, root: &dyn MailFolder, document: &mut ExportDocument) -> Result<()> {
        self.walk_folder(root, FolderPath::root(root.name()), document)
    }

    fn walk_folder(
        &mut self,
        folder: &dyn MailFolder,
        path: FolderPath,
        document: &mut ExportDocument,
    ) -> Result<()> {
        info!("Processing folder: {}", path);
        self.stats.folders_visited += 1;

        let mut items = folder
            .items()
            .with_context(|| format!("Failed to read items of folder {}", path))?;

        // Sort first so the per-folder order never depends on the filter
        items
            .sort(SortKey::ReceivedTime, true)
            .with_context(|| format!("Failed to sort items of folder {}", path))?;

        if let Some(restriction) = self.filter.restriction() {
            let expression = restriction.expression();
            info!("Applying date filter: {}", expression);
            items
                .restrict(&expression)
                .with_context(|| format!("Failed to restrict items of folder {}", path))?;
        }

        let mut sequence = 1;
        while let Some(item) = items
            .next_item()
            .with_context(|| format!("Failed to read message {} of folder {}", sequence, path))?
        {
            self.stats.messages_seen += 1;
            self.process_item(item.as_ref(), sequence, &path, document);
            sequence += 1;
        }

        let subfolders = folder
            .subfolders()
            .with_context(|| format!("Failed to list subfolders of {}", path))?;
        for child in subfolders {
            info!("Descending into subfolder: {} of {}", child.name(), path);
            let child_path = path.child(child.name());
            self.walk_folder(child.as_ref(), child_path, document)?;
        }

        Ok(())
    }

    fn process_item(
        &mut self,
        item: &dyn RawMessage,
        sequence: usize,
        path: &FolderPath,
        document: &mut ExportDocument,
    ) {
        let received = item.received_time();
        debug!(
            "Processing message {} in folder {}: Received {}",
            sequence, path, received
        );

        if !self.filter.admits(&received) {
            self.stats.messages_filtered += 1;
            return;
        }

        match self.extract(item, sequence, path) {
            Ok(record) => {
                info!(
                    "Added message: {} [{}] from {}",
                    record.subject, record.short_hash, path
                );
                document.append_record(&record);
                self.stats.messages_exported += 1;
            }
            Err(e) if e.is_protected() => {
                self.stats.messages_protected += 1;
            }
            Err(e) => {
                let subject = item
                    .subject()
                    .unwrap_or_else(|| format!("message_{}", sequence));
                error!(
                    "Error processing message {} ({}) in folder {}: {}",
                    sequence, subject, path, e
                );
                self.stats.errors += 1;
            }
        }
    }

    /// Serialize, decode and normalize one message
    fn extract(
        &self,
        item: &dyn RawMessage,
        sequence: usize,
        path: &FolderPath,
    ) -> Result<MessageRecord, ExtractError> {
        let identifier = item
            .entry_id()
            .unwrap_or_else(|| fallback_identifier(item.subject().as_deref(), sequence));
        let filename = format!("{}.{}", storage_name(&identifier), self.decoder.extension());
        let storage_path = self.scratch_dir.join(filename);

        debug!("Saving message to {}", storage_path.display());
        item.save_as(&storage_path).map_err(ExtractError::Save)?;

        let decoded = self.decoder.decode(&storage_path)?;
        Ok(build_record(
            &decoded,
            path,
            &short_hash(&storage_path),
            self.options,
        ))
    }
}
