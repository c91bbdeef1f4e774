//! Folder-tree provider trait definitions

use anyhow::{Result, bail};
use std::path::Path;

use crate::models::ReceivedTime;

/// Keys an item collection can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    ReceivedTime,
}

/// A single message handle inside a folder
///
/// Handles are only valid for one traversal step and are not retained.
pub trait RawMessage {
    /// Received time as the store reports it
    fn received_time(&self) -> ReceivedTime;

    /// Subject line, if the store exposes one
    fn subject(&self) -> Option<String>;

    /// Durable entry identifier, if the store has one
    fn entry_id(&self) -> Option<String>;

    /// Serialize the message as a self-contained container at `path`
    fn save_as(&self, path: &Path) -> Result<()>;
}

/// The items of a folder, with store-side sort and restriction
pub trait ItemCollection {
    /// Sort items in place
    fn sort(&mut self, key: SortKey, descending: bool) -> Result<()>;

    /// Keep only the items matching a store-native restriction expression
    ///
    /// Restriction must not disturb the current sort order.
    fn restrict(&mut self, expression: &str) -> Result<()>;

    /// Advance the cursor, returning `None` once the collection is exhausted
    fn next_item(&mut self) -> Result<Option<Box<dyn RawMessage>>>;
}

/// A folder in the mail store's tree
pub trait MailFolder {
    /// Display name of the folder
    fn name(&self) -> &str;

    /// Item collection for this folder, positioned before the first item
    fn items(&self) -> Result<Box<dyn ItemCollection>>;

    /// Child folders in provider order
    fn subfolders(&self) -> Result<Vec<Box<dyn MailFolder>>>;

    /// Look up a direct child by name
    fn subfolder(&self, name: &str) -> Result<Option<Box<dyn MailFolder>>> {
        Ok(self.subfolders()?.into_iter().find(|f| f.name() == name))
    }
}

/// Resolve a separator-delimited folder path below `root`
///
/// Empty segments are ignored, so leading or doubled separators are harmless.
/// A missing segment is a configuration problem and is reported immediately.
pub fn resolve_folder(
    root: Box<dyn MailFolder>,
    path: &str,
    separator: &str,
) -> Result<Box<dyn MailFolder>> {
    if separator.is_empty() {
        bail!("Folder separator must not be empty");
    }

    let mut folder = root;
    for segment in path.split(separator).filter(|s| !s.is_empty()) {
        folder = match folder.subfolder(segment)? {
            Some(child) => child,
            None => bail!("Folder '{}' not found in '{}'", segment, folder.name()),
        };
    }
    Ok(folder)
}

/// Stable sort helper shared by the providers
///
/// Items whose timestamp cannot be placed on the timeline sort as the oldest.
pub(crate) fn sort_by_received<T>(
    items: &mut [T],
    descending: bool,
    received: impl Fn(&T) -> ReceivedTime,
) {
    items.sort_by(|a, b| {
        let ordering = received(a).to_instant().cmp(&received(b).to_instant());
        if descending { ordering.reverse() } else { ordering }
    });
}
