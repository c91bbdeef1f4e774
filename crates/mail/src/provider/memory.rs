//! In-memory folder-tree provider
//!
//! Used for tests and for embedding the exporter where messages are already
//! held in memory. Folders are cheap to clone; every `items()` call yields a
//! fresh collection.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;

use super::traits::sort_by_received;
use super::{ItemCollection, MailFolder, RawMessage, Restriction, SortKey};
use crate::models::ReceivedTime;

/// A message held in memory with its serialized container bytes
#[derive(Debug, Clone)]
pub struct MemoryMessage {
    entry_id: Option<String>,
    subject: Option<String>,
    received: ReceivedTime,
    content: Vec<u8>,
    save_error: Option<String>,
}

impl MemoryMessage {
    /// Create a message whose container is `content`
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            entry_id: None,
            subject: None,
            received: ReceivedTime::Missing,
            content: content.into(),
            save_error: None,
        }
    }

    pub fn entry_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn received(mut self, received: impl Into<ReceivedTime>) -> Self {
        self.received = received.into();
        self
    }

    /// Make `save_as` fail with the given reason
    pub fn failing_save(mut self, reason: impl Into<String>) -> Self {
        self.save_error = Some(reason.into());
        self
    }
}

impl RawMessage for MemoryMessage {
    fn received_time(&self) -> ReceivedTime {
        self.received.clone()
    }

    fn subject(&self) -> Option<String> {
        self.subject.clone()
    }

    fn entry_id(&self) -> Option<String> {
        self.entry_id.clone()
    }

    fn save_as(&self, path: &Path) -> Result<()> {
        if let Some(reason) = &self.save_error {
            return Err(anyhow!("{}", reason));
        }
        fs::write(path, &self.content)
            .with_context(|| format!("Failed to write message to {}", path.display()))
    }
}

/// A folder held in memory
#[derive(Debug, Clone)]
pub struct MemoryFolder {
    name: String,
    messages: Vec<MemoryMessage>,
    children: Vec<MemoryFolder>,
    unavailable: Option<String>,
}

impl MemoryFolder {
    /// Create an empty folder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            children: Vec::new(),
            unavailable: None,
        }
    }

    pub fn with_message(mut self, message: MemoryMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_subfolder(mut self, folder: MemoryFolder) -> Self {
        self.children.push(folder);
        self
    }

    /// Make the folder's item collection inaccessible
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    pub fn push_message(&mut self, message: MemoryMessage) {
        self.messages.push(message);
    }

    pub fn push_subfolder(&mut self, folder: MemoryFolder) {
        self.children.push(folder);
    }
}

impl MailFolder for MemoryFolder {
    fn name(&self) -> &str {
        &self.name
    }

    fn items(&self) -> Result<Box<dyn ItemCollection>> {
        if let Some(reason) = &self.unavailable {
            return Err(anyhow!("Folder '{}' is unavailable: {}", self.name, reason));
        }
        Ok(Box::new(MemoryItems {
            messages: self.messages.clone(),
            cursor: 0,
        }))
    }

    fn subfolders(&self) -> Result<Vec<Box<dyn MailFolder>>> {
        Ok(self
            .children
            .iter()
            .cloned()
            .map(|f| Box::new(f) as Box<dyn MailFolder>)
            .collect())
    }
}

/// Item collection over a snapshot of a memory folder's messages
struct MemoryItems {
    messages: Vec<MemoryMessage>,
    cursor: usize,
}

impl ItemCollection for MemoryItems {
    fn sort(&mut self, key: SortKey, descending: bool) -> Result<()> {
        match key {
            SortKey::ReceivedTime => {
                sort_by_received(&mut self.messages, descending, |m| m.received.clone())
            }
        }
        Ok(())
    }

    fn restrict(&mut self, expression: &str) -> Result<()> {
        let restriction = Restriction::parse(expression)?;
        self.messages.retain(|m| restriction.admits(&m.received));
        self.cursor = 0;
        Ok(())
    }

    fn next_item(&mut self) -> Result<Option<Box<dyn RawMessage>>> {
        let item = self
            .messages
            .get(self.cursor)
            .cloned()
            .map(|m| Box::new(m) as Box<dyn RawMessage>);
        if item.is_some() {
            self.cursor += 1;
        }
        Ok(item)
    }
}
