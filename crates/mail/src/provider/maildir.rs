//! Maildir folder-tree provider
//!
//! Reads a directory tree where every folder is a Maildir (`cur/`, `new/`,
//! `tmp/`) and child folders are nested directories, the layout produced by
//! mbsync and offlineimap:
//! ```text
//! ~/Mail/work/
//!   Inbox/
//!     cur/1700000000.M1P1.host:2,S
//!     new/
//!     Receipts/
//!       cur/
//! ```

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::sort_by_received;
use super::{ItemCollection, MailFolder, RawMessage, Restriction, SortKey};
use crate::models::ReceivedTime;

/// Maildir subdirectories holding messages
const MESSAGE_DIRS: [&str; 2] = ["cur", "new"];

/// Maildir subdirectories that are never child folders
const RESERVED_DIRS: [&str; 3] = ["cur", "new", "tmp"];

/// Separator between the unique name and the info flags (`:2,FS`)
const INFO_SEPARATOR: &str = ":2,";

/// A Maildir folder on disk
#[derive(Debug, Clone)]
pub struct MaildirFolder {
    name: String,
    path: PathBuf,
}

impl MaildirFolder {
    /// Open the folder at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_dir() {
            bail!("Mail folder does not exist: {}", path.display());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Collect message files from `cur/` and `new/`
    fn message_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for subdir in MESSAGE_DIRS {
            let dir = self.path.join(subdir);
            if !dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&dir)
                .with_context(|| format!("Failed to list {}", dir.display()))?
            {
                let path = entry?.path();
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        // Directory listing order is unspecified; fix a baseline before sorting
        files.sort();
        Ok(files)
    }
}

impl MailFolder for MaildirFolder {
    fn name(&self) -> &str {
        &self.name
    }

    fn items(&self) -> Result<Box<dyn ItemCollection>> {
        let messages = self
            .message_files()?
            .into_iter()
            .map(MaildirMessage::new)
            .collect();
        Ok(Box::new(MaildirItems {
            messages,
            cursor: 0,
        }))
    }

    fn subfolders(&self) -> Result<Vec<Box<dyn MailFolder>>> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.path)
            .with_context(|| format!("Failed to list {}", self.path.display()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || RESERVED_DIRS.contains(&name.as_str()) {
                continue;
            }
            if entry.path().is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();

        dirs.into_iter()
            .map(|path| Ok(Box::new(MaildirFolder::open(path)?) as Box<dyn MailFolder>))
            .collect()
    }
}

/// A message file inside a Maildir
#[derive(Debug, Clone)]
pub struct MaildirMessage {
    path: PathBuf,
    received: ReceivedTime,
}

impl MaildirMessage {
    fn new(path: PathBuf) -> Self {
        let received = received_time_for(&path);
        Self { path, received }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

impl RawMessage for MaildirMessage {
    fn received_time(&self) -> ReceivedTime {
        self.received.clone()
    }

    fn subject(&self) -> Option<String> {
        let raw = fs::read(&self.path).ok()?;
        mail_parser::MessageParser::default()
            .parse(&raw)?
            .subject()
            .map(str::to_string)
    }

    fn entry_id(&self) -> Option<String> {
        let name = self.file_name()?;
        let unique = name.split(INFO_SEPARATOR).next().unwrap_or(name);
        Some(unique.to_string())
    }

    fn save_as(&self, path: &Path) -> Result<()> {
        fs::copy(&self.path, path).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                self.path.display(),
                path.display()
            )
        })?;
        Ok(())
    }
}

/// Received time of a Maildir file
///
/// Delivery agents put the delivery time (seconds since the epoch) at the
/// start of the unique name; the file's modification time is the fallback.
fn received_time_for(path: &Path) -> ReceivedTime {
    if let Some(at) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(delivery_time)
    {
        return ReceivedTime::Instant(at);
    }

    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => ReceivedTime::Instant(DateTime::<Utc>::from(modified)),
        Err(_) => ReceivedTime::Missing,
    }
}

/// Parse the delivery timestamp from a Maildir unique name
fn delivery_time(file_name: &str) -> Option<DateTime<Utc>> {
    let secs = file_name.split('.').next()?;
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Utc.timestamp_opt(secs.parse().ok()?, 0).single()
}

/// Item collection over the files of one Maildir folder
struct MaildirItems {
    messages: Vec<MaildirMessage>,
    cursor: usize,
}

impl ItemCollection for MaildirItems {
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
