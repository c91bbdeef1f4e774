//! Folder path from the account root to the folder being walked

use std::fmt;

/// Ordered folder names from the traversal root down to the current folder
///
/// Recomputed at every traversal step and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FolderPath(Vec<String>);

impl FolderPath {
    /// Path consisting of a single root folder
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Path of a child folder directly below this one
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Name of the innermost folder
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Join the segments with an arbitrary separator
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    /// Form used on the `- **folder**:` line of an exported message
    pub fn display_label(&self) -> String {
        self.join(" - ")
    }
}

impl From<Vec<String>> for FolderPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("/"))
    }
}
