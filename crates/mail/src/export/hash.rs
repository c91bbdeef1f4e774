//! Message identity hashing

use sha1::{Digest, Sha1};
use std::path::Path;

/// Length of the short hash shown in document headings
pub const SHORT_HASH_LEN: usize = 8;

fn sha1_hex(input: &str) -> String {
    format!("{:x}", Sha1::digest(input.as_bytes()))
}

/// Filesystem-safe storage name for a message identifier
///
/// The full digest is used so names never collide, whatever the subject or
/// identifier contains.
pub fn storage_name(identifier: &str) -> String {
    sha1_hex(identifier)
}

/// Short identifier derived from a message's transient storage path
///
/// Only needs to be unique within one export run.
pub fn short_hash(storage_path: &Path) -> String {
    let mut digest = sha1_hex(&storage_path.to_string_lossy());
    digest.truncate(SHORT_HASH_LEN);
    digest
}

/// Identifier used when the store has no durable entry id
///
/// Keeps only alphanumerics, spaces, `_` and `-` from the subject and appends
/// the 1-based sequence number within the folder.
pub fn fallback_identifier(subject: Option<&str>, sequence: usize) -> String {
    let fallback = format!("message_{}", sequence);
    let subject = subject.filter(|s| !s.is_empty()).unwrap_or(&fallback);
    let safe: String = subject
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    format!("{}_{}", safe.trim_end(), sequence)
}
