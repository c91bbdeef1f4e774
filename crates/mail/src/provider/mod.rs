//! Folder-tree providers
//!
//! This module defines the narrow interface the export pipeline uses to reach
//! a mail store: folders with names and children, and item collections that
//! can be sorted, restricted and iterated. The trait-based design keeps the
//! traversal independent of any particular store's connection mechanics.

mod maildir;
mod memory;
mod restriction;
mod traits;

pub use maildir::{MaildirFolder, MaildirMessage};
pub use memory::{MemoryFolder, MemoryMessage};
pub use restriction::{Restriction, RestrictionError};
pub use traits::{ItemCollection, MailFolder, RawMessage, SortKey, resolve_folder};
