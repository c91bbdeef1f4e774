//! Domain models for export entities

mod folder_path;
mod message;
mod received;

pub use folder_path::FolderPath;
pub use message::{DecodedMessage, FieldValue, MessageRecord, NO_SUBJECT, RecordField};
pub use received::ReceivedTime;
