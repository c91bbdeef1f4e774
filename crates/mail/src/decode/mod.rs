//! Message container decoding
//!
//! A decoder turns a serialized message container into a [`DecodedMessage`]
//! field mapping. Content the decoder cannot read because it is encrypted or
//! otherwise protected is reported as [`DecodeError::Protected`], so callers
//! can tell it apart from genuine failures.

mod eml;

pub use eml::{EmlDecoder, decode_eml};

use std::path::Path;

use crate::models::DecodedMessage;

/// Errors raised at the decoder boundary
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Message content is protected: {0}")]
    Protected(String),
    #[error("Unrecognized message container: {0}")]
    Unrecognized(String),
    #[error("Failed to read message container: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Whether this failure is expected for protected content
    pub fn is_protected(&self) -> bool {
        matches!(self, DecodeError::Protected(_))
    }
}

/// Decodes serialized message containers into field mappings
pub trait MessageDecoder {
    /// File extension used for containers this decoder reads
    fn extension(&self) -> &str;

    /// Decode the container at `path`
    fn decode(&self, path: &Path) -> Result<DecodedMessage, DecodeError>;
}
