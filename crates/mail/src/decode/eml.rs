//! RFC 5322 (`.eml`) decoder backed by mail-parser

use mail_parser::{Address, Message, MessageParser, MimeHeaders};
use std::fs;
use std::path::Path;

use super::{DecodeError, MessageDecoder};
use crate::models::DecodedMessage;

/// Decoder for RFC 5322 message files
#[derive(Debug, Clone, Copy, Default)]
pub struct EmlDecoder;

impl MessageDecoder for EmlDecoder {
    fn extension(&self) -> &str {
        "eml"
    }

    fn decode(&self, path: &Path) -> Result<DecodedMessage, DecodeError> {
        let raw = fs::read(path)?;
        decode_eml(&raw)
    }
}

/// Decode raw RFC 5322 bytes
///
/// Fields are emitted in a fixed order (`from`, `to`, `cc`, `bcc`, `subject`,
/// `date`, `body`) and only when the message carries them.
pub fn decode_eml(raw: &[u8]) -> Result<DecodedMessage, DecodeError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| DecodeError::Unrecognized("not an RFC 5322 message".to_string()))?;

    if message.parts.first().is_none_or(|root| root.headers.is_empty()) {
        return Err(DecodeError::Unrecognized("message has no headers".to_string()));
    }

    if let Some(kind) = protection_kind(&message) {
        return Err(DecodeError::Protected(kind));
    }

    let mut decoded = DecodedMessage::new();

    let addresses = [
        ("from", message.from()),
        ("to", message.to()),
        ("cc", message.cc()),
        ("bcc", message.bcc()),
    ];
    for (key, address) in addresses {
        if let Some(formatted) = address.map(format_address).filter(|s| !s.is_empty()) {
            decoded.insert(key, formatted);
        }
    }

    if let Some(subject) = message.subject() {
        decoded.insert("subject", subject);
    }
    if let Some(date) = message.date() {
        decoded.insert("date", date.to_rfc3339());
    }
    if let Some(body) = message.body_text(0) {
        decoded.insert("body", body.into_owned());
    }

    Ok(decoded)
}

/// Detect encrypted containers by the root part's content type
fn protection_kind(message: &Message<'_>) -> Option<String> {
    let content_type = message.parts.first()?.content_type()?;
    let ctype = content_type.ctype().to_ascii_lowercase();
    let subtype = content_type
        .subtype()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match (ctype.as_str(), subtype.as_str()) {
        ("multipart", "encrypted") | ("application", "pkcs7-mime" | "x-pkcs7-mime") => {
            Some(format!("{}/{}", ctype, subtype))
        }
        _ => None,
    }
}

/// Format an address header as `Name <addr>, addr, ...`
fn format_address(address: &Address<'_>) -> String {
    address
        .iter()
        .filter_map(|addr| match (addr.name(), addr.address()) {
            (Some(name), Some(email)) => Some(format!("{} <{}>", name, email)),
            (None, Some(email)) => Some(email.to_string()),
            (Some(name), None) => Some(name.to_string()),
            (None, None) => None,
        })
        .collect::<Vec<_>>()
        .join(", ")
}
