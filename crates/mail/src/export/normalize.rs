//! Field normalization: decoded message to Markdown lines
//!
//! Layout of one exported message:
//! ````text
//! ## <subject> [<short hash>]
//! - **folder**: Inbox - Receipts
//! - **from**: Alice <alice@example.com>
//! - **body**:
//!
//! ```
//!     indented body line
//! ```
//!
//! ````
//! Values are written with their default string form. Markdown escaping is
//! off unless [`NormalizeOptions::escape_markdown`] is set.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::models::{
    DecodedMessage, FieldValue, FolderPath, MessageRecord, NO_SUBJECT, RecordField,
};

/// A line break followed by one or more whitespace-only lines
///
/// Only horizontal whitespace is consumed on the blank lines, so the
/// indentation of the next content line survives.
static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[^\S\n]*\n)+").expect("blank-run pattern is valid"));

const BODY_INDENT: &str = "    ";
const FENCE: &str = "```";

/// Characters with meaning in Markdown inline text
const MARKDOWN_SPECIAL: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '>', '#', '|'];

/// Options controlling how field values are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Backslash-escape Markdown-significant characters in the subject and
    /// inline field values. Bodies are fenced and never escaped.
    pub escape_markdown: bool,
}

/// Build the record for one decoded message
pub fn build_record(
    decoded: &DecodedMessage,
    folder_path: &FolderPath,
    short_hash: &str,
    options: NormalizeOptions,
) -> MessageRecord {
    let subject = match decoded.subject() {
        Some(subject) => inline_text(subject, options),
        None => NO_SUBJECT.to_string(),
    };

    let mut fields = Vec::with_capacity(decoded.len());
    for (key, value) in decoded.iter() {
        let Some(text) = value_to_string(value) else {
            continue;
        };

        if key.eq_ignore_ascii_case("body") {
            let body = normalize_body(&text);
            if !body.is_empty() {
                fields.push(RecordField {
                    key: key.clone(),
                    value: FieldValue::Block(body),
                });
            }
        } else {
            fields.push(RecordField {
                key: key.clone(),
                value: FieldValue::Inline(inline_text(&text, options)),
            });
        }
    }

    MessageRecord {
        short_hash: short_hash.to_string(),
        subject,
        folder_path: folder_path.clone(),
        fields,
    }
}

/// Render a record as Markdown blocks, ending with a separating blank line
pub fn render_record(record: &MessageRecord) -> Vec<String> {
    let mut lines = Vec::with_capacity(record.fields.len() + 4);
    lines.push(record.heading());
    lines.push(format!(
        "- **folder**: {}",
        record.folder_path.display_label()
    ));

    for field in &record.fields {
        match &field.value {
            FieldValue::Inline(value) => lines.push(format!("- **{}**: {}", field.key, value)),
            FieldValue::Block(text) => {
                lines.push(format!("- **{}**:", field.key));
                lines.push(String::new());
                lines.push(FENCE.to_string());
                lines.push(indent_block(text));
                lines.push(FENCE.to_string());
            }
        }
    }

    lines.push(String::new());
    lines
}

/// Normalize a message body
///
/// Line endings become `\n`, the text is trimmed, and every run of blank
/// lines (lines holding only whitespace) collapses to a single empty line.
/// Content lines keep their leading whitespace.
pub fn normalize_body(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    BLANK_RUNS.replace_all(unified.trim(), "\n\n").into_owned()
}

/// Indent every line by four spaces
fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", BODY_INDENT, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Backslash-escape Markdown-significant characters
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn inline_text(text: &str, options: NormalizeOptions) -> String {
    if options.escape_markdown {
        escape_markdown(text)
    } else {
        text.to_string()
    }
}

/// Default string form of a decoded value; `null` counts as absent
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}
