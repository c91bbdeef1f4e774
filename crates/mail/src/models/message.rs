//! Message models: the decoder's field mapping and the exported record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FolderPath;

/// Heading text used when a message has no subject
pub const NO_SUBJECT: &str = "(No Subject)";

/// Field mapping produced by a message decoder
///
/// Keys keep the order the decoder inserted them in. Values are loosely typed
/// (string, number, nested structure), so consumers must not assume a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodedMessage {
    fields: Map<String, Value>,
}

impl DecodedMessage {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used heavily by decoders and tests
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field, replacing any previous value while keeping its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Parse a JSON object into a mapping
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Subject as a string, if the decoder produced a non-empty one
    pub fn subject(&self) -> Option<&str> {
        self.fields
            .get("subject")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Fields in decoder order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for DecodedMessage {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Formatted value of one exported field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Rendered on the bullet line itself
    Inline(String),
    /// Normalized multi-line text rendered as an indented fenced block
    Block(String),
}

/// One `(key, formatted value)` pair of an exported message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub key: String,
    pub value: FieldValue,
}

/// A message ready to be written into the export document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// 8 hex characters derived from the message's transient storage path
    pub short_hash: String,
    /// Subject, or [`NO_SUBJECT`] when the message had none
    pub subject: String,
    /// Folder the message was found in
    pub folder_path: FolderPath,
    /// Remaining fields in decoder order
    pub fields: Vec<RecordField>,
}

impl MessageRecord {
    /// The heading line identifying this message in the document
    pub fn heading(&self) -> String {
        format!("## {} [{}]", self.subject, self.short_hash)
    }

    /// Look up a field by key
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decoded_preserves_insertion_order() {
        let decoded = DecodedMessage::new()
            .with("to", "b@example.com")
            .with("from", "a@example.com")
            .with("body", "hello");

        let keys: Vec<&str> = decoded.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["to", "from", "body"]);
    }

    #[test]
    fn test_decoded_from_json_keeps_order() {
        let decoded = DecodedMessage::from_json(r#"{"zeta": 1, "alpha": {"x": true}}"#).unwrap();
        let keys: Vec<&str> = decoded.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(decoded.get("alpha"), Some(&json!({"x": true})));
    }

    #[test]
    fn test_subject_ignores_blank_and_non_string() {
        assert_eq!(DecodedMessage::new().with("subject", "Hi").subject(), Some("Hi"));
        assert_eq!(DecodedMessage::new().with("subject", "  ").subject(), None);
        assert_eq!(DecodedMessage::new().with("subject", Value::Null).subject(), None);
        assert_eq!(DecodedMessage::new().subject(), None);
    }

    #[test]
    fn test_record_heading() {
        let record = MessageRecord {
            short_hash: "deadbeef".into(),
            subject: "Quarterly report".into(),
            folder_path: FolderPath::root("Inbox"),
            fields: vec![RecordField {
                key: "from".into(),
                value: FieldValue::Inline("a@example.com".into()),
            }],
        };

        assert_eq!(record.heading(), "## Quarterly report [deadbeef]");
        assert_eq!(
            record.field("from"),
            Some(&FieldValue::Inline("a@example.com".into()))
        );
        assert_eq!(record.field("cc"), None);
    }
}
