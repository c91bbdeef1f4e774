//! Export document assembly

use super::normalize::render_record;
use crate::models::MessageRecord;

/// Title used when none is configured
pub const DEFAULT_TITLE: &str = "Mail Export";

/// Append-only buffer of Markdown blocks
///
/// Seeded with a title heading; blocks keep the order they were appended in.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    blocks: Vec<String>,
    messages: usize,
}

impl ExportDocument {
    /// Start a document with a top-level title heading
    pub fn new(title: &str) -> Self {
        Self {
            blocks: vec![format!("# {}\n", title)],
            messages: 0,
        }
    }

    /// Append raw blocks in the given order
    pub fn append<I>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.blocks.extend(blocks);
    }

    /// Append the rendered blocks of one message
    pub fn append_record(&mut self, record: &MessageRecord) {
        self.append(render_record(record));
        self.messages += 1;
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Number of messages appended so far
    pub fn message_count(&self) -> usize {
        self.messages
    }

    /// Join all blocks with newlines
    pub fn render(&self) -> String {
        self.blocks.join("\n")
    }
}

impl Default for ExportDocument {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, FolderPath, RecordField};

    fn record(subject: &str, hash: &str) -> MessageRecord {
        MessageRecord {
            short_hash: hash.into(),
            subject: subject.into(),
            folder_path: FolderPath::root("Inbox"),
            fields: vec![RecordField {
                key: "from".into(),
                value: FieldValue::Inline("a@example.com".into()),
            }],
        }
    }

    #[test]
    fn test_seeded_with_title() {
        let document = ExportDocument::default();
        assert_eq!(document.blocks(), ["# Mail Export\n"]);
        assert_eq!(document.render(), "# Mail Export\n");
        assert_eq!(document.message_count(), 0);
    }

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut document = ExportDocument::new("Archive");
        document.append(vec!["b".to_string(), "a".to_string()]);
        document.append(vec!["b".to_string()]);

        assert_eq!(document.render(), "# Archive\n\nb\na\nb");
    }

    #[test]
    fn test_append_records() {
        let mut document = ExportDocument::new("Archive");
        document.append_record(&record("First", "11111111"));
        document.append_record(&record("Second", "22222222"));

        let text = document.render();
        let first = text.find("## First [11111111]").unwrap();
        let second = text.find("## Second [22222222]").unwrap();

        assert!(first < second);
        assert_eq!(document.message_count(), 2);
        assert!(text.contains("- **from**: a@example.com\n\n## Second"));
    }
}
