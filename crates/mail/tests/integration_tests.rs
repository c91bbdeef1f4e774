//! Integration tests for the mail crate
//!
//! These tests verify the complete flow from a folder tree to the written
//! Markdown and PDF files.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use mail::export::short_hash;
use mail::models::{DecodedMessage, ReceivedTime};
use mail::{
    DecodeError, EmlDecoder, ExportOptions, MailFolder, MaildirFolder, MemoryFolder,
    MemoryMessage, MessageDecoder, PdfRenderer, export_folder, resolve_folder,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Decodes JSON containers; "LOCKED" stands in for protected content
struct JsonDecoder;

impl MessageDecoder for JsonDecoder {
    fn extension(&self) -> &str {
        "json"
    }

    fn decode(&self, path: &Path) -> Result<DecodedMessage, DecodeError> {
        let text = fs::read_to_string(path)?;
        if text == "LOCKED" {
            return Err(DecodeError::Protected("rights-managed message".into()));
        }
        DecodedMessage::from_json(&text).map_err(|e| DecodeError::Unrecognized(e.to_string()))
    }
}

/// Writes a placeholder PDF so the output pair can be checked on disk
struct StubRenderer;

impl PdfRenderer for StubRenderer {
    fn render(&self, markdown: &str, title: &str, output: &Path) -> Result<()> {
        fs::write(output, format!("%PDF-1.7 {} ({} bytes)", title, markdown.len()))?;
        Ok(())
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn json_message(id: &str, subject: &str, received: DateTime<Utc>) -> MemoryMessage {
    let content = serde_json::json!({
        "from": "alice@example.com",
        "subject": subject,
        "body": format!("Body of {}", subject),
    });
    MemoryMessage::new(content.to_string())
        .entry_id(id)
        .subject(subject)
        .received(ReceivedTime::Instant(received))
}

fn options_in(dir: &TempDir) -> ExportOptions {
    ExportOptions {
        output: Some(dir.path().join("export.md")),
        ..Default::default()
    }
}

fn read_markdown(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("export.md")).unwrap()
}

#[test]
fn test_nested_folders_export_depth_first() {
    let out = tempfile::tempdir().unwrap();
    let inbox = MemoryFolder::new("Inbox")
        .with_message(json_message("a", "Welcome", at(2025, 1, 10, 9, 0, 0)))
        .with_subfolder(
            MemoryFolder::new("Receipts")
                .with_message(json_message("b", "Invoice 42", at(2025, 1, 12, 9, 0, 0))),
        );

    let report = export_folder(&inbox, &JsonDecoder, &StubRenderer, &options_in(&out)).unwrap();

    let markdown = read_markdown(&out);
    assert!(markdown.starts_with("# Mail Export\n\n## Welcome ["));

    let welcome = markdown.find("## Welcome [").unwrap();
    let invoice = markdown.find("## Invoice 42 [").unwrap();
    assert!(welcome < invoice, "parent folder messages come first");
    assert!(markdown.contains("- **folder**: Inbox\n"));
    assert!(markdown.contains("- **folder**: Inbox - Receipts\n"));
    assert!(markdown.contains("    Body of Invoice 42"));

    assert!(report.markdown_path.exists());
    assert!(report.pdf_path.exists());
    assert_eq!(report.pdf_path, out.path().join("export.pdf"));
    assert_eq!(report.stats.folders_visited, 2);
    assert_eq!(report.stats.messages_exported, 2);
}

#[test]
fn test_messages_newest_first_within_folder() {
    let out = tempfile::tempdir().unwrap();
    let inbox = MemoryFolder::new("Inbox")
        .with_message(json_message("old", "Oldest", at(2025, 1, 1, 0, 0, 0)))
        .with_message(json_message("new", "Newest", at(2025, 3, 1, 0, 0, 0)))
        .with_message(json_message("mid", "Middle", at(2025, 2, 1, 0, 0, 0)));

    export_folder(&inbox, &JsonDecoder, &StubRenderer, &options_in(&out)).unwrap();

    let markdown = read_markdown(&out);
    let positions: Vec<usize> = ["## Newest [", "## Middle [", "## Oldest ["]
        .iter()
        .map(|heading| markdown.find(heading).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_min_date_boundary_is_inclusive() {
    let out = tempfile::tempdir().unwrap();
    let threshold = at(2025, 1, 1, 0, 0, 0);
    let inbox = MemoryFolder::new("Inbox")
        .with_message(json_message("on", "On the boundary", threshold))
        .with_message(json_message("before", "Just before", at(2024, 12, 31, 23, 59, 59)))
        .with_message(json_message("after", "After", at(2025, 6, 1, 12, 0, 0)))
        .with_message(
            MemoryMessage::new(r#"{"subject": "Undated"}"#)
                .entry_id("undated")
                .received(ReceivedTime::Unknown("sometime".into())),
        );
    let options = ExportOptions {
        min_date: Some(threshold),
        ..options_in(&out)
    };

    let report = export_folder(&inbox, &JsonDecoder, &StubRenderer, &options).unwrap();

    let markdown = read_markdown(&out);
    assert!(markdown.contains("## On the boundary ["));
    assert!(markdown.contains("## After ["));
    assert!(!markdown.contains("Just before"));
    assert!(!markdown.contains("Undated"));
    assert_eq!(report.stats.messages_exported, 2);
}

#[test]
fn test_undated_messages_kept_without_threshold() {
    let out = tempfile::tempdir().unwrap();
    let inbox = MemoryFolder::new("Inbox").with_message(
        MemoryMessage::new(r#"{"subject": "Undated"}"#).received(ReceivedTime::Missing),
    );

    export_folder(&inbox, &JsonDecoder, &StubRenderer, &options_in(&out)).unwrap();

    assert!(read_markdown(&out).contains("## Undated ["));
}

#[test]
fn test_failing_message_does_not_stop_export() {
    let out = tempfile::tempdir().unwrap();
    let inbox = MemoryFolder::new("Inbox")
        .with_message(json_message("1", "First", at(2025, 3, 3, 0, 0, 0)))
        .with_message(
            json_message("2", "Second", at(2025, 3, 2, 0, 0, 0)).failing_save("store offline"),
        )
        .with_message(json_message("3", "Third", at(2025, 3, 1, 0, 0, 0)));

    let report = export_folder(&inbox, &JsonDecoder, &StubRenderer, &options_in(&out)).unwrap();

    let markdown = read_markdown(&out);
    assert!(markdown.contains("## First ["));
    assert!(!markdown.contains("## Second ["));
    assert!(markdown.contains("## Third ["));
    assert_eq!(report.stats.messages_exported, 2);
    assert_eq!(report.stats.errors, 1);
}

#[test]
fn test_protected_messages_skipped_silently() {
    let out = tempfile::tempdir().unwrap();
    let inbox = MemoryFolder::new("Inbox")
        .with_message(
            MemoryMessage::new("LOCKED")
                .entry_id("secret")
                .subject("Board minutes")
                .received(ReceivedTime::Instant(at(2025, 2, 2, 0, 0, 0))),
        )
        .with_message(json_message("open", "Lunch", at(2025, 2, 1, 0, 0, 0)));

    let report = export_folder(&inbox, &JsonDecoder, &StubRenderer, &options_in(&out)).unwrap();

    assert!(!read_markdown(&out).contains("Board minutes"));
    assert_eq!(report.stats.messages_protected, 1);
    assert_eq!(report.stats.errors, 0);
    assert_eq!(report.stats.messages_exported, 1);
}

#[test]
fn test_missing_subject_uses_placeholder() {
    let out = tempfile::tempdir().unwrap();
    let inbox = MemoryFolder::new("Inbox").with_message(
        MemoryMessage::new(r#"{"from": "bob@example.com", "body": "no subject here"}"#)
            .received(ReceivedTime::Instant(at(2025, 1, 1, 0, 0, 0))),
    );

    export_folder(&inbox, &JsonDecoder, &StubRenderer, &options_in(&out)).unwrap();

    let markdown = read_markdown(&out);
    let heading = markdown
        .lines()
        .find(|l| l.starts_with("## "))
        .unwrap()
        .to_string();
    assert!(heading.starts_with("## (No Subject) ["));
    assert!(heading.ends_with(']'));
    // 8 hex characters between the brackets
    let hash = &heading["## (No Subject) [".len()..heading.len() - 1];
    assert_eq!(hash.len(), 8);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_short_hash_is_deterministic() {
    let path = PathBuf::from("/tmp/mailbook_x/2fd4e1c67a2d28fced849ee1bb76e7391b93eb12.eml");
    assert_eq!(short_hash(&path), short_hash(&path));
    assert_ne!(
        short_hash(&path),
        short_hash(Path::new("/tmp/mailbook_y/other.eml"))
    );
}

#[test]
fn test_unavailable_subfolder_keeps_partial_export() {
    let out = tempfile::tempdir().unwrap();
    let inbox = MemoryFolder::new("Inbox")
        .with_message(json_message("a", "Kept", at(2025, 1, 1, 0, 0, 0)))
        .with_subfolder(MemoryFolder::new("Shared").unavailable("permission denied"));

    let err = export_folder(&inbox, &JsonDecoder, &StubRenderer, &options_in(&out)).unwrap_err();

    assert!(format!("{:#}", err).contains("permission denied"));
    assert!(read_markdown(&out).contains("## Kept ["));
    assert!(out.path().join("export.pdf").exists());
}

fn write_eml(folder: &Path, name: &str, subject: &str, body: &str) {
    let cur = folder.join("cur");
    fs::create_dir_all(&cur).unwrap();
    fs::create_dir_all(folder.join("new")).unwrap();
    fs::create_dir_all(folder.join("tmp")).unwrap();
    let content = format!(
        "From: Alice <alice@example.com>\r\n\
         To: bob@example.com\r\n\
         Subject: {}\r\n\
         Date: Mon, 13 Jan 2025 10:00:00 +0000\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {}\r\n",
        subject, body
    );
    fs::write(cur.join(name), content).unwrap();
}

#[test]
fn test_maildir_export_end_to_end() {
    let mail_root = tempfile::tempdir().unwrap();
    let account = mail_root.path().join("work");
    let inbox = account.join("Inbox");
    write_eml(
        &inbox,
        "1736762400.M1P1.host:2,S",
        "Quarterly report",
        "Numbers attached.\r\n\r\n\r\nRegards",
    );
    write_eml(
        &inbox.join("Receipts"),
        "1736766000.M2P1.host:2,S",
        "Your receipt",
        "Thanks for your order",
    );

    let root = MaildirFolder::open(&account).unwrap();
    let folder = resolve_folder(Box::new(root), "Inbox", "/").unwrap();
    assert_eq!(folder.name(), "Inbox");

    let out = tempfile::tempdir().unwrap();
    let options = ExportOptions {
        title: "Work mail".into(),
        ..options_in(&out)
    };
    let report = export_folder(folder.as_ref(), &EmlDecoder, &StubRenderer, &options).unwrap();

    let markdown = read_markdown(&out);
    assert!(markdown.starts_with("# Work mail\n"));
    assert!(markdown.contains("## Quarterly report ["));
    assert!(markdown.contains("- **from**: Alice <alice@example.com>"));
    assert!(markdown.contains("    Numbers attached.\n    \n    Regards"));
    assert!(markdown.contains("- **folder**: Inbox - Receipts"));
    assert_eq!(report.stats.messages_exported, 2);
    assert!(report.pdf_path.exists());
}

#[test]
fn test_unknown_folder_path_is_reported() {
    let account = MemoryFolder::new("work").with_subfolder(MemoryFolder::new("Inbox"));
    let err = resolve_folder(Box::new(account), "Inbox/Archive", "/")
        .err()
        .unwrap();
    assert!(err.to_string().contains("Folder 'Archive' not found in 'Inbox'"));
}
