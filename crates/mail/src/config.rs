//! Export settings
//!
//! Loaded from (in order of priority):
//! 1. Environment variable `MAILBOOK_PDF_COMMAND` (PDF command only), either
//!    a JSON array (`["/opt/My Tools/md2pdf", "-o", "{output}"]`) or a
//!    whitespace-separated command line
//! 2. JSON file in the Mailbook config directory (`export.json`, see
//!    `MAILBOOK_CONFIG_DIR`)
//! 3. Built-in defaults

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::export::{DEFAULT_OUTPUT, DEFAULT_TITLE, ExportOptions, NormalizeOptions};
use crate::render::CommandPdfRenderer;

/// Settings filename in the Mailbook config directory
const SETTINGS_FILE: &str = "export.json";

/// Environment variable overriding the PDF converter command line
const PDF_COMMAND_ENV: &str = "MAILBOOK_PDF_COMMAND";

/// User-level defaults for export runs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Document title
    pub title: String,
    /// Markdown output path
    pub output: PathBuf,
    /// Separator used in folder paths given on the command line
    pub folder_separator: String,
    /// Prefix of the per-run scratch directory
    pub temp_prefix: String,
    /// Directory holding one Maildir tree per account
    pub mail_root: String,
    /// PDF converter command line, program first
    pub pdf_command: Vec<String>,
    /// Escape Markdown-significant characters in field values
    pub escape_markdown: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            folder_separator: "/".to_string(),
            temp_prefix: "mailbook_".to_string(),
            mail_root: "~/Mail".to_string(),
            pdf_command: CommandPdfRenderer::default_command(),
            escape_markdown: false,
        }
    }
}

impl ExportSettings {
    /// Load settings from the config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        let mut settings: Self = config::load_json_or_default(SETTINGS_FILE)?;
        settings.apply_env()?;
        Ok(settings)
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut settings: Self = config::load_json_file(path)?;
        settings.apply_env()?;
        Ok(settings)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(command) = std::env::var(PDF_COMMAND_ENV)
            && let Some(argv) = parse_command(&command)
                .with_context(|| format!("Invalid {}", PDF_COMMAND_ENV))?
        {
            self.pdf_command = argv;
        }
        Ok(())
    }

    /// Get the default settings file path (~/.config/mailbook/export.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }

    /// Mail root with `~` expanded
    pub fn mail_root_path(&self) -> PathBuf {
        config::expand_home(&self.mail_root)
    }

    /// Renderer for the configured PDF command
    pub fn pdf_renderer(&self) -> Result<CommandPdfRenderer> {
        CommandPdfRenderer::from_argv(&self.pdf_command)
    }

    /// Export options seeded from these settings
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            min_date: None,
            output: Some(self.output.clone()),
            title: self.title.clone(),
            temp_prefix: self.temp_prefix.clone(),
            normalize: NormalizeOptions {
                escape_markdown: self.escape_markdown,
            },
        }
    }
}

/// Parse a command given as a JSON argv or a whitespace-separated line
///
/// The plain form cannot carry arguments containing spaces; use the JSON
/// form for those. `None` when the command is blank.
fn parse_command(command: &str) -> Result<Option<Vec<String>>> {
    let command = command.trim();
    let argv: Vec<String> = if command.starts_with('[') {
        serde_json::from_str(command).context("Expected a JSON array of strings")?
    } else {
        command.split_whitespace().map(str::to_string).collect()
    };

    match argv.first() {
        None => Ok(None),
        Some(program) if program.is_empty() => bail!("Command must name a program"),
        Some(_) => Ok(Some(argv)),
    }
}
