//! PDF rendering through an external converter
//!
//! The Markdown is piped to the converter's stdin. Arguments may contain the
//! placeholders `{output}` and `{title}`, substituted per run.

use anyhow::{Context, Result, bail};
use log::debug;
use std::io::{self, Write};
use std::path::Path;
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

use super::PdfRenderer;

const OUTPUT_PLACEHOLDER: &str = "{output}";
const TITLE_PLACEHOLDER: &str = "{title}";

/// Renders PDFs by running a converter such as pandoc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// pandoc reading Markdown from stdin
    pub fn pandoc() -> Self {
        Self::new("pandoc", Self::default_command()[1..].to_vec())
    }

    /// Default command line, program first
    pub fn default_command() -> Vec<String> {
        [
            "pandoc",
            "--from",
            "markdown",
            "--metadata",
            "title={title}",
            "--output",
            "{output}",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Build from a command line given as program followed by arguments
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        match argv.split_first() {
            Some((program, args)) if !program.is_empty() => {
                Ok(Self::new(program.clone(), args.to_vec()))
            }
            _ => bail!("PDF command must name a program"),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn expand_args(&self, title: &str, output: &Path) -> Vec<String> {
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(OUTPUT_PLACEHOLDER, &output)
                    .replace(TITLE_PLACEHOLDER, title)
            })
            .collect()
    }
}

impl Default for CommandPdfRenderer {
    fn default() -> Self {
        Self::pandoc()
    }
}

impl PdfRenderer for CommandPdfRenderer {
    fn render(&self, markdown: &str, title: &str, output: &Path) -> Result<()> {
        let args = self.expand_args(title, output);
        debug!("Running {} {:?}", self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start PDF converter '{}'", self.program))?;

        // stdin is fed from its own thread while stderr is drained here
        let stdin = child.stdin.take();
        let (fed, result) = thread::scope(|scope| {
            let writer = scope.spawn(move || feed_stdin(stdin, markdown));
            let result = child.wait_with_output();
            let fed = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (fed, result)
        });

        let result = result
            .with_context(|| format!("Failed to wait for PDF converter '{}'", self.program))?;
        if !result.status.success() {
            bail!(
                "PDF converter '{}' failed ({}): {}",
                self.program,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }
        fed.with_context(|| format!("Failed to send Markdown to '{}'", self.program))?;
        Ok(())
    }
}

/// Write the Markdown and close the pipe
///
/// A converter may stop reading early; its exit status is what counts then.
fn feed_stdin(stdin: Option<ChildStdin>, markdown: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(markdown.as_bytes()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        written => written,
    }
}
