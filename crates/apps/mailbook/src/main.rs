//! Mailbook - export a mail folder tree to a Markdown and PDF notebook

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use mail::{EmlDecoder, ExportSettings, MailFolder, MaildirFolder, parse_min_date, resolve_folder};

#[derive(Parser, Debug)]
#[command(name = "mailbook", version, about = "Export a mail folder tree to Markdown and PDF")]
struct Args {
    /// Account directory under the mail root
    #[arg(long)]
    account: String,

    /// Folder path below the account, e.g. "Inbox/Receipts"
    #[arg(long)]
    folder: String,

    /// Separator used in --folder (defaults to the configured separator)
    #[arg(long)]
    separator: Option<String>,

    /// Only export messages received on or after this date (YYYY-MM-DD, UTC)
    #[arg(long)]
    min_date: Option<String>,

    /// Markdown output path; the PDF is written next to it
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Directory holding one Maildir tree per account
    #[arg(long)]
    mail_root: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Escape Markdown-significant characters in subjects and field values
    #[arg(long)]
    escape_markdown: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Export failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let settings = ExportSettings::load().context("Failed to load export settings")?;

    let mut options = settings.export_options();
    if let Some(output) = args.output {
        options.output = Some(output);
    }
    if let Some(title) = args.title {
        options.title = title;
    }
    if args.escape_markdown {
        options.normalize.escape_markdown = true;
    }
    if let Some(min_date) = &args.min_date {
        options.min_date = Some(parse_min_date(min_date)?);
    }

    let mail_root = args
        .mail_root
        .unwrap_or_else(|| settings.mail_root_path());
    let account = MaildirFolder::open(mail_root.join(&args.account))
        .with_context(|| format!("Unknown account '{}'", args.account))?;
    let separator = args
        .separator
        .unwrap_or_else(|| settings.folder_separator.clone());
    let folder = resolve_folder(Box::new(account), &args.folder, &separator)?;
    info!("Exporting folder '{}' of account '{}'", folder.name(), args.account);

    let renderer = settings.pdf_renderer()?;
    let report = mail::export_folder(folder.as_ref(), &EmlDecoder, &renderer, &options)?;

    info!(
        "Export complete: {} messages, markdown {}, pdf {}",
        report.stats.messages_exported,
        report.markdown_path.display(),
        report.pdf_path.display()
    );
    Ok(())
}
