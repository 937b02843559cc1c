//! Bulk Mailer - Entry Point
//!
//! Renders and dispatches one email per CSV record through AWS SES,
//! deduplicating repeat submissions and bounding concurrency.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::Result;
use mailer::{
    Dispatcher, MailerConfig, MessageTemplates, MockTransport, RunSummary, SesTransport,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

mod batch;

#[derive(Parser)]
#[command(name = "bulk-mailer")]
#[command(about = "Render and send one email per batch record through AWS SES")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a batch of emails
    Send {
        /// CSV batch file: from_address,to_address,subject,message per row, no header
        #[arg(short, long)]
        batch: PathBuf,

        /// Plain-text template file
        #[arg(short, long)]
        text_template: Option<PathBuf>,

        /// HTML template file
        #[arg(short = 'H', long)]
        html_template: Option<PathBuf>,

        /// Worker pool width; 1 disables pooling (default: MAILER_CONCURRENCY)
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Render and count without calling the provider
        #[arg(long)]
        dry_run: bool,

        /// Print the summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            batch,
            text_template,
            html_template,
            concurrency,
            dry_run,
            json,
        } => match send(batch, text_template, html_template, concurrency, dry_run).await {
            Ok(summary) => {
                report(&summary, json)?;
                Ok(())
            }
            Err(err) => {
                // Fatal conditions still yield a report before exiting non-zero
                error!(error = %err, "Run aborted");
                report(&RunSummary::default(), json)?;
                Err(err)
            }
        },
    }
}

async fn send(
    batch_path: PathBuf,
    text_template: Option<PathBuf>,
    html_template: Option<PathBuf>,
    concurrency: Option<usize>,
    dry_run: bool,
) -> Result<RunSummary> {
    let config = MailerConfig::from_env()?;
    let concurrency = concurrency.unwrap_or(config.concurrency);

    let templates = MessageTemplates::new(
        batch::load_template(text_template.as_deref()),
        batch::load_template(html_template.as_deref()),
    );

    let records = batch::read_batch(&batch_path)?;
    info!(records = records.len(), batch = %batch_path.display(), "Loaded batch");

    let summary = if dry_run {
        warn!("Dry run: using the mock transport, nothing will be delivered");
        let dispatcher = Dispatcher::new(MockTransport::new(), templates, concurrency)?;
        dispatcher.run(records).await?
    } else {
        let transport = SesTransport::from_env().await?;
        let dispatcher = Dispatcher::new(transport, templates, concurrency)?;
        dispatcher.run(records).await?
    };

    Ok(summary)
}

/// Surface the final counts and every accumulated error line in append
/// order. Per-record errors do not affect the exit code.
fn report(summary: &RunSummary, json: bool) -> Result<()> {
    info!(
        sent = summary.sent,
        skipped = summary.skipped,
        errors = summary.errors.len(),
        "Send email complete"
    );

    for line in &summary.errors {
        error!("{line}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }

    Ok(())
}
