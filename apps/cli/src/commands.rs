//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use backfeed_core::{Document, decode_feed};
use backfeed_shared::{AppConfig, load_config, load_config_from, validate_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// backfeed — turn a JSON feed backup into a normalized document collection.
#[derive(Parser)]
#[command(
    name = "backfeed",
    version,
    about = "Decode JSON feed backups into normalized documents with classified attachments.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path (defaults to ~/.backfeed/backfeed.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured worker concurrency.
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Override the image-extension allow-list (comma-separated, e.g. "png,jpg").
    #[arg(long, value_delimiter = ',', global = true)]
    pub image_extensions: Option<Vec<String>>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Decode a feed backup and print a human-readable summary.
    Inspect {
        /// Path to the feed export (JSON file).
        file: PathBuf,
    },

    /// Decode a feed backup and write the document as JSON to stdout.
    Export {
        /// Path to the feed export (JSON file).
        file: PathBuf,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Crates covered by the default log filter.
const LOG_TARGETS: &[&str] = &[
    "backfeed_cli",
    "backfeed_core",
    "backfeed_feed",
    "backfeed_richtext",
    "backfeed_attachments",
    "backfeed_shared",
];

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Inspect { file } => cmd_inspect(&file, &config).await,
        Command::Export { file, pretty } => cmd_export(&file, pretty, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Merge config file values with CLI overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(concurrency) = cli.concurrency {
        config.executor.concurrency = concurrency;
    }
    if let Some(extensions) = &cli.image_extensions {
        config.classifier.image_extensions = extensions.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_inspect(file: &PathBuf, config: &AppConfig) -> Result<()> {
    let document = decode_feed(file, config).await?;
    print_summary(&document);
    Ok(())
}

async fn cmd_export(file: &PathBuf, pretty: bool, config: &AppConfig) -> Result<()> {
    let document = decode_feed(file, config).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{json}");

    info!(posts = document.posts.len(), "exported document");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = backfeed_shared::init_config()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn print_summary(document: &Document) {
    println!("{}", document.title);
    println!("  site:    {}", document.web_page_url);
    println!("  feed:    {}", document.feed_url);
    println!("  posts:   {}", document.posts.len());
    println!();

    for post in &document.posts {
        let preview: String = post.content_plain.chars().take(60).collect();
        println!(
            "  {}  {}",
            post.date_published.format("%Y-%m-%d"),
            post.web_url
        );
        println!("    {}", preview.trim_end().replace('\n', " "));
        if !post.attachments.image_links.is_empty() || !post.attachments.web_links.is_empty() {
            println!(
                "    attachments: {} image(s), {} link(s)",
                post.attachments.image_links.len(),
                post.attachments.web_links.len()
            );
        }
    }
}
