/*
blinknote - single binary
`serve` hosts the summarization gateway over HTTP; the other subcommands are a
terminal client that summarizes text or pages and keeps a local history.
*/

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use common::{init_db_pool, Config};

use blinknote::cli;
use blinknote::client::RemoteGateway;
use blinknote::gateway::{Gateway, Summarizer};
use blinknote::history::{HistoryStore, SqliteHistoryPort};
use blinknote::server::launch_rocket;
use blinknote::summary::{InputType, SummaryLength, SummaryRequest};

#[derive(Parser, Debug)]
#[command(name = "blinknote", about = "Summarize text or web pages with a language model")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP summarization gateway
    Serve,

    /// Summarize text (or a URL with --url) and record it in history
    Summarize {
        /// Text to summarize, or the page address when --url is set
        input: String,

        /// Treat INPUT as a URL to fetch
        #[arg(long)]
        url: bool,

        /// short, medium or detailed
        #[arg(long, default_value = "medium")]
        length: String,

        /// Post to a remote gateway instead of running the pipeline locally
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },

    /// Inspect or clear the local summary history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List recorded summaries, newest first
    List,
    /// Print one recorded summary
    Show { id: String },
    /// Remove every recorded summary
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    // API keys may live in a local .env file
    dotenv::dotenv().ok();

    let config = load_config(args.config).await?;

    match args.command {
        Command::Serve => {
            let gateway = Gateway::from_config(&config).context("failed to initialize gateway")?;
            launch_rocket(Arc::new(gateway), &config.server).await
        }
        Command::Summarize {
            input,
            url,
            length,
            endpoint,
        } => {
            let summary_length: SummaryLength = length
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid summary length: {}", length))?;
            let input_type = if url { InputType::Url } else { InputType::Text };
            let request = SummaryRequest::new(input, input_type, summary_length);

            let summarizer: Box<dyn Summarizer> = match endpoint.or(config.client.endpoint.clone()) {
                Some(endpoint) => {
                    info!("using remote gateway at {}", endpoint);
                    Box::new(RemoteGateway::new(endpoint)?)
                }
                None => Box::new(Gateway::from_config(&config)?),
            };

            let history = open_history(&config).await?;
            let entry = cli::summarize_and_record(summarizer.as_ref(), &history, &request).await?;
            println!("{}", cli::render_entry(&entry));
            Ok(())
        }
        Command::History { action } => {
            let history = open_history(&config).await?;
            match action {
                HistoryAction::List => {
                    println!("{}", cli::render_list(&history.list().await));
                }
                HistoryAction::Show { id } => {
                    let entries = history.list().await;
                    let entry = entries
                        .iter()
                        .find(|e| e.id == id)
                        .with_context(|| format!("no summary with id {}", id))?;
                    println!("{}", cli::render_entry(entry));
                }
                HistoryAction::Clear { yes } => {
                    let confirmed = yes
                        || cli::confirm(
                            cli::CLEAR_PROMPT,
                            &mut BufReader::new(io::stdin()),
                            &mut io::stdout(),
                        );
                    if confirmed {
                        history.clear().await?;
                        println!("History cleared");
                    } else {
                        println!("Nothing cleared");
                    }
                }
            }
            Ok(())
        }
    }
}

/// `config.default.toml` merged with `--config` (or `config.toml` when present).
async fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    let default_path = PathBuf::from("config.default.toml");

    let override_path = match explicit {
        Some(p) => {
            if !p.exists() {
                error!(path = ?p, "specified config file not found");
                anyhow::bail!("Config file not found: {}", p.display());
            }
            Some(p)
        }
        None => {
            let p = PathBuf::from("config.toml");
            p.exists().then_some(p)
        }
    };

    let config = Config::load_with_defaults(
        default_path.exists().then_some(default_path.as_path()),
        override_path.as_deref(),
    )
    .await
    .context("failed to load configuration")?;
    info!(default = ?default_path, user = ?override_path, "configuration loaded");
    Ok(config)
}

async fn open_history(config: &Config) -> Result<HistoryStore> {
    let pool = init_db_pool(&config.history.path).await?;
    let port = SqliteHistoryPort::new(pool);
    port.ensure_schema().await?;
    Ok(HistoryStore::new(Arc::new(port)))
}
