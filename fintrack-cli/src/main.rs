use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fintrack_client::{ApiClient, ApiError, FinTrackApi, ReviewError, TransferBoard};
use fintrack_core::{chat::FAILURE_REPLY, summarize_categories, StatementKind, TransactionFilter};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};

mod chat;
mod chat_worker;
mod config;
mod logging;
mod state;
mod views;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINTRACK_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "fintrack", version = VERSION, about = "Terminal client for the FinTrack API")]
struct Cli {
    /// API base URL (overrides FINTRACK_API_URL and config.toml)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is reachable
    Status,

    /// List transactions, optionally filtered
    Transactions {
        /// Earliest date, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Latest date, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Vendor / description substring
        #[arg(long)]
        vendor: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Review linked transfer pairs
    Transfers {
        #[arg(long)]
        json: bool,

        #[command(subcommand)]
        action: Option<TransferAction>,
    },

    /// Upload a bank statement (CSV, Excel, or text)
    Upload {
        path: PathBuf,
    },

    /// Talk to the financial assistant
    Chat {
        /// Ask one question and print the answer instead of opening the panel
        #[arg(long, short)]
        message: Option<String>,
    },

    /// Show categories in use
    Categories,

    /// Manage ~/.fintrack/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TransferAction {
    /// Dissolve the pair containing this transaction id
    Unlink { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let interactive_chat = matches!(cli.command, Command::Chat { message: None });
    if interactive_chat {
        logging::init_to_file(cli.verbose, &state::log_path()?)?;
    } else {
        logging::init(cli.verbose);
    }

    let env_url = std::env::var(config::API_URL_ENV).ok();
    let base_url = cfg.effective_base_url(cli.api_url.as_deref(), env_url.as_deref());
    debug!(%base_url, "resolved API base URL");
    let color = std::io::stdout().is_terminal();

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                println!("# effective api.base_url = {base_url}\n");
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Status => {
            let api = connect(&base_url, &cfg)?;
            let msg = api
                .status()
                .await
                .with_context(|| format!("could not reach {}", api.base_url()))?;
            println!("{}: {}", api.base_url(), msg);
        }

        Command::Transactions {
            start,
            end,
            vendor,
            category,
            json,
        } => {
            let filter = TransactionFilter {
                start_date: start,
                end_date: end,
                vendor,
                category,
            };
            list_transactions(&connect(&base_url, &cfg)?, &filter, json, color).await?;
        }

        Command::Transfers { json, action } => {
            let api = connect(&base_url, &cfg)?;
            match action {
                None => review_transfers(&api, json, color).await?,
                Some(TransferAction::Unlink { id }) => unlink_transfer(&api, &id, color).await?,
            }
        }

        Command::Upload { path } => upload(&connect(&base_url, &cfg)?, path).await?,

        Command::Chat { message: Some(message) } => {
            ask_once(&connect(&base_url, &cfg)?, &message).await?
        }

        Command::Chat { message: None } => {
            let api = connect(&base_url, &cfg)?;
            tokio::task::block_in_place(|| chat::run_chat(api, &cfg.chat))?;
        }

        Command::Categories => {
            let txns = connect(&base_url, &cfg)?
                .fetch_transactions(&TransactionFilter::default())
                .await
                .context("could not load transactions")?;
            print!("{}", views::render_categories(&summarize_categories(&txns)));
        }
    }

    Ok(())
}

fn connect(base_url: &str, cfg: &config::Config) -> Result<ApiClient> {
    ApiClient::new(base_url, cfg.timeout()).context("configure API client")
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

async fn list_transactions(
    api: &ApiClient,
    filter: &TransactionFilter,
    json: bool,
    color: bool,
) -> Result<()> {
    if let Err(msg) = filter.validate() {
        bail!(msg);
    }
    if !filter.is_empty() {
        debug!(?filter, "listing with filters");
    }
    let txns = api
        .fetch_transactions(filter)
        .await
        .context("could not load transactions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&txns)?);
    } else {
        print!("{}", views::render_transactions(&txns, color));
    }
    Ok(())
}

async fn review_transfers(api: &ApiClient, json: bool, color: bool) -> Result<()> {
    let mut board = TransferBoard::default();
    board.refresh(api).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(board.pairs())?);
    } else {
        print!("{}", views::render_transfers(board.pairs(), color));
    }
    Ok(())
}

async fn unlink_transfer(api: &ApiClient, id: &str, color: bool) -> Result<()> {
    let mut board = TransferBoard::default();
    match board.unlink(api, id).await {
        Ok(()) => {
            println!("Unlinked {id}\n");
            print!("{}", views::render_transfers(board.pairs(), color));
            Ok(())
        }
        Err(e @ ReviewError::UnlinkFailed(_)) => {
            println!("{}", e.notice());
            Err(e.into())
        }
        Err(e @ ReviewError::LoadFailed(_)) => {
            println!("Unlinked {id}, but {}", e.notice());
            Err(e.into())
        }
    }
}

async fn upload(api: &ApiClient, path: PathBuf) -> Result<()> {
    if !path.is_file() {
        bail!("statement not found: {}", path.display());
    }
    let kind = StatementKind::from_path(&path);
    println!("Uploading {} as {}...", path.display(), kind.label());

    let report = match api.upload_statement(&path).await {
        Ok(r) => r,
        Err(e) => {
            println!("{}", upload_failure_notice(&e));
            return Err(e).with_context(|| format!("uploading {}", path.display()));
        }
    };
    println!("{}", report.summary());
    info!(count = report.count, "statement uploaded");

    // refreshed count
    match api.fetch_transactions(&TransactionFilter::default()).await {
        Ok(txns) => println!("Transactions on file: {}", txns.len()),
        Err(e) => println!("could not load transactions: {e}"),
    }
    Ok(())
}

/// Server-supplied detail when there is one
fn upload_failure_notice(e: &ApiError) -> &str {
    e.detail().unwrap_or("Upload failed. Please try again.")
}

async fn ask_once(api: &ApiClient, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("message is empty");
    }
    match api.ask(message.trim()).await {
        Ok(reply) => {
            println!("{}", reply.response);
            Ok(())
        }
        Err(e) => {
            println!("{FAILURE_REPLY}");
            Err(e).context("chat request failed")
        }
    }
}
