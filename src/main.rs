//! subsidy-radar CLI
//! Runs one query against the live RVO pages (or the fallback set) and prints JSON.
//!
//! Usage:
//!   subsidy-radar list
//!   subsidy-radar find <name>
//!   subsidy-radar search <query>

use anyhow::{bail, Context, Result};
use subsidy_radar::{FetcherConfig, SubsidyService};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so stdout stays pure JSON.
/// `SUBSIDY_LOG_JSON=1` switches to JSON lines; `RUST_LOG` overrides the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("subsidy_radar=info,scrape=info,warn"));

    let json = std::env::var("SUBSIDY_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

enum Command {
    List,
    Find(String),
    Search(String),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let cmd = args.next().unwrap_or_else(|| "list".to_string());
    let rest = args.collect::<Vec<_>>().join(" ");
    match cmd.as_str() {
        "list" => Ok(Command::List),
        "find" if !rest.is_empty() => Ok(Command::Find(rest)),
        "search" if !rest.is_empty() => Ok(Command::Search(rest)),
        "find" | "search" => bail!("`{cmd}` needs an argument"),
        other => bail!("unknown command `{other}` (expected list | find <name> | search <query>)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let command = parse_args(std::env::args().skip(1))?;
    let cfg = FetcherConfig::from_env();
    let service = SubsidyService::from_config(&cfg).context("building subsidy service")?;

    let out = match command {
        Command::List => {
            let listing = service.listing().await;
            tracing::info!(origin = ?listing.origin, count = listing.records.len(), "listing ready");
            serde_json::to_string_pretty(&listing)?
        }
        Command::Find(name) => match service.find_by_name(&name).await {
            Some(r) => serde_json::to_string_pretty(&r)?,
            None => bail!("no subsidy named `{name}`"),
        },
        Command::Search(q) => serde_json::to_string_pretty(&service.search(&q).await)?,
    };

    println!("{out}");
    Ok(())
}
