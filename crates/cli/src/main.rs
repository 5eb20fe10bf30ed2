mod http;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use schemars::schema_for;
use scraper::Html;
use statehouse_core::bill::{normalize_bill_id, scrape_bill};
use statehouse_core::config::ScraperConfig;
use statehouse_core::html::absolutize;
use statehouse_core::schema::{Bill, Chamber};
use statehouse_core::timeline::StatusTimeline;
use statehouse_core::PageFetcher;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::http::HttpFetcher;

#[derive(Parser)]
#[command(name = "statehouse")]
#[command(about = "Utah Legislature bill, action and vote scraper", long_about = None)]
struct Cli {
    /// Directory holding scraper.toml and substitutions.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export JSON Schemas for the scraped record types
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Scrape bills (page, status timeline and votes) and print them as JSON
    Bill {
        /// Bill page URL, absolute or relative to the configured site; repeat for several bills
        #[arg(long = "url", required = true)]
        urls: Vec<String>,
        /// Bill id as listed on the session index, e.g. "Second Substitute H.B. 12"
        #[arg(long = "id", required = true)]
        ids: Vec<String>,
        /// Home chamber; defaults to the one named by each bill id
        #[arg(long)]
        chamber: Option<Chamber>,
        #[arg(long)]
        session: String,
        /// SQLite file to upsert scraped bills into
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Build the action timeline of a single status page
    Status {
        #[arg(long)]
        url: String,
        #[arg(long)]
        chamber: Chamber,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for Bill, Action and Vote
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
        Commands::Bill {
            urls,
            ids,
            chamber,
            session,
            db,
        } => bills(&config, &urls, &ids, chamber, &session, db.as_deref()),
        Commands::Status { url, chamber } => status(&config, &url, chamber),
    }
}

fn load_config(dir: Option<&Path>) -> Result<ScraperConfig> {
    match dir {
        Some(dir) => ScraperConfig::load_from_dir(dir)
            .with_context(|| format!("loading config from {}", dir.display())),
        None => Ok(ScraperConfig::default()),
    }
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let bill_schema = schema_for!(statehouse_core::schema::Bill);
    let bill_json = serde_json::to_string_pretty(&bill_schema)?;
    fs::write(out_dir.join("Bill.schema.json"), bill_json)?;

    let action_schema = schema_for!(statehouse_core::schema::Action);
    let action_json = serde_json::to_string_pretty(&action_schema)?;
    fs::write(out_dir.join("Action.schema.json"), action_json)?;

    let vote_schema = schema_for!(statehouse_core::schema::Vote);
    let vote_json = serde_json::to_string_pretty(&vote_schema)?;
    fs::write(out_dir.join("Vote.schema.json"), vote_json)?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}

fn bills(
    config: &ScraperConfig,
    urls: &[String],
    ids: &[String],
    chamber: Option<Chamber>,
    session: &str,
    db: Option<&Path>,
) -> Result<()> {
    anyhow::ensure!(urls.len() == ids.len(), "every --url needs a matching --id");

    let fetcher = HttpFetcher::new(&config.fetch)?;
    let conn = db
        .map(|path| statehouse_core::db::open(&path.to_string_lossy()))
        .transpose()?;

    let listed: Vec<(&str, &str)> = urls
        .iter()
        .zip(ids)
        .map(|(url, id)| (url.as_str(), id.as_str()))
        .collect();
    let scraped = scrape_bills(&fetcher, config, conn.as_ref(), chamber, session, &listed);
    for bill in &scraped {
        println!("{}", serde_json::to_string_pretty(bill)?);
    }

    info!(scraped = scraped.len(), failed = listed.len() - scraped.len(), "done");
    Ok(())
}

/// Scrapes and stores each `(url, listed id)` pair. A bill that fails at any
/// step is logged and left out; the others still run.
fn scrape_bills<F: PageFetcher>(
    fetcher: &F,
    config: &ScraperConfig,
    conn: Option<&Connection>,
    chamber: Option<Chamber>,
    session: &str,
    listed: &[(&str, &str)],
) -> Vec<Bill> {
    let scrape_one = |url: &str, id: &str| -> Result<Bill> {
        let chamber = match chamber {
            Some(chamber) => chamber,
            None => {
                Chamber::from_bill_index(&normalize_bill_id(id, &config.bills.substitutions))?
            }
        };
        let bill = scrape_bill(fetcher, config, session, chamber, id, url)?;
        if let Some(conn) = conn {
            statehouse_core::db::upsert_bill(conn, &bill)
                .with_context(|| format!("storing {}", bill.bill_id))?;
        }
        Ok(bill)
    };

    let mut scraped = Vec::new();
    for &(url, id) in listed {
        let url = absolutize(&config.site.base_url, url);
        match scrape_one(&url, id) {
            Ok(bill) => scraped.push(bill),
            Err(err) => error!(url = %url, id, error = %format!("{err:#}"), "skipping bill"),
        }
    }
    scraped
}

fn status(config: &ScraperConfig, url: &str, chamber: Chamber) -> Result<()> {
    let url = absolutize(&config.site.base_url, url);
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let body = fetcher.fetch(&url)?;
    let page = Html::parse_document(&body);

    let actions = StatusTimeline::new(&fetcher, &config.votes)?.build(&page, &url, chamber)?;
    println!("{}", serde_json::to_string_pretty(&actions)?);
    Ok(())
}
