use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use browserless_client::BrowserlessClient;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use presence_common::{Config, Platform};
use presence_scraper::{
    load_registry, normalize, profile_url, AdapterSet, GranteeTarget, HttpPageFetcher, JsonFileStore,
    PageFetcher, ScrapeOrchestrator,
};

#[derive(Parser)]
#[command(name = "presence-scraper", about = "Grantee social media presence scraper")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a web page for social platform links
    Links { url: String },
    /// Print the canonical identifier for a profile URL or handle
    Normalize { platform: Platform, input: String },
    /// Scrape one profile
    Scrape {
        #[arg(long)]
        grantee: String,
        input: String,
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(long)]
        max_posts: Option<u32>,
    },
    /// Scan a grantee's website and scrape every profile it links to
    Site {
        #[arg(long)]
        grantee: String,
        url: String,
        #[arg(long)]
        max_posts: Option<u32>,
    },
    /// Scrape every grantee in a registry file
    Batch {
        registry: PathBuf,
        #[arg(long)]
        max_posts: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("presence=info".parse()?)
                .add_directive("apify_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Normalize { platform, input } = &cli.command {
        let id = normalize(*platform, input)?;
        return print_json(&serde_json::json!({
            "platform": id.platform,
            "identifier": id.value,
            "profile_url": profile_url(&id),
        }));
    }

    let config = Config::from_env();
    config.log_redacted();

    // The BlueSky API must be read as raw JSON, so it always goes over plain
    // HTTP. Site pages go through Browserless when one is configured.
    let http: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(config.fetch_timeout)?);
    let page_fetcher: Arc<dyn PageFetcher> = match &config.browserless_url {
        Some(url) => {
            info!(url = url.as_str(), "Fetching pages through Browserless");
            Arc::new(BrowserlessClient::new(
                url,
                config.browserless_token.as_deref(),
                config.fetch_timeout,
            )?)
        }
        None => http.clone(),
    };

    let adapters = AdapterSet::from_config(&config, http);
    let orchestrator = ScrapeOrchestrator::new(adapters, page_fetcher, &config)
        .with_store(Arc::new(JsonFileStore::new(&config.output_dir)));

    match cli.command {
        Command::Normalize { .. } => Ok(()),
        Command::Links { url } => {
            let links = orchestrator.discover_links(&url).await?;
            print_json(&links.url_map())
        }
        Command::Scrape {
            grantee,
            input,
            platform,
            max_posts,
        } => {
            let result = orchestrator
                .scrape_profile(&grantee, &input, platform, max_posts)
                .await;
            print_json(&result)
        }
        Command::Site {
            grantee,
            url,
            max_posts,
        } => {
            let target = GranteeTarget::new(grantee).with_website(url);
            let report = orchestrator.scrape_grantee(&target, max_posts).await;
            print_json(&serde_json::json!({
                "overall": report.overall(),
                "report": report,
            }))
        }
        Command::Batch {
            registry,
            max_posts,
        } => {
            let targets = load_registry(&registry)?;
            info!(grantees = targets.len(), registry = %registry.display(), "Loaded registry");

            let cancelled = Arc::new(AtomicBool::new(false));
            let flag = cancelled.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Ctrl-C received, finishing in-flight grantees");
                    flag.store(true, Ordering::Relaxed);
                }
            });

            let batch = orchestrator.scrape_batch(targets, max_posts, cancelled).await;
            print_json(&serde_json::json!({
                "summary": batch.summary(),
                "batch": batch,
            }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
