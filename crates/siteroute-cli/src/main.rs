//! SiteRoute CLI
//!
//! Resolves content URLs against a site configuration file

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use siteroute_config_file::{FileSiteStore, MemorySite};
use siteroute_core::{ContentId, Culture, RequestContext, Route, UrlMode};
use siteroute_routing::{SnapshotService, UrlRouter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "siteroute")]
#[command(about = "SiteRoute - URL resolution for published content trees", long_about = None)]
struct Cli {
    /// Site configuration file (YAML or TOML)
    #[arg(long, env = "SITEROUTE_SITE", default_value = "~/.siteroute/site.yaml")]
    site: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the URL of a content node
    Resolve {
        /// Content id
        id: ContentId,

        /// Culture of the requested variant
        #[arg(long)]
        culture: Option<Culture>,

        /// URL mode (auto, relative, absolute); defaults to the configured mode
        #[arg(long)]
        mode: Option<UrlMode>,

        /// URL of the current request
        #[arg(long, default_value = "http://localhost/")]
        current_url: String,

        /// Print JSON instead of the bare URL
        #[arg(long)]
        json: bool,
    },
    /// Find the content node addressed by a route
    Lookup {
        /// Route, e.g. `/home/sub1` or `9876/home/test-fr`
        route: String,

        /// Culture of the route
        #[arg(long)]
        culture: Option<Culture>,
    },
    /// List the node's URLs on every other domain
    OtherUrls {
        /// Content id
        id: ContentId,

        /// URL of the current request
        #[arg(long, default_value = "http://localhost/")]
        current_url: String,
    },
}

#[derive(Serialize)]
struct Resolution {
    id: ContentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    culture: Option<Culture>,
    mode: UrlMode,
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::new(format!("{}", log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store = FileSiteStore::new(&cli.site)
        .with_context(|| format!("Failed to open site configuration {}", cli.site.display()))?;
    let mut config = store
        .load()
        .with_context(|| format!("Failed to load {}", store.path().display()))?;
    config.merge_env();
    config.validate()?;

    init_tracing(cli.log_level.as_deref().unwrap_or(&config.logging.level))?;
    debug!(path = %store.path().display(), "Loaded site");

    let site = Arc::new(MemorySite::from_config(&config)?);
    let snapshots = Arc::new(SnapshotService::new(site.clone(), site));
    let router = UrlRouter::with_defaults(snapshots, config.settings.clone());

    match cli.command {
        Commands::Resolve {
            id,
            culture,
            mode,
            current_url,
            json,
        } => {
            let context = RequestContext::from_uri(&current_url)
                .with_context(|| format!("Invalid current URL '{}'", current_url))?;
            let result = router.try_get_url(id, culture.as_ref(), mode, &context);

            if json {
                let resolution = Resolution {
                    id,
                    culture,
                    mode: mode.unwrap_or_else(|| router.mode()),
                    url: result.as_ref().ok().cloned(),
                    error: result.as_ref().err().map(|e| e.to_string()),
                };
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                match result {
                    Ok(url) => println!("{}", url),
                    Err(e) => {
                        debug!(error = %e, "Unresolved");
                        println!("{}", siteroute_routing::NOT_FOUND_URL);
                    }
                }
            }
        }
        Commands::Lookup { route, culture } => {
            let route = Route::parse(&route)?;
            let id = router
                .get_content_id_by_route(&route, culture.as_ref())
                .with_context(|| format!("No published content at route '{}'", route))?;
            println!("{}", id);
        }
        Commands::OtherUrls { id, current_url } => {
            let context = RequestContext::from_uri(&current_url)
                .with_context(|| format!("Invalid current URL '{}'", current_url))?;
            for url in router.get_other_urls(id, &context) {
                println!("{}", url);
            }
        }
    }

    Ok(())
}
