//! Admin panel server.
//!
//! Loads a table schema, optional dictionaries and seed rows, starts the
//! runtime worker and serves the HTTP API until interrupted.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use admin_api::{router::Router, server::Server};
use admin_core::config::AdminConfig;
use admin_core::i18n::Localizer;
use admin_core::schema::load_schema_from_path;
use admin_runtime::{ApiHandlers, DaoRegistry, Runtime};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the admin server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Schema file describing the tables
    #[arg(short, long)]
    schema: PathBuf,

    /// Dictionary file, `{"en": {"key": "text"}, ...}`
    #[arg(long)]
    lang: Option<PathBuf>,

    /// Seed rows, `{"Table": [{...}, ...], ...}`
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Language used when a request names none
    #[arg(long, default_value = "en")]
    default_language: String,

    /// Refuse requests without the user header
    #[arg(long)]
    require_auth: bool,

    /// Grid page size when a request omits `rows`
    #[arg(long, default_value_t = 50)]
    page_size: usize,

    /// Public base path of uploaded files
    #[arg(long, default_value = "files")]
    storage_url: String,

    /// Base path of the UI images
    #[arg(long, default_value = "images")]
    image_url: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Response timeout in milliseconds
    #[arg(long, default_value_t = 10000)]
    response_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AdminConfig {
        storage_base_url: args.storage_url.clone(),
        image_base_url: args.image_url.clone(),
        default_page_size: args.page_size,
        default_language: args.default_language.clone(),
        require_auth: args.require_auth,
        request_timeout_ms: args.request_timeout_ms,
        response_timeout_ms: args.response_timeout_ms,
        ..AdminConfig::default()
    };

    let registry = Arc::new(
        load_schema_from_path(&args.schema)
            .map_err(|e| format!("Failed to load schema {}: {}", args.schema.display(), e))?,
    );
    let localizer = match &args.lang {
        Some(path) => Localizer::load(&config.default_language, path)
            .map_err(|e| format!("Failed to load dictionaries {}: {}", path.display(), e))?,
        None => Localizer::new(&config.default_language),
    };

    let daos = DaoRegistry::in_memory(&registry);
    if let Some(path) = &args.seed {
        let inserted = daos.seed_from_json(&fs::read_to_string(path)?)?;
        tracing::info!("Seeded {} records from {}", inserted, path.display());
    }

    let (api_tx, api_rx) = mpsc::channel(config.request_queue_capacity);
    let handlers = ApiHandlers::new(Arc::clone(&registry), daos, localizer, config.clone());
    let mut runtime = Runtime::new(handlers, api_rx);
    thread::spawn(move || {
        if let Err(e) = runtime.run() {
            tracing::error!("Runtime loop fatal error: {}", e);
            std::process::exit(1);
        }
    });

    let router = Router::new(Arc::new(config), api_tx);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let server = Server::bind(addr, router).await?;

    tracing::info!(
        "Serving {} tables from {} on http://{}",
        registry.len(),
        args.schema.display(),
        server.local_addr()?
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c().await?;
    tracing::info!("Shutting down server");
    server_handle.abort();

    Ok(())
}
