use crate::constants::DEFAULT_CONFIG_PATH;
use crate::routes::AppState;
use crate::source::page::HttpPageFetcher;
use crate::source::youtube::finder::{FinderOptions, LiveFinder};
use crate::source::youtube::live::LiveResolver;
use crate::util::config::{Config, StoreConfig, StoreKind};
use crate::util::errors::StoreError;
use crate::util::store::{JsonFileStore, MemoryStore, Store};
use dotenv::dotenv;
use mimalloc::MiMalloc;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::main;
use tokio::net;
use tracing_subscriber::fmt;

mod constants;
mod middlewares;
mod models;
mod routes;
mod source;
mod util;

#[global_allocator]
static ALLOCATOR: MiMalloc = MiMalloc;

#[main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    let config_path = env::var("LIVETAB_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    let level = match config.max_level() {
        Ok(level) => level,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    let subscriber = fmt()
        .pretty()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(true)
        .with_max_level(level)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global logger: {}", error);
        return ExitCode::FAILURE;
    }

    let fetcher = match HttpPageFetcher::from_config(&config.livestream) {
        Ok(fetcher) => fetcher,
        Err(error) => {
            tracing::error!("Failed to create page fetcher: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let store = match open_store(&config.store) {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    let resolver = Arc::new(LiveResolver::new(Arc::new(fetcher)));
    let finder = LiveFinder::new(resolver, FinderOptions::from(&config.livestream));

    tracing::info!(
        "Live stream lookups use the {:?} policy ({} in flight, {}ms timeout)",
        config.livestream.policy(),
        config.livestream.max_concurrency(),
        config.livestream.fetch_timeout_ms()
    );

    let state = Arc::new(AppState {
        authorization: config.authorization.clone(),
        finder,
        store,
    });

    let app = routes::router(state);

    let listener = match net::TcpListener::bind(format!("{}:{}", config.address, config.port)).await
    {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(
                "Failed to bind to {}:{}: {}",
                config.address,
                config.port,
                error
            );
            return ExitCode::FAILURE;
        }
    };

    if let Ok(address) = listener.local_addr() {
        tracing::info!("Server is bound to {}", address);
    }

    if let Err(error) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", error);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn open_store(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.kind {
        StoreKind::File => Ok(Arc::new(JsonFileStore::open(config.path())?)),
        StoreKind::Memory => {
            tracing::warn!("Using in-memory storage, the channel list is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", error);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
}
