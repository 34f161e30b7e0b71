use anyhow::Context;
use clap::Parser;
use library_lending::utils::{logger, validation::Validate};
use library_lending::{serve, AppState, CliArgs, LibraryService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("Starting library-lending service");
    tracing::debug!("CLI args: {:?}", args);

    let config = args
        .load_config()
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed ({:?}): {}", e.category(), e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing::info!(
        "Cache: ttl {}s, max {} entries; snapshot: {}",
        config.cache.ttl_seconds,
        config.cache.max_entries,
        config.snapshot_path().unwrap_or("none (memory only)")
    );

    let library = LibraryService::from_config(&config).context("failed to open entity store")?;
    let state = AppState::new(library, config.auth.clone());

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;

    serve(listener, state.clone(), shutdown_signal()).await?;

    let books = state.library.catalog().cache().stats();
    let patrons = state.library.membership().cache().stats();
    tracing::info!(
        "Shut down cleanly (book cache {}/{} hits/misses, patron cache {}/{})",
        books.hits,
        books.misses,
        patrons.hits,
        patrons.misses
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
