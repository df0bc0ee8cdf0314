use std::{fs::OpenOptions, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env, Target};

use orion_markets::{
    api::AvApi,
    app::{App, Dashboard},
    config::Cli,
    services::{FallbackPolicy, MarketDataService, PollService, SessionService},
    storage::{FileStore, KeyValueStore},
};

fn preprocess(cli: &Cli) -> Result<()> {
    // Logs go to a file while the dashboard owns the terminal.
    let log_path = cli.log_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(log_file)))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    preprocess(&cli)?;
    log::info!("Starting ORION dashboard (offline: {})", cli.offline);

    let config = cli.market_data_config()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(cli.storage_path())?);

    let source = AvApi::new(&config)?;
    let service = MarketDataService::new(source, config);
    let dashboard = Dashboard::new(service, FallbackPolicy::default(), cli.offline);

    let mut session = SessionService::new(Arc::clone(&store));
    if let Some(user) = session.restore() {
        log::info!("Restored session for {}", user.email());
    }
    let polls = PollService::new(store);

    let mut app = App::new(
        dashboard,
        session,
        polls,
        cli.export_dir(),
        cli.refresh_interval(),
    );
    app.run().await?;

    Ok(())
}
