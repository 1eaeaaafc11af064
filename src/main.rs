use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use newsdesk::api::HttpNewsApi;
use newsdesk::config::Config;
use newsdesk::console::ConsoleView;
use newsdesk::dashboard::Dashboard;

// One thread: actions interleave only at network awaits.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the rendered dashboard.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsdesk=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("loading configuration")?;
    tracing::info!("Using backend at {}", config.api_base);

    let api = Arc::new(HttpNewsApi::new(&config).context("building HTTP client")?);
    let view = Arc::new(ConsoleView::new());
    let dashboard = Arc::new(Dashboard::new(api, view, &config));

    dashboard.start().await;
    println!("Type `help` for commands.");

    dashboard
        .serve(BufReader::new(tokio::io::stdin()))
        .await
        .context("reading commands")?;

    Ok(())
}
