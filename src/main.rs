use anyhow::{Context, Result};
use tracing::info;

use eva_client::{build_eva_api, logging, ClientSession, EvaConfig};

/// Checks connectivity: provisions the dashboard feed if needed and prints
/// the stored external widget-type URLs.
#[tokio::main]
async fn main() -> Result<()> {
    let config = EvaConfig::from_env()?;
    let _guard = logging::init_tracing(&config)?;

    info!(
        "Probing {} (dashboard feed {})",
        config.api_origin, config.dashboard_feed_id
    );

    let api = build_eva_api(&config);
    api.ensure_dashboard_feed()
        .await
        .context("failed to provision dashboard feed")?;

    let mut session = ClientSession::new();
    let urls = api
        .fetch_external_widgettype_urls(&mut session)
        .await
        .context("failed to read external widget-type urls")?;

    info!("{} external widget-type url(s) stored", urls.len());
    for url in urls {
        println!("{}", url);
    }

    Ok(())
}
