//! Fetch command - one-shot feed fetch and asset summary.

use clap::Args;
use tokio::sync::broadcast;

use buoyfinder::config::ConfigFile;
use buoyfinder::feed::{fetch_all_reports, SpotFeedClient};
use buoyfinder::navigator::{
    NavigationAggregator, NavigationAggregatorConfig, NavigationSnapshot,
};
use buoyfinder::service::{NavigationServiceConfig, ServiceError};

use crate::error::CliError;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Asset to focus the summary on (full name, e.g. BUOY_A1)
    #[arg(long)]
    pub asset: Option<String>,
}

/// Run the fetch command.
pub async fn run(args: FetchArgs, config: &ConfigFile) -> Result<(), CliError> {
    let service_config = NavigationServiceConfig::from_config_file(config);
    if service_config.feed_id.is_empty() {
        return Err(CliError::Service(ServiceError::MissingFeedId));
    }

    let client = SpotFeedClient::new(
        &service_config.base_url,
        &service_config.feed_id,
        service_config.feed_timeout,
    )?;

    println!("Fetching feed {}...", service_config.feed_id);
    let reports = fetch_all_reports(&client).await?;
    println!("Fetched {} reports", reports.len());
    println!();

    // A one-shot aggregator composes the same snapshot the live
    // service would
    let (update_tx, _update_rx) = broadcast::channel(16);
    let aggregator = NavigationAggregator::with_config(
        update_tx,
        NavigationAggregatorConfig {
            context: service_config.context.clone(),
            ..Default::default()
        },
    );
    aggregator.receive_reports(reports);
    if let Some(asset) = &args.asset {
        aggregator.select_asset(asset);
    }

    let snapshot = aggregator.snapshot();

    println!("Assets ({}):", snapshot.asset_names.len());
    for name in &snapshot.asset_names {
        println!("  {}", name);
    }
    println!();
    print_summary(&snapshot);

    Ok(())
}

/// Print a block summary of the selected asset.
fn print_summary(snapshot: &NavigationSnapshot) {
    println!("Selected: {}", snapshot.display_name);
    println!("  Position:  {}", snapshot.position_display);
    println!(
        "  Reported:  {} {}",
        snapshot.date_display, snapshot.time_display
    );
    println!("  Freshness: {}", snapshot.freshness);
    println!("  Speed:     {}", snapshot.speed_display);

    match snapshot
        .reference_distance_km
        .zip(snapshot.reference_bearing_degrees)
    {
        Some((distance_km, bearing)) => println!(
            "  From {}: {:.1} km, bearing {:.0}°",
            snapshot.reference_name, distance_km, bearing
        ),
        None => println!("  From {}: n/a", snapshot.reference_name),
    }
}
