//! Watch command - run the navigation service until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::sync::broadcast::error::RecvError;

use buoyfinder::config::ConfigFile;
use buoyfinder::navigator::{FeedStatus, NavigationUpdate};
use buoyfinder::sensors::FixedLocation;
use buoyfinder::service::{NavigationService, NavigationServiceConfig, ServiceError};

use crate::error::CliError;

/// Arguments for the watch command.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Asset to track (full name, e.g. BUOY_A1)
    #[arg(long)]
    pub asset: Option<String>,

    /// Fixed observer latitude in decimal degrees
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,

    /// Fixed observer longitude in decimal degrees
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,
}

/// Run the watch command.
pub async fn run(args: WatchArgs, config: &ConfigFile) -> Result<(), CliError> {
    let service_config = NavigationServiceConfig::from_config_file(config);
    if service_config.feed_id.is_empty() {
        return Err(CliError::Service(ServiceError::MissingFeedId));
    }

    // Print banner
    println!("BuoyFinder v{}", buoyfinder::VERSION);
    println!("==============");
    println!();
    println!("Feed:      {}", service_config.feed_id);
    println!(
        "Refresh:   every {}s",
        service_config.refresh_interval.as_secs()
    );
    println!("Reference: {}", service_config.context.reference.name);
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        println!("Observer:  {:.5}, {:.5} (fixed)", lat, lon);
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let service = NavigationService::start(service_config)?;

    if let Some(asset) = &args.asset {
        service.select_asset(asset);
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        service.attach_location_source(FixedLocation::new(lat, lon));
    }

    let mut updates = service.subscribe();

    // Set up signal handler for graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Signal(e.to_string()))?;

    // Print updates until the shutdown flag flips; the timeout keeps
    // the flag polled while the feed is quiet
    while !shutdown.load(Ordering::SeqCst) {
        match tokio::time::timeout(Duration::from_millis(200), updates.recv()).await {
            Ok(Ok(update)) => print_update(&update),
            Ok(Err(RecvError::Lagged(skipped))) => {
                tracing::warn!(skipped, "Update stream lagged");
            }
            Ok(Err(RecvError::Closed)) => break,
            Err(_) => {}
        }
    }

    println!();
    println!("Received shutdown signal, stopping...");
    service.shutdown();
    println!("Stopped.");

    Ok(())
}

/// Print one navigation update as a status line.
fn print_update(update: &NavigationUpdate) {
    let snapshot = &update.snapshot;
    match &update.status {
        FeedStatus::Loading => println!("[feed] refreshing..."),
        FeedStatus::Error(message) => println!("[feed] error: {}", message),
        FeedStatus::Success => {
            let mut line = format!(
                "{} | {} | {} | {} | {}",
                snapshot.display_name,
                snapshot.position_display,
                snapshot.time_display,
                snapshot.speed_display,
                snapshot.freshness
            );
            if let Some(distance_km) = snapshot.device_distance_km {
                line.push_str(&format!(" | {:.2} km away", distance_km));
            } else if let Some(distance_km) = snapshot.reference_distance_km {
                line.push_str(&format!(
                    " | {:.1} km from {}",
                    distance_km, snapshot.reference_name
                ));
            }
            if let Some(bearing) = snapshot.device_bearing_degrees {
                line.push_str(&format!(" | brg {:.0}°", bearing));
            }
            println!("{}", line);
        }
    }
}
