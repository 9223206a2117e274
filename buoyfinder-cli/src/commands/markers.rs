//! Markers command - emit the latest asset positions as GeoJSON.

use chrono::Utc;
use clap::Args;

use buoyfinder::config::ConfigFile;
use buoyfinder::feed::{fetch_all_reports, SpotFeedClient};
use buoyfinder::markers::latest_markers;
use buoyfinder::service::{NavigationServiceConfig, ServiceError};

use crate::error::CliError;

/// Arguments for the markers command.
#[derive(Debug, Args)]
pub struct MarkersArgs {
    /// Pretty-print the GeoJSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Run the markers command.
///
/// The feature collection goes to stdout so it can be piped straight
/// into mapping tools.
pub async fn run(args: MarkersArgs, config: &ConfigFile) -> Result<(), CliError> {
    let service_config = NavigationServiceConfig::from_config_file(config);
    if service_config.feed_id.is_empty() {
        return Err(CliError::Service(ServiceError::MissingFeedId));
    }

    let client = SpotFeedClient::new(
        &service_config.base_url,
        &service_config.feed_id,
        service_config.feed_timeout,
    )?;
    let reports = fetch_all_reports(&client).await?;

    let collection = latest_markers(&reports, service_config.context.timezone, Utc::now());
    let json = if args.pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };
    println!("{}", json);

    Ok(())
}
