use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use moodmap_client::MoodMapClient;
use moodmap_core::{AppConfig, Mood};
use moodmap_geo::{
    AcquirerSettings, FixedGeoSource, FreshnessPolicy, GeoSource, LocationAcquirer, NoGeolocation,
    SystemClock, TrackerCell,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod session;
mod user_search;

use session::MoodMapSession;

#[derive(Debug, Parser)]
#[command(name = "moodmap")]
#[command(about = "Mood-based place recommendations from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recommend places near the current position
    Recommend {
        /// One of work, date, quick_bite, budget
        #[arg(long, value_parser = clap::value_parser!(Mood))]
        mood: Mood,
        /// Only show places whose name or category contains this text
        #[arg(long)]
        query: Option<String>,
        /// Print cards as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List saved places grouped by kind
    Saved,
    /// Save or unsave a place from a fresh recommendation or your saved list
    Toggle {
        #[arg(long, value_parser = clap::value_parser!(Mood))]
        mood: Mood,
        place_id: String,
    },
    /// Show enriched details for a saved place
    Details { place_id: String },
    /// List pending follow requests
    Requests,
    /// Accept a follow request
    Accept { req_id: i64 },
    /// Reject a follow request
    Reject { req_id: i64 },
    /// Search other users by name or username
    Users { query: String },
    /// Print the link to your public profile
    ProfileLink,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = moodmap_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("moodmap ready; run with --help to list commands");
        return Ok(());
    };

    match config.fixed_position {
        Some(fixed) => run(command, &config, FixedGeoSource::from(fixed)).await,
        None => {
            tracing::info!("no fixed position configured; location-based commands will fail");
            run(command, &config, NoGeolocation).await
        }
    }
}

async fn run<S: GeoSource>(command: Commands, config: &AppConfig, source: S) -> anyhow::Result<()> {
    let client = MoodMapClient::from_config(config)?;
    let acquirer = LocationAcquirer::new(
        Arc::new(source),
        Arc::new(SystemClock),
        TrackerCell::new(FreshnessPolicy::from_app_config(config)),
        AcquirerSettings::from_app_config(config),
    );
    let session = MoodMapSession::start(
        client,
        acquirer,
        Duration::from_millis(config.locate_max_wait_ms),
    )
    .await;

    match command {
        Commands::Recommend { mood, query, json } => {
            commands::run_recommend(&session, mood, query.as_deref().unwrap_or_default(), json)
                .await
        }
        Commands::Saved => {
            commands::run_saved(&session).await;
            Ok(())
        }
        Commands::Toggle { mood, place_id } => {
            commands::run_toggle(&session, mood, &place_id).await
        }
        Commands::Details { place_id } => commands::run_details(&session, &place_id).await,
        Commands::Requests => {
            commands::run_requests(&session).await;
            Ok(())
        }
        Commands::Accept { req_id } => {
            commands::run_respond(&session, req_id, true).await;
            Ok(())
        }
        Commands::Reject { req_id } => {
            commands::run_respond(&session, req_id, false).await;
            Ok(())
        }
        Commands::Users { query } => {
            commands::run_users(&session, &query).await;
            Ok(())
        }
        Commands::ProfileLink => {
            println!("{}", session.profile_link().await?);
            Ok(())
        }
    }
}
