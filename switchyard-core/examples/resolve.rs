//! Resolves and prints the candidate source list for one title.
//!
//! Talks to the configured storage backend for overrides and health; both
//! degrade gracefully when the backend is unreachable, so this also works
//! offline with synthesized URLs only.
//!
//! ```text
//! cargo run --example resolve -- movie 550
//! cargo run --example resolve -- tv 1399 1 1 --log-level debug
//! ```

use std::sync::Arc;

use clap::Parser;

use switchyard_core::config::SwitchyardConfig;
use switchyard_core::health::HealthStore;
use switchyard_core::media::ContentIdentity;
use switchyard_core::sources::{ProviderCatalog, SourceListBuilder};
use switchyard_core::storage::{OverrideStore, RestStorage};
use switchyard_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "resolve")]
#[command(about = "Resolve playback sources for a title")]
struct Cli {
    /// Title kind: movie or tv
    kind: String,
    /// Numeric media id
    id: String,
    /// Season number (series only)
    season: Option<String>,
    /// Episode number (series only)
    episode: Option<String>,
    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), None)?;

    let identity = ContentIdentity::from_route(
        &cli.kind,
        &cli.id,
        cli.season.as_deref(),
        cli.episode.as_deref(),
    )?;

    let config = SwitchyardConfig::default();
    let storage = Arc::new(RestStorage::new(&config.storage)?);
    let health = Arc::new(HealthStore::new(config.health.update_buffer));
    health.bootstrap(storage.as_ref()).await;

    let builder = SourceListBuilder::new(
        Arc::new(ProviderCatalog::builtin()),
        Arc::clone(&health),
        storage as Arc<dyn OverrideStore>,
    );

    for (index, candidate) in builder.build(&identity).await.iter().enumerate() {
        println!(
            "{index:>2}. {:<14} {:<8} {}",
            candidate.display_name,
            format!("{:?}", candidate.status).to_lowercase(),
            candidate.url
        );
    }

    Ok(())
}
