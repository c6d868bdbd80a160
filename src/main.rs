//! Football fixtures CLI - list upcoming home fixtures for a team
//!
//! Reads the API key and cache policy from a config file, resolves the team
//! name against the (possibly cached) team list, and prints the team's home
//! fixtures for the next 30 days.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use homefixtures::cache::LocalTeamsCache;
use homefixtures::cli::{format_fixtures, home_fixtures, lookup_team, Cli};
use homefixtures::config::Config;
use homefixtures::data::{ClientError, FootballClient, FootballDataClient};

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr so stdout only carries fixtures.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&cli.config)?;
    let cache = LocalTeamsCache::new(config.teams_file.clone());
    let client = FootballDataClient::with_cache(config, cache);

    let team_id = match cli.team_id {
        Some(id) => id,
        None => {
            let teams = match client.get_teams().await {
                Ok(teams) => teams,
                Err(ClientError::CachePersist { teams, source }) => {
                    warn!(error = %source, "Could not save teams cache");
                    teams
                }
                Err(e) => return Err(e.into()),
            };
            lookup_team(&teams, &cli.team)?
        }
    };

    let fixtures = client.get_fixtures(team_id).await;
    print!("{}", format_fixtures(&home_fixtures(&fixtures, team_id)));

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
