//! Command-line interface for the fixtures CLI
//!
//! This module handles parsing of CLI arguments using clap, resolving a team
//! name to its id, and formatting the home fixtures for output.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::{Fixture, Team};

/// Error types for resolving CLI input
#[derive(Debug, Error)]
pub enum CliError {
    /// No team matches the requested name
    #[error("Could not find team '{0}'")]
    TeamNotFound(String),
}

/// Football fixtures CLI - list a team's upcoming home fixtures
#[derive(Parser, Debug)]
#[command(name = "homefixtures")]
#[command(about = "Upcoming home fixtures for a football team, from football-data.org")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Name or short name of the team to look up
    ///
    /// Examples:
    ///   homefixtures --config config.json --team "Manchester United FC"
    ///   homefixtures --config config.json --team ManU
    #[arg(long, value_name = "NAME")]
    pub team: String,

    /// ID of the team to look up, skipping the team list
    #[arg(long = "team-id", value_name = "ID")]
    pub team_id: Option<u32>,
}

/// Finds the id of the first team whose name or short name equals `query`
///
/// # Returns
/// * `Ok(id)` for the first match in list order
/// * `Err(CliError::TeamNotFound)` if no team matches
pub fn lookup_team(teams: &[Team], query: &str) -> Result<u32, CliError> {
    teams
        .iter()
        .find(|t| t.name == query || t.short_name == query)
        .map(|t| t.id)
        .ok_or_else(|| CliError::TeamNotFound(query.to_string()))
}

/// Keeps the fixtures in which `team_id` is not the away side
pub fn home_fixtures(fixtures: &[Fixture], team_id: u32) -> Vec<&Fixture> {
    fixtures.iter().filter(|f| f.away_team_id != team_id).collect()
}

/// Renders fixtures as date, "home vs away" and a blank line each
pub fn format_fixtures(fixtures: &[&Fixture]) -> String {
    let mut out = String::new();
    for fixture in fixtures {
        out.push_str(&format!(
            "{}\n{} vs {}\n\n",
            fixture.date.to_rfc3339(),
            fixture.home_team_name,
            fixture.away_team_name
        ));
    }
    out
}
