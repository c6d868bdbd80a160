//! Core data models for the fixtures CLI
//!
//! This module contains the team and fixture records decoded from the
//! football-data.org API, plus the client that fetches them.

pub mod client;
pub mod rate_limit;

pub use client::{ClientError, FootballClient, FootballDataClient};
pub use rate_limit::RateState;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A football team
///
/// Identity is `id`; the fixture home/away ids refer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u32,
    pub name: String,
    /// Abbreviated name, e.g. "ManU"; empty when the API has none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub short_name: String,
}

/// A scheduled match between two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Kick-off time
    pub date: DateTime<Utc>,
    /// Match status as reported by the API (e.g. "TIMED", "SCHEDULED")
    pub status: String,
    pub home_team_name: String,
    pub home_team_id: u32,
    pub away_team_name: String,
    pub away_team_id: u32,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
