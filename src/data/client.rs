//! football-data.org API client
//!
//! This module fetches competitions, teams and fixtures from the
//! football-data.org v1 REST API, honouring the request quota the API
//! reports in its response headers.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::rate_limit::RateState;
use super::{Fixture, Team};
use crate::cache::{CacheError, LocalTeamsCache, TeamsCache};
use crate::config::Config;

/// Base URL for the football-data.org API
const API_BASE_URL: &str = "https://api.football-data.org";

/// API version path segment
const API_VERSION: &str = "v1";

/// Request header carrying the API key
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Request header selecting the response shape
const RESPONSE_CONTROL_HEADER: &str = "X-Response-Control";

/// Response shape with the reduced payload
const MINIFIED: &str = "minified";

/// Maximum length of an error response body kept in `ClientError::Status`
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Errors that can occur when talking to the API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request quota is exhausted and the window has not reset yet
    #[error("Cannot make request, try again in {:.1} seconds", .retry_after.as_secs_f64())]
    Throttled { retry_after: Duration },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Teams were fetched but could not be written to the cache
    ///
    /// The fetched teams are still valid and are carried here so callers can use them.
    #[error("Fetched {} teams but failed to cache them: {source}", .teams.len())]
    CachePersist {
        teams: Vec<Team>,
        #[source]
        source: CacheError,
    },
}

/// API endpoints, as path templates relative to the versioned base URL
///
/// Placeholders in braces are filled in by [`build_request_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Every competition available to the API key
    Competitions,
    /// Teams in one competition; placeholder `cid`
    Teams,
    /// A team's fixtures over the next 30 days; placeholder `tid`
    Fixtures,
}

impl Endpoint {
    pub const fn template(self) -> &'static str {
        match self {
            Endpoint::Competitions => "competitions",
            Endpoint::Teams => "competitions/{cid}/teams",
            Endpoint::Fixtures => "teams/{tid}/fixtures?timeFrame=n30",
        }
    }
}

/// Builds the full URL for an endpoint, substituting each `{key}` with its value
pub fn build_request_url(base_url: &str, endpoint: Endpoint, values: &[(&str, String)]) -> String {
    let path = values
        .iter()
        .fold(endpoint.template().to_string(), |path, (key, value)| {
            path.replacen(&format!("{{{}}}", key), value, 1)
        });

    format!("{}/{}/{}", base_url.trim_end_matches('/'), API_VERSION, path)
}

/// Competition entry from the competitions endpoint; only the id is used
#[derive(Debug, Deserialize)]
struct Competition {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct CompetitionTeamsResponse {
    teams: Vec<Team>,
}

#[derive(Debug, Deserialize)]
struct FixturesResponse {
    fixtures: Vec<Fixture>,
}

/// Source of teams and fixtures
#[allow(async_fn_in_trait)]
pub trait FootballClient {
    /// Gets every available team, from the cache when the config allows it
    async fn get_teams(&self) -> Result<Vec<Team>, ClientError>;

    /// Gets the fixtures in the next 30 days for a team
    ///
    /// Failures are logged and produce an empty list.
    async fn get_fixtures(&self, team_id: u32) -> Vec<Fixture>;

    /// Checks the request quota, returning `ClientError::Throttled` when exhausted
    fn can_make_request(&self) -> Result<(), ClientError>;
}

/// Client for the football-data.org API
///
/// The quota state sits behind a mutex so it carries over between calls.
/// The lock is never held across an `.await`.
#[derive(Debug)]
pub struct FootballDataClient<C = LocalTeamsCache> {
    http_client: Client,
    config: Config,
    cache: Option<C>,
    base_url: String,
    rate: Mutex<RateState>,
}

impl FootballDataClient<LocalTeamsCache> {
    /// Creates a client without a team cache
    pub fn new(config: Config) -> Self {
        Self::build(config, None)
    }
}

impl<C: TeamsCache> FootballDataClient<C> {
    /// Creates a client that reads and writes teams through `cache`
    ///
    /// The cache is only used when `persist_teams` is set in the config.
    pub fn with_cache(config: Config, cache: C) -> Self {
        Self::build(config, Some(cache))
    }

    fn build(config: Config, cache: Option<C>) -> Self {
        Self {
            http_client: Client::new(),
            config,
            cache,
            base_url: API_BASE_URL.to_string(),
            rate: Mutex::new(RateState::default()),
        }
    }

    /// Points the client at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Snapshot of the quota state from the last response
    pub fn rate_state(&self) -> RateState {
        *self.rate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn set_rate_state(&self, state: RateState) {
        *self.rate.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Fetches every competition, then the teams of each in order
    async fn fetch_all_teams(&self) -> Result<Vec<Team>, ClientError> {
        let competitions: Vec<Competition> = self.request(Endpoint::Competitions, &[]).await?;
        debug!(count = competitions.len(), "Fetched competitions");

        let mut teams = Vec::new();
        for competition in competitions {
            let response: CompetitionTeamsResponse = self
                .request(Endpoint::Teams, &[("cid", competition.id.to_string())])
                .await?;
            teams.extend(response.teams);
        }

        Ok(teams)
    }

    /// Sends a minified GET request and decodes the JSON body
    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        values: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.can_make_request()?;

        let url = build_request_url(&self.base_url, endpoint, values);
        debug!(%url, "Sending request");

        let response = self
            .http_client
            .get(&url)
            .header(AUTH_TOKEN_HEADER, &self.config.api_key)
            .header(RESPONSE_CONTROL_HEADER, MINIFIED)
            .send()
            .await?;

        let rate = {
            let mut rate = self.rate.lock().unwrap_or_else(PoisonError::into_inner);
            rate.record_response(response.headers(), Utc::now());
            *rate
        };
        debug!(
            requests_available = rate.requests_available,
            window_reset_secs = rate.window_reset_secs,
            "Updated request quota"
        );

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                body: truncate_body(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl<C: TeamsCache> FootballClient for FootballDataClient<C> {
    async fn get_teams(&self) -> Result<Vec<Team>, ClientError> {
        let cache = self.cache.as_ref().filter(|_| self.config.persist_teams);

        if let Some(cache) = cache {
            match cache.load_teams() {
                Ok(teams) if !teams.is_empty() || !self.config.rebuild_if_no_teams => {
                    info!(count = teams.len(), "Loaded teams from cache");
                    return Ok(teams);
                }
                Ok(_) => info!("Teams cache is empty, rebuilding from API"),
                Err(CacheError::NotFound(path)) => {
                    info!(path = %path.display(), "No teams cache yet, fetching from API")
                }
                Err(e) => warn!(error = %e, "Failed to load teams cache, fetching from API"),
            }
        }

        let teams = self.fetch_all_teams().await?;

        if let Some(cache) = cache {
            if let Err(source) = cache.save_teams(&teams) {
                return Err(ClientError::CachePersist { teams, source });
            }
            info!(count = teams.len(), "Saved teams to cache");
        }

        Ok(teams)
    }

    async fn get_fixtures(&self, team_id: u32) -> Vec<Fixture> {
        match self
            .request::<FixturesResponse>(Endpoint::Fixtures, &[("tid", team_id.to_string())])
            .await
        {
            Ok(response) => response.fixtures,
            Err(e) => {
                warn!(team_id, error = %e, "Failed to fetch fixtures");
                Vec::new()
            }
        }
    }

    fn can_make_request(&self) -> Result<(), ClientError> {
        match self.rate_state().throttled_for(Utc::now()) {
            Some(retry_after) => Err(ClientError::Throttled { retry_after }),
            None => Ok(()),
        }
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
