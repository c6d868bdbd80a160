//! Local JSON cache for the team list
//!
//! Fetching every team means one request per competition, so the list is
//! stored on disk between runs as `{"teams": [...]}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Team;

/// Errors that can occur when reading or writing the team cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file does not exist yet
    #[error("Teams cache not found: {0}")]
    NotFound(PathBuf),

    /// Reading, writing or creating the cache directory failed
    #[error("Teams cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cache file is not valid JSON, or the teams could not be serialized
    #[error("Teams cache is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Storage for the team list between runs
pub trait TeamsCache {
    /// Loads the cached team list
    fn load_teams(&self) -> Result<Vec<Team>, CacheError>;

    /// Replaces the cached team list
    fn save_teams(&self, teams: &[Team]) -> Result<(), CacheError>;
}

/// On-disk shape of the cache file
#[derive(Debug, Serialize, Deserialize)]
struct TeamsFile<T> {
    teams: T,
}

/// Team cache stored as a JSON file at a fixed path
#[derive(Debug, Clone)]
pub struct LocalTeamsCache {
    path: PathBuf,
}

impl LocalTeamsCache {
    /// Creates a cache backed by the file at `path`
    ///
    /// Nothing is touched on disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TeamsCache for LocalTeamsCache {
    fn load_teams(&self) -> Result<Vec<Team>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CacheError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let file: TeamsFile<Vec<Team>> = serde_json::from_str(&content)?;
        Ok(file.teams)
    }

    fn save_teams(&self, teams: &[Team]) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(&TeamsFile { teams })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, json)?;
        Ok(())
    }
}
