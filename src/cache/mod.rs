//! Cache module for storing the team list on disk
//!
//! Resolving a team name needs every team in every competition, which costs
//! one API request per competition. This module keeps that list in a local
//! JSON file so later runs can skip the fan-out.

mod teams;

pub use teams::{CacheError, LocalTeamsCache, TeamsCache};
