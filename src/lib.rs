//! Football fixtures CLI library
//!
//! This module exposes the config, cache, API client and CLI helpers for the
//! binary and for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
