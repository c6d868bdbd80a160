//! Request quota tracking for football-data.org
//!
//! The API reports the remaining quota and the seconds until it resets on
//! every response. `RateState` keeps the latest values so the client can
//! refuse a request up front instead of spending it on a 429.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use reqwest::header::HeaderMap;

/// Response header carrying the seconds until the quota resets
pub const REQUEST_COUNTER_RESET_HEADER: &str = "X-Requestcounter-Reset";

/// Response header carrying the number of requests left in the window
pub const REQUESTS_AVAILABLE_HEADER: &str = "X-Requests-Available";

/// Quota state reported by the most recent response
///
/// The default state has no prior request and a zero quota, which always
/// allows the next request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateState {
    /// Requests left in the current window
    pub requests_available: i64,
    /// Seconds from `last_request` until the window resets
    pub window_reset_secs: i64,
    /// When the last response was received
    pub last_request: Option<DateTime<Utc>>,
}

impl RateState {
    /// Time left in the current window as seen at `now`
    ///
    /// Zero or negative once the window has passed, or when no request was made yet.
    /// Saturates instead of overflowing for out-of-range header values.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        let Some(last) = self.last_request else {
            return Duration::zero();
        };

        let window = Duration::try_seconds(self.window_reset_secs).unwrap_or(
            if self.window_reset_secs < 0 {
                Duration::MIN
            } else {
                Duration::MAX
            },
        );
        let elapsed = now - last;

        window.checked_sub(&elapsed).unwrap_or(if elapsed < Duration::zero() {
            Duration::MAX
        } else {
            Duration::MIN
        })
    }

    /// How long the caller must wait before the next request, if at all
    ///
    /// Only throttles when the quota is exhausted and the window is still open.
    pub fn throttled_for(&self, now: DateTime<Utc>) -> Option<StdDuration> {
        if self.requests_available != 0 {
            return None;
        }
        let remaining = self.remaining_at(now);
        if remaining > Duration::zero() {
            remaining.to_std().ok()
        } else {
            None
        }
    }

    /// Records a response received at `now`
    ///
    /// Missing or unparseable headers count as zero.
    pub fn record_response(&mut self, headers: &HeaderMap, now: DateTime<Utc>) {
        self.last_request = Some(now);
        self.window_reset_secs = header_int(headers, REQUEST_COUNTER_RESET_HEADER);
        self.requests_available = header_int(headers, REQUESTS_AVAILABLE_HEADER);
    }
}

fn header_int(headers: &HeaderMap, name: &str) -> i64 {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}
