//! Per-source request budgets.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// "At most `max_requests` per rolling `window`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSpec {
    pub max_requests: u32,
    /// `<n><unit>` with unit `s`, `m` or `h`
    pub window: String,
}

impl RateLimitSpec {
    pub fn new(max_requests: u32, window: impl Into<String>) -> Self {
        Self { max_requests, window: window.into() }
    }

    pub fn window_duration(&self) -> Result<Duration, ConfigError> {
        parse_window(&self.window)
    }
}

impl Default for RateLimitSpec {
    fn default() -> Self {
        Self::new(60, "1m")
    }
}

/// Parse a window such as `"30s"`, `"1m"` or `"2h"`.
pub fn parse_window(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidWindow { value: raw.to_string() };
    let trimmed = raw.trim();
    let split = trimmed.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
    let (digits, unit) = trimmed.split_at(split);
    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }
    let unit_secs = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => return Err(invalid()),
    };
    amount.checked_mul(unit_secs).map(Duration::from_secs).ok_or_else(invalid)
}
