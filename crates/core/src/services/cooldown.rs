use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_COOLDOWN_MS;
use crate::models::settings::Settings;

/// Answer of the cooldown gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshAllowance {
    pub allowed: bool,
    /// Milliseconds until the next refresh is allowed; 0 when allowed.
    pub remaining_ms: u64,
}

impl RefreshAllowance {
    /// Short status line for the refresh button ("" when allowed).
    pub fn status_text(&self) -> String {
        if self.allowed {
            String::new()
        } else {
            format!("Next in {}", format_remaining(self.remaining_ms))
        }
    }
}

/// Whether a bulk refresh may start at `now_ms`.
///
/// `remaining = max(0, cooldown - (now - last_refresh_at))`, with an unset
/// `last_refresh_at` read as 0. Pure: recording a completed refresh is the
/// caller's job.
pub fn can_refresh(settings: &Settings, now_ms: i64, cooldown_ms: i64) -> RefreshAllowance {
    let last = settings.last_refresh_at.unwrap_or(0);
    let elapsed = now_ms.saturating_sub(last);
    let remaining = cooldown_ms.saturating_sub(elapsed).max(0);
    RefreshAllowance {
        allowed: remaining == 0,
        remaining_ms: remaining as u64,
    }
}

/// [`can_refresh`] with the standard 30 minute cooldown.
pub fn can_refresh_default(settings: &Settings, now_ms: i64) -> RefreshAllowance {
    can_refresh(settings, now_ms, DEFAULT_COOLDOWN_MS)
}

/// Render a wait time in whole minutes, rounded up: "1 min", "12 mins".
pub fn format_remaining(ms: u64) -> String {
    let minutes = ms.div_ceil(60_000);
    if minutes <= 1 {
        "1 min".to_string()
    } else {
        format!("{minutes} mins")
    }
}
