//! Core rate limit handling.
//!
//! Mutating calls check the core quota first and sleep until the window
//! resets when it is nearly exhausted.

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Longest we are willing to sleep for a reset (1 hour).
const MAX_WAIT_SECS: u64 = 3600;

/// Below this many remaining requests we wait for the reset.
const MIN_REMAINING: u32 = 5;

/// Snapshot of the core rate limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreQuota {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix timestamp when the window resets.
    pub reset: u64,
}

impl CoreQuota {
    /// How long to sleep at `now` (unix seconds), or `None` when no wait is needed.
    #[must_use]
    pub fn wait_at(&self, now: u64) -> Option<Duration> {
        if self.remaining >= MIN_REMAINING || self.reset <= now {
            return None;
        }

        let wait_secs = self.reset - now;
        if wait_secs > MAX_WAIT_SECS {
            warn!(
                wait_secs,
                max_wait = MAX_WAIT_SECS,
                "Rate limit reset too far away, capping wait"
            );
        }
        Some(Duration::from_secs(wait_secs.min(MAX_WAIT_SECS)))
    }
}

/// Fetches the core quota.
///
/// # Errors
///
/// Returns the octocrab error if the rate limit endpoint fails.
pub async fn core_quota(octocrab: &Octocrab) -> Result<CoreQuota, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(CoreQuota {
        remaining: u32::try_from(core.remaining).unwrap_or(u32::MAX),
        reset: core.reset,
    })
}

/// Waits for the core window to reset when the quota is nearly used up.
///
/// # Errors
///
/// Returns the octocrab error if the rate limit endpoint fails.
pub async fn ensure_core_quota(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let quota = core_quota(octocrab).await?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    if let Some(wait) = quota.wait_at(now) {
        info!(
            remaining = quota.remaining,
            wait_secs = wait.as_secs(),
            "Core rate limit low, waiting for reset"
        );
        tokio::time::sleep(wait).await;
    }
    Ok(())
}
