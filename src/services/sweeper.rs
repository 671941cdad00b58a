//! Session sweeper: background eviction of idle chat sessions.
//!
//! DESIGN
//! ======
//! Sessions live in memory until closed. Clients that walk away never send
//! `DELETE`, so a task wakes every `CHAT_SESSION_SWEEP_SECS` and closes
//! sessions untouched for `CHAT_SESSION_IDLE_SECS`. A session with a turn in
//! flight is never evicted.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::state::AppState;

pub const ENV_SESSION_IDLE_SECS: &str = "CHAT_SESSION_IDLE_SECS";
pub const ENV_SESSION_SWEEP_SECS: &str = "CHAT_SESSION_SWEEP_SECS";

const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Inactivity after which a session is closed.
    pub idle: Duration,
    /// Time between sweeps.
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            interval: Duration::from_secs(DEFAULT_SESSION_SWEEP_SECS),
        }
    }
}

impl SweepConfig {
    /// Read both knobs; unset, unparsable, or zero values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            idle: Duration::from_secs(env_secs(ENV_SESSION_IDLE_SECS, DEFAULT_SESSION_IDLE_SECS)),
            interval: Duration::from_secs(env_secs(ENV_SESSION_SWEEP_SECS, DEFAULT_SESSION_SWEEP_SECS)),
        }
    }
}

fn env_secs(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

/// Spawn the background sweep. Returns a handle for shutdown.
pub fn spawn_session_sweeper(state: AppState, config: SweepConfig) -> JoinHandle<()> {
    info!(idle_secs = config.idle.as_secs(), interval_secs = config.interval.as_secs(), "session sweeper configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let evicted = state.evict_idle(config.idle).await;
            if !evicted.is_empty() {
                info!(count = evicted.len(), "chat: idle sessions evicted");
            }
        }
    })
}

#[cfg(test)]
#[path = "sweeper_test.rs"]
mod tests;
