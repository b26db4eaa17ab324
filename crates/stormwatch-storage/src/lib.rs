//! Archive layer for weather snapshots and fired alerts.
//!
//! The default implementation ([`engine::SqliteArchive`]) stores snapshots
//! as JSON rows and alerts relationally in a single SQLite database, and
//! prunes both tables by the configured retention.

pub mod engine;


use anyhow::Result;
use stormwatch_common::types::{TriggeredAlert, WeatherSnapshot};

/// Persistence backend for snapshots and alert history.
///
/// Implementations must be `Send + Sync`: the archive is shared between the
/// polling loop and any concurrent per-location tasks.
pub trait WeatherArchive: Send + Sync {
    /// Persists one snapshot for a location.
    fn store_snapshot(&self, location: &str, snapshot: &WeatherSnapshot) -> Result<()>;

    /// Persists a fired alert for historical queries.
    fn store_alert(&self, alert: &TriggeredAlert) -> Result<()>;

    /// Returns the snapshots archived for `location` within the last `days`
    /// days, newest first. Rows that fail to re-parse are skipped, not
    /// fatal.
    fn recent_snapshots(&self, location: &str, days: u32) -> Result<Vec<WeatherSnapshot>>;

    /// Returns archived alerts, newest first, optionally filtered by
    /// location.
    fn alert_history(&self, location: Option<&str>, limit: usize) -> Result<Vec<TriggeredAlert>>;

    /// Removes rows older than `history_days` from both tables. Returns the
    /// number of rows removed.
    fn cleanup(&self, history_days: u32) -> Result<usize>;
}
