use crate::WeatherArchive;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use stormwatch_common::types::{Condition, TriggeredAlert, WeatherSnapshot};

pub struct SqliteArchive {
    conn: Mutex<Connection>,
}

impl SqliteArchive {
    /// Opens (or creates) the archive database and its schema.
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create data dir {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open archive {}", path.display()))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS weather_data (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 location TEXT NOT NULL,
                 timestamp TEXT NOT NULL,
                 data TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS alerts (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 location TEXT NOT NULL,
                 condition TEXT NOT NULL,
                 threshold REAL NOT NULL,
                 current_value REAL NOT NULL,
                 message TEXT NOT NULL,
                 timestamp TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_weather_location_time
                 ON weather_data (location, timestamp);
             CREATE INDEX IF NOT EXISTS idx_alerts_location_time
                 ON alerts (location, timestamp);",
        )?;

        tracing::info!(path = %path.display(), "Archive database initialized");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl WeatherArchive for SqliteArchive {
    fn store_snapshot(&self, location: &str, snapshot: &WeatherSnapshot) -> Result<()> {
        let data = serde_json::to_string(snapshot)?;
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "INSERT INTO weather_data (location, timestamp, data) VALUES (?1, ?2, ?3)",
        )?;
        stmt.execute(rusqlite::params![
            location,
            snapshot.timestamp.to_rfc3339(),
            data,
        ])?;
        tracing::debug!(location, "Stored weather snapshot");
        Ok(())
    }

    fn store_alert(&self, alert: &TriggeredAlert) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "INSERT INTO alerts (location, condition, threshold, current_value, message, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        stmt.execute(rusqlite::params![
            &alert.location,
            alert.condition.to_string(),
            alert.threshold,
            alert.current_value,
            &alert.message,
            alert.timestamp.to_rfc3339(),
        ])?;
        Ok(())
    }

    fn recent_snapshots(&self, location: &str, days: u32) -> Result<Vec<WeatherSnapshot>> {
        let cutoff = (Utc::now() - Duration::days(i64::from(days))).to_rfc3339();
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT data FROM weather_data
             WHERE location = ?1 AND timestamp > ?2
             ORDER BY timestamp DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![location, cutoff], |row| {
            row.get::<_, String>(0)
        })?;

        let mut snapshots = Vec::new();
        for row in rows {
            let data = row?;
            match serde_json::from_str::<WeatherSnapshot>(&data) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    tracing::warn!(location, error = %e, "Skipping unreadable snapshot row");
                }
            }
        }
        Ok(snapshots)
    }

    fn alert_history(&self, location: Option<&str>, limit: usize) -> Result<Vec<TriggeredAlert>> {
        let conn = self.conn.lock().unwrap();
        match location {
            Some(location) => {
                let mut stmt = conn.prepare_cached(
                    "SELECT location, condition, threshold, current_value, message, timestamp
                     FROM alerts WHERE location = ?1
                     ORDER BY timestamp DESC LIMIT ?2",
                )?;
                let mut rows = stmt.query(rusqlite::params![location, limit as i64])?;
                collect_alerts(&mut rows)
            }
            None => {
                let mut stmt = conn.prepare_cached(
                    "SELECT location, condition, threshold, current_value, message, timestamp
                     FROM alerts ORDER BY timestamp DESC LIMIT ?1",
                )?;
                let mut rows = stmt.query(rusqlite::params![limit as i64])?;
                collect_alerts(&mut rows)
            }
        }
    }

    fn cleanup(&self, history_days: u32) -> Result<usize> {
        let cutoff = (Utc::now() - Duration::days(i64::from(history_days))).to_rfc3339();
        let conn = self.conn.lock().unwrap();
        let weather = conn.execute(
            "DELETE FROM weather_data WHERE timestamp < ?1",
            rusqlite::params![cutoff],
        )?;
        let alerts = conn.execute(
            "DELETE FROM alerts WHERE timestamp < ?1",
            rusqlite::params![cutoff],
        )?;
        let removed = weather + alerts;
        if removed > 0 {
            tracing::debug!(removed, history_days, "Pruned archive rows");
        }
        Ok(removed)
    }
}

fn collect_alerts(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<TriggeredAlert>> {
    let mut alerts = Vec::new();
    while let Some(row) = rows.next()? {
        let timestamp: String = row.get(5)?;
        let timestamp = match DateTime::parse_from_rfc3339(&timestamp) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping alert row with bad timestamp");
                continue;
            }
        };
        alerts.push(TriggeredAlert {
            location: row.get(0)?,
            condition: Condition::from(row.get::<_, String>(1)?),
            threshold: row.get(2)?,
            current_value: row.get(3)?,
            message: row.get(4)?,
            timestamp,
        });
    }
    Ok(alerts)
}
