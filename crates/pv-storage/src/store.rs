//! The store itself

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};
use uuid::Uuid;

use pv_types::{
    AnalysisRecord, AppError, AppResult, MonitoredTarget, PerformanceMetrics, QuickTestRecord,
    RequestLogEntry,
};

fn storage_err(e: rusqlite::Error) -> AppError {
    AppError::Storage(e.to_string())
}

fn ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// SQLite-backed persister. Clone-cheap; all clones share one connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (and create if needed) the database at `path`. `:memory:` is
    /// accepted for an ephemeral store.
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory().map_err(storage_err)?
        } else {
            Connection::open(path).map_err(storage_err)?
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(storage_err)?;
        conn.execute_batch(crate::schema::SCHEMA)
            .map_err(storage_err)?;
        info!(path, "database opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::open(":memory:")
    }

    // ---- Targets ----

    pub fn create_target(
        &self,
        url: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<MonitoredTarget> {
        let conn = self.conn.lock();
        let display_order: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(display_order), 0) + 1 FROM monitored_targets",
                [],
                |row| row.get(0),
            )
            .map_err(storage_err)?;

        let target = MonitoredTarget {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            show_on_dashboard: true,
            display_order,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO monitored_targets
                 (id, url, name, description, show_on_dashboard, display_order, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                target.id,
                target.url,
                target.name,
                target.description,
                target.show_on_dashboard,
                target.display_order,
                target.created_at.to_rfc3339(),
            ],
        )
        .map_err(storage_err)?;

        Ok(target)
    }

    /// All targets in display order. The sweep relies on this ordering.
    pub fn list_targets(&self) -> AppResult<Vec<MonitoredTarget>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, url, name, description, show_on_dashboard, display_order, created_at
                 FROM monitored_targets ORDER BY display_order, created_at",
            )
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], row_to_target)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;
        Ok(rows)
    }

    pub fn get_target(&self, id: &str) -> AppResult<Option<MonitoredTarget>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, url, name, description, show_on_dashboard, display_order, created_at
             FROM monitored_targets WHERE id = ?1",
            params![id],
            row_to_target,
        )
        .optional()
        .map_err(storage_err)
    }

    /// Delete a target; its analysis history cascades.
    pub fn delete_target(&self, id: &str) -> AppResult<bool> {
        let conn = self.conn.lock();
        let changed = conn
            .execute("DELETE FROM monitored_targets WHERE id = ?1", params![id])
            .map_err(storage_err)?;
        Ok(changed > 0)
    }

    // ---- Analyses ----

    /// Write exactly one new analysis row for a monitored target.
    ///
    /// Absent metrics are stored as `0` (documented absence-to-zero mapping).
    /// Rows are never updated: two analyses of the same target are two rows.
    pub fn insert_analysis(
        &self,
        url_id: &str,
        metrics: &PerformanceMetrics,
    ) -> AppResult<AnalysisRecord> {
        let record = AnalysisRecord {
            id: Uuid::new_v4().to_string(),
            url_id: url_id.to_string(),
            timestamp: Utc::now(),
            success: true,
            performance_score: metrics.performance_score.unwrap_or(0),
            fcp_time: metrics.fcp_time.unwrap_or(0),
            lcp_time: metrics.lcp_time.unwrap_or(0),
            speed_index: metrics.speed_index.unwrap_or(0),
            total_blocking_time: metrics.total_blocking_time.unwrap_or(0),
            cumulative_layout_shift: metrics.cumulative_layout_shift.unwrap_or(0.0),
            load_time: metrics.load_time.unwrap_or(0),
        };

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO analysis_records
                 (id, url_id, timestamp, success, performance_score, fcp_time, lcp_time,
                  speed_index, total_blocking_time, cumulative_layout_shift, load_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.id,
                record.url_id,
                record.timestamp.to_rfc3339(),
                record.success,
                record.performance_score as i64,
                record.fcp_time as i64,
                record.lcp_time as i64,
                record.speed_index as i64,
                record.total_blocking_time as i64,
                record.cumulative_layout_shift,
                record.load_time as i64,
            ],
        )
        .map_err(storage_err)?;

        debug!(url_id, id = %record.id, "analysis row inserted");
        Ok(record)
    }

    /// Analysis history for one target, newest first.
    pub fn list_analyses(&self, url_id: &str) -> AppResult<Vec<AnalysisRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, url_id, timestamp, success, performance_score, fcp_time, lcp_time,
                        speed_index, total_blocking_time, cumulative_layout_shift, load_time
                 FROM analysis_records WHERE url_id = ?1 ORDER BY timestamp DESC",
            )
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(params![url_id], row_to_analysis)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;
        Ok(rows)
    }

    pub fn delete_analysis(&self, id: &str) -> AppResult<bool> {
        let conn = self.conn.lock();
        let changed = conn
            .execute("DELETE FROM analysis_records WHERE id = ?1", params![id])
            .map_err(storage_err)?;
        Ok(changed > 0)
    }

    /// Average performance score over each target's most recent analysis.
    /// `None` when no analyses exist yet.
    pub fn average_performance_score(&self) -> AppResult<Option<f64>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT AVG(performance_score) FROM analysis_records a
             WHERE timestamp = (SELECT MAX(timestamp) FROM analysis_records
                                WHERE url_id = a.url_id)",
            [],
            |row| row.get::<_, Option<f64>>(0),
        )
        .map_err(storage_err)
    }

    // ---- Quick tests ----

    /// Write exactly one new quick-test row, keyed by the raw URL.
    pub fn insert_quick_test(
        &self,
        url: &str,
        metrics: &PerformanceMetrics,
    ) -> AppResult<QuickTestRecord> {
        let record = QuickTestRecord {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            timestamp: Utc::now(),
            success: true,
            performance_score: metrics.performance_score.unwrap_or(0),
            fcp_time: metrics.fcp_time.unwrap_or(0),
            lcp_time: metrics.lcp_time.unwrap_or(0),
            speed_index: metrics.speed_index.unwrap_or(0),
            total_blocking_time: metrics.total_blocking_time.unwrap_or(0),
            cumulative_layout_shift: metrics.cumulative_layout_shift.unwrap_or(0.0),
            load_time: metrics.load_time.unwrap_or(0),
        };

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO quick_tests
                 (id, url, timestamp, success, performance_score, fcp_time, lcp_time,
                  speed_index, total_blocking_time, cumulative_layout_shift, load_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.id,
                record.url,
                record.timestamp.to_rfc3339(),
                record.success,
                record.performance_score as i64,
                record.fcp_time as i64,
                record.lcp_time as i64,
                record.speed_index as i64,
                record.total_blocking_time as i64,
                record.cumulative_layout_shift,
                record.load_time as i64,
            ],
        )
        .map_err(storage_err)?;

        debug!(url, id = %record.id, "quick test row inserted");
        Ok(record)
    }

    pub fn list_quick_tests(&self) -> AppResult<Vec<QuickTestRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, url, timestamp, success, performance_score, fcp_time, lcp_time,
                        speed_index, total_blocking_time, cumulative_layout_shift, load_time
                 FROM quick_tests ORDER BY timestamp DESC",
            )
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], row_to_quick_test)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;
        Ok(rows)
    }

    pub fn delete_quick_test(&self, id: &str) -> AppResult<bool> {
        let conn = self.conn.lock();
        let changed = conn
            .execute("DELETE FROM quick_tests WHERE id = ?1", params![id])
            .map_err(storage_err)?;
        Ok(changed > 0)
    }

    // ---- Request log ----

    /// Append one request outcome for the operational dashboard.
    pub fn log_request(&self, entry: &RequestLogEntry) -> AppResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO request_log (timestamp, endpoint, url, outcome, latency_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.timestamp.to_rfc3339(),
                entry.endpoint,
                entry.url,
                entry.outcome,
                entry.latency_ms as i64,
            ],
        )
        .map_err(storage_err)?;
        Ok(())
    }
}

fn row_to_target(row: &Row<'_>) -> rusqlite::Result<MonitoredTarget> {
    Ok(MonitoredTarget {
        id: row.get(0)?,
        url: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        show_on_dashboard: row.get(4)?,
        display_order: row.get(5)?,
        created_at: ts_col(row, 6)?,
    })
}

fn row_to_analysis(row: &Row<'_>) -> rusqlite::Result<AnalysisRecord> {
    Ok(AnalysisRecord {
        id: row.get(0)?,
        url_id: row.get(1)?,
        timestamp: ts_col(row, 2)?,
        success: row.get(3)?,
        performance_score: row.get::<_, i64>(4)? as u8,
        fcp_time: row.get::<_, i64>(5)? as u64,
        lcp_time: row.get::<_, i64>(6)? as u64,
        speed_index: row.get::<_, i64>(7)? as u64,
        total_blocking_time: row.get::<_, i64>(8)? as u64,
        cumulative_layout_shift: row.get(9)?,
        load_time: row.get::<_, i64>(10)? as u64,
    })
}

fn row_to_quick_test(row: &Row<'_>) -> rusqlite::Result<QuickTestRecord> {
    Ok(QuickTestRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        timestamp: ts_col(row, 2)?,
        success: row.get(3)?,
        performance_score: row.get::<_, i64>(4)? as u8,
        fcp_time: row.get::<_, i64>(5)? as u64,
        lcp_time: row.get::<_, i64>(6)? as u64,
        speed_index: row.get::<_, i64>(7)? as u64,
        total_blocking_time: row.get::<_, i64>(8)? as u64,
        cumulative_layout_shift: row.get(9)?,
        load_time: row.get::<_, i64>(10)? as u64,
    })
}
