//! Table definitions

/// Applied on every open; all statements are idempotent.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS monitored_targets (
    id                TEXT PRIMARY KEY,
    url               TEXT NOT NULL,
    name              TEXT NOT NULL,
    description       TEXT,
    show_on_dashboard INTEGER NOT NULL DEFAULT 1,
    display_order     INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS analysis_records (
    id                      TEXT PRIMARY KEY,
    url_id                  TEXT NOT NULL REFERENCES monitored_targets(id) ON DELETE CASCADE,
    timestamp               TEXT NOT NULL,
    success                 INTEGER NOT NULL,
    performance_score       INTEGER NOT NULL,
    fcp_time                INTEGER NOT NULL,
    lcp_time                INTEGER NOT NULL,
    speed_index             INTEGER NOT NULL,
    total_blocking_time     INTEGER NOT NULL,
    cumulative_layout_shift REAL NOT NULL,
    load_time               INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_analysis_url_id ON analysis_records(url_id);

CREATE TABLE IF NOT EXISTS quick_tests (
    id                      TEXT PRIMARY KEY,
    url                     TEXT NOT NULL,
    timestamp               TEXT NOT NULL,
    success                 INTEGER NOT NULL,
    performance_score       INTEGER NOT NULL,
    fcp_time                INTEGER NOT NULL,
    lcp_time                INTEGER NOT NULL,
    speed_index             INTEGER NOT NULL,
    total_blocking_time     INTEGER NOT NULL,
    cumulative_layout_shift REAL NOT NULL,
    load_time               INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS request_log (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp  TEXT NOT NULL,
    endpoint   TEXT NOT NULL,
    url        TEXT NOT NULL,
    outcome    TEXT NOT NULL,
    latency_ms INTEGER NOT NULL
);
";
