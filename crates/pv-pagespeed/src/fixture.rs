//! Fixture-backed auditor
//!
//! Serves deterministic canned audits derived from the URL, so local
//! development and tests never touch the network. Selected at startup via
//! `PV_USE_FIXTURES`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use pv_types::{AppResult, PerformanceMetrics};

use crate::PerformanceAuditor;

pub struct FixtureAuditor;

impl FixtureAuditor {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic metrics seeded from the URL, kept within realistic
    /// ranges so dashboard charts look plausible.
    pub fn metrics_for(url: &str) -> PerformanceMetrics {
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        let seed = hasher.finish();

        let score = 55 + (seed % 45) as u8; // 55..=99
        let fcp = 800 + (seed >> 8) % 2200; // 0.8s..3s
        let lcp = fcp + 600 + (seed >> 16) % 2400;
        let speed_index = fcp + 200 + (seed >> 24) % 3000;
        let tbt = (seed >> 32) % 600;
        let cls = ((seed >> 40) % 250) as f64 / 1000.0; // 0.000..0.249
        let load_time = lcp + 500 + (seed >> 48) % 2000;

        PerformanceMetrics {
            performance_score: Some(score),
            fcp_time: Some(fcp),
            lcp_time: Some(lcp),
            speed_index: Some(speed_index),
            total_blocking_time: Some(tbt),
            cumulative_layout_shift: Some(cls),
            load_time: Some(load_time),
        }
    }
}

impl Default for FixtureAuditor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PerformanceAuditor for FixtureAuditor {
    async fn audit(&self, url: &str) -> AppResult<PerformanceMetrics> {
        Ok(Self::metrics_for(url))
    }
}
