//! Server state
//!
//! Every handler dependency is constructed once at startup and threaded
//! through here. In particular the store and the auditor are explicit,
//! injected dependencies: tests substitute fakes instead of the process
//! relying on globals or environment checks at call time.

use std::sync::Arc;

use pv_config::AppConfig;
use pv_insight::InsightClient;
use pv_pagespeed::PerformanceAuditor;
use pv_storage::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub auditor: Arc<dyn PerformanceAuditor>,
    pub insight: Arc<InsightClient>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Store,
        auditor: Arc<dyn PerformanceAuditor>,
        insight: InsightClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            auditor,
            insight: Arc::new(insight),
        }
    }
}
