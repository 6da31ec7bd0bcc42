//! Insight summarizer for PageVitals
//!
//! Sends a metrics-derived prompt to the Gemini generateContent API and
//! returns a short natural-language summary. Failures are typed so the HTTP
//! boundary can distinguish quota (429) from a missing credential (500) from
//! an unavailable upstream; the rule-based fallback sentence lives in
//! [`fallback`].

mod client;
pub mod fallback;

pub use client::{InsightClient, INSIGHT_MODEL};
