//! Utility functions and helpers for PageVitals

pub mod retry;

pub use retry::{retry_with_backoff, RetryPolicy};
