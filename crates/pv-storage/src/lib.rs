//! SQLite persistence for PageVitals
//!
//! The store is constructed once at process start and passed through
//! application state; nothing here is a module-level global. Analysis and
//! quick-test rows are insert-only: the store exposes no update path for
//! them.
//!
//! The absence-to-zero mapping lives here and only here: a metric the
//! auditor reported as unavailable is written as `0`. This conflates
//! "measured zero" with "not measured" and is a deliberate, documented
//! product choice carried over from the dashboard's history.

mod schema;
mod store;

pub use store::Store;
