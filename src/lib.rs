//! Inflation and cost-of-living adjusted PhD stipend comparisons.
//!
//! [`core`] holds the pure income pipelines, [`input`] reads the raw tables
//! they consume, and [`service`] caches their reports for repeated renders.

pub mod cache;
pub mod config;
pub mod core;
pub mod input;
pub mod money;
pub mod service;

pub use config::Config;
pub use service::{EuropeSnapshots, IncomeService, UkSnapshots};
