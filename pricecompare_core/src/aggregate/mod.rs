//! Cross-platform price aggregation.
//!
//! This module provides:
//! - `CompareOutcome`: the settled result of one aggregation call
//! - `Aggregator`: engine for the concurrent fan-out, filter, rank and
//!   truncate pipeline
//!
//! # Example
//!
//! ```ignore
//! use pricecompare_core::aggregate::Aggregator;
//! use pricecompare_core::model::SearchParams;
//!
//! let engine = Aggregator::new(&registry);
//! let outcome = engine.compare_across_sources(&SearchParams::new("SONY 50吋電視")).await;
//! ```

mod engine;
mod types;

pub use engine::{Aggregator, DEFAULT_TIMEOUT_MS};
pub use types::{CompareOutcome, SourceFailure};
