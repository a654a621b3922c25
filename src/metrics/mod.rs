//! Filtering of the call table and aggregation into a [`MetricsBundle`].
//!
//! A [`FilterSelection`] picks the rows, [`aggregate`] averages the counts
//! and ratios over them, and [`FilterOptions`] lists the values a
//! presentation layer can offer for filtering.

pub mod aggregate;
pub mod filter;
pub mod types;
pub mod utility;

pub use aggregate::aggregate;
pub use filter::{CallerFilter, FilterSelection};
pub use types::{FilterOptions, MetricsBundle};
