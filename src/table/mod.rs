//! The call sheet as a typed, immutable table.
//!
//! [`loader`] fetches and cleans the sheet, [`schema`] describes its columns,
//! and [`cache`] keeps loaded tables around until explicitly invalidated.

pub mod cache;
pub mod loader;
pub mod record;
pub mod schema;

pub use cache::TableCache;
pub use loader::{CallTable, load, transform};
pub use record::{CallRecord, CountField, Counts, Ratios, weekday_name};
