pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod output;
pub mod session;
pub mod shell;
pub mod table;

pub use error::PipelineError;
