//! CLI command implementations.

pub mod build;
pub mod query;

pub use build::BuildCommand;
pub use query::QueryCommand;
