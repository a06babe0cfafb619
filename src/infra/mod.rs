//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod frontmatter;
pub mod store;
pub mod telemetry;
