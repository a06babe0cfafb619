//! Content tooling for the Chongyan blog.
//!
//! The crate is organised the way the site itself is: `domain` holds content
//! entries and slug rules, `application` holds the pure services page
//! templates call into (related posts, reading time, statistics, rendering),
//! and `infra` holds the filesystem content store and telemetry.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
