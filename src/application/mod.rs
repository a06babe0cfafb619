//! Application services over loaded content.

pub mod collection;
pub mod error;
pub mod pagination;
pub mod reading_time;
pub mod render;
pub mod repos;
pub mod similar;
pub mod sitemap;
pub mod sort;
pub mod stats;
pub mod text;
pub mod word_count;
