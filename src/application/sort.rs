//! Orderings applied to collection listings.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::entities::ContentEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest `created` first.
    Date,
    /// Most recently `updated` first.
    Update,
    /// Alphabetical by title.
    Title,
    /// Shuffled.
    Random,
}

impl SortOrder {
    pub fn apply(self, entries: &mut [ContentEntry]) {
        match self {
            SortOrder::Date => sort_by_date(entries),
            SortOrder::Update => sort_by_update(entries),
            SortOrder::Title => sort_by_title(entries),
            SortOrder::Random => sort_by_random(entries),
        }
    }
}

pub fn sort_by_date(entries: &mut [ContentEntry]) {
    entries.sort_by(|a, b| newest_first(a.data.created, b.data.created));
}

pub fn sort_by_update(entries: &mut [ContentEntry]) {
    entries.sort_by(|a, b| newest_first(a.data.updated, b.data.updated));
}

pub fn sort_by_title(entries: &mut [ContentEntry]) {
    entries.sort_by(|a, b| a.data.title.cmp(&b.data.title));
}

pub fn sort_by_random(entries: &mut [ContentEntry]) {
    entries.shuffle(&mut rand::rng());
}

/// Dated entries precede undated ones.
fn newest_first(a: Option<OffsetDateTime>, b: Option<OffsetDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FrontMatter;
    use time::macros::datetime;

    fn entry(id: &str, title: &str, created: Option<OffsetDateTime>) -> ContentEntry {
        let mut data = FrontMatter::new(title);
        data.created = created;
        data.updated = created.map(|at| at + time::Duration::days(1));
        ContentEntry::new("blog", id, data, "")
    }

    fn ids(entries: &[ContentEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    fn fixture() -> Vec<ContentEntry> {
        vec![
            entry("old", "Beta", Some(datetime!(2023-01-01 0:00 UTC))),
            entry("undated", "Alpha", None),
            entry("new", "Gamma", Some(datetime!(2024-06-01 0:00 UTC))),
        ]
    }

    #[test]
    fn date_sort_puts_newest_first_and_undated_last() {
        let mut entries = fixture();
        SortOrder::Date.apply(&mut entries);
        assert_eq!(ids(&entries), vec!["new", "old", "undated"]);
    }

    #[test]
    fn update_sort_uses_updated_field() {
        let mut entries = fixture();
        entries[0].data.updated = Some(datetime!(2025-01-01 0:00 UTC));
        SortOrder::Update.apply(&mut entries);
        assert_eq!(ids(&entries), vec!["old", "new", "undated"]);
    }

    #[test]
    fn title_sort_is_alphabetical() {
        let mut entries = fixture();
        SortOrder::Title.apply(&mut entries);
        assert_eq!(ids(&entries), vec!["undated", "old", "new"]);
    }

    #[test]
    fn random_sort_keeps_every_entry() {
        let mut entries = fixture();
        SortOrder::Random.apply(&mut entries);
        let mut sorted = ids(&entries);
        sorted.sort();
        assert_eq!(sorted, vec!["new", "old", "undated"]);
    }
}
