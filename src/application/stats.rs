//! Site-wide statistics for the sidebar panel.

use std::collections::BTreeSet;

use serde::Serialize;
use time::Date;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::application::collection::{CollectionService, EntryQuery};
use crate::application::repos::RepoError;
use crate::application::word_count::{count_words, format_word_total};

pub const BLOG_COLLECTION: &str = "blog";
pub const NOTES_COLLECTION: &str = "notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteStats {
    pub articles: usize,
    pub categories: usize,
    pub tags: usize,
    pub total_words: usize,
    /// `total_words` abbreviated, e.g. `12.3K`.
    pub total_words_display: String,
    pub running_days: i64,
}

#[derive(Debug, Clone)]
struct ContentAggregates {
    articles: usize,
    categories: usize,
    tags: usize,
    total_words: usize,
}

pub struct SiteStatsService {
    collections: CollectionService,
    start_date: Date,
    aggregates: OnceCell<ContentAggregates>,
}

impl SiteStatsService {
    pub fn new(collections: CollectionService, start_date: Date) -> Self {
        Self {
            collections,
            start_date,
            aggregates: OnceCell::new(),
        }
    }

    /// Content totals are computed once per service; `running_days` follows
    /// `today`.
    pub async fn stats(&self, today: Date) -> Result<SiteStats, RepoError> {
        let aggregates = self
            .aggregates
            .get_or_try_init(|| self.aggregate())
            .await?;

        Ok(SiteStats {
            articles: aggregates.articles,
            categories: aggregates.categories,
            tags: aggregates.tags,
            total_words: aggregates.total_words,
            total_words_display: format_word_total(aggregates.total_words),
            running_days: running_days(self.start_date, today),
        })
    }

    async fn aggregate(&self) -> Result<ContentAggregates, RepoError> {
        let blog = self
            .collections
            .entries(BLOG_COLLECTION, EntryQuery::default())
            .await?;

        let notes = match self
            .collections
            .entries(NOTES_COLLECTION, EntryQuery::default())
            .await
        {
            Ok(notes) => notes,
            Err(err) => {
                warn!(
                    target = "chongyan::stats",
                    error = %err,
                    "notes collection unavailable, counting it as empty"
                );
                Vec::new()
            }
        };

        let categories: BTreeSet<&str> = blog.iter().flat_map(|e| e.all_categories()).collect();
        let tags: BTreeSet<&str> = blog
            .iter()
            .flat_map(|e| e.data.tags.iter().map(String::as_str))
            .collect();
        let total_words = blog
            .iter()
            .chain(notes.iter())
            .map(|entry| count_words(&entry.body))
            .sum();

        Ok(ContentAggregates {
            articles: blog.len() + notes.len(),
            categories: categories.len(),
            tags: tags.len(),
            total_words,
        })
    }
}

/// Whole days from `start` to `today`, clamped at zero.
pub fn running_days(start: Date, today: Date) -> i64 {
    (today - start).whole_days().max(0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use time::macros::date;

    use super::*;
    use crate::application::repos::ContentStore;
    use crate::domain::entities::{ContentEntry, FrontMatter};

    struct CountingStore {
        collections: HashMap<&'static str, Vec<ContentEntry>>,
        loads: AtomicUsize,
        failing: Option<&'static str>,
    }

    #[async_trait]
    impl ContentStore for CountingStore {
        async fn load_collection(&self, collection: &str) -> Result<Vec<ContentEntry>, RepoError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.failing == Some(collection) {
                return Err(RepoError::from_source("disk on fire"));
            }
            Ok(self.collections.get(collection).cloned().unwrap_or_default())
        }
    }

    fn post(
        id: &str,
        categories: &[&str],
        category: Option<&str>,
        tags: &[&str],
        body: &str,
    ) -> ContentEntry {
        let mut data = FrontMatter::new(id);
        data.categories = categories.iter().map(|c| c.to_string()).collect();
        data.category = category.map(str::to_string);
        data.tags = tags.iter().map(|t| t.to_string()).collect();
        ContentEntry::new("blog", id, data, body)
    }

    fn store(failing: Option<&'static str>) -> Arc<CountingStore> {
        let blog = vec![
            post("-index", &["ignored"], None, &["ignored"], "index words"),
            post("a", &["go", "web"], None, &["http"], "hello world"),
            post("b", &["go"], Some("ops"), &["http", "k8s"], "你好"),
        ];
        let notes = vec![ContentEntry::new(
            "notes",
            "n1",
            FrontMatter::new("n1"),
            "one two three",
        )];
        Arc::new(CountingStore {
            collections: HashMap::from([("blog", blog), ("notes", notes)]),
            loads: AtomicUsize::new(0),
            failing,
        })
    }

    #[tokio::test]
    async fn stats_aggregate_blog_and_notes() {
        let svc = SiteStatsService::new(CollectionService::new(store(None)), date!(2023 - 01 - 01));
        let stats = svc.stats(date!(2023 - 01 - 31)).await.expect("stats");

        assert_eq!(stats.articles, 3);
        assert_eq!(stats.categories, 3);
        assert_eq!(stats.tags, 2);
        assert_eq!(stats.total_words, 2 + 2 + 3);
        assert_eq!(stats.total_words_display, "7");
        assert_eq!(stats.running_days, 30);
    }

    #[tokio::test]
    async fn aggregates_are_memoized() {
        let backing = store(None);
        let svc = SiteStatsService::new(
            CollectionService::new(backing.clone()),
            date!(2023 - 01 - 01),
        );

        svc.stats(date!(2024 - 01 - 01)).await.expect("first");
        let second = svc.stats(date!(2024 - 01 - 02)).await.expect("second");

        assert_eq!(backing.loads.load(Ordering::SeqCst), 2);
        assert_eq!(second.running_days, 366);
    }

    #[tokio::test]
    async fn failing_notes_count_as_empty() {
        let svc = SiteStatsService::new(
            CollectionService::new(store(Some(NOTES_COLLECTION))),
            date!(2023 - 01 - 01),
        );
        let stats = svc.stats(date!(2023 - 01 - 01)).await.expect("stats");
        assert_eq!(stats.articles, 2);
        assert_eq!(stats.total_words, 4);
    }

    #[tokio::test]
    async fn failing_blog_is_an_error() {
        let svc = SiteStatsService::new(
            CollectionService::new(store(Some(BLOG_COLLECTION))),
            date!(2023 - 01 - 01),
        );
        assert!(svc.stats(date!(2023 - 01 - 01)).await.is_err());
    }

    #[test]
    fn running_days_never_goes_negative() {
        assert_eq!(running_days(date!(2023 - 01 - 10), date!(2023 - 01 - 01)), 0);
        assert_eq!(running_days(date!(2023 - 01 - 01), date!(2023 - 01 - 01)), 0);
        assert_eq!(running_days(date!(2023 - 01 - 01), date!(2023 - 03 - 01)), 59);
    }
}
