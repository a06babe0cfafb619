//! Collection queries used by listing pages.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use crate::application::repos::{ContentStore, RepoError};
use crate::application::sort::SortOrder;
use crate::domain::entities::{ContentEntry, INDEX_SEGMENT};

/// Filters applied by [`CollectionService::entries`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryQuery {
    pub include_index: bool,
    pub include_drafts: bool,
    pub sort: Option<SortOrder>,
}

impl EntryQuery {
    pub fn sorted(sort: SortOrder) -> Self {
        Self {
            sort: Some(sort),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct CollectionService {
    store: Arc<dyn ContentStore>,
}

impl CollectionService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub async fn entries(
        &self,
        collection: &str,
        query: EntryQuery,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        let loaded = self.store.load_collection(collection).await?;
        let total = loaded.len();

        let mut entries: Vec<ContentEntry> = loaded
            .into_iter()
            .filter(|entry| query.include_index || !entry.is_index())
            .filter(|entry| query.include_drafts || !entry.is_draft())
            .collect();

        if let Some(sort) = query.sort {
            sort.apply(&mut entries);
        }

        debug!(
            target = "chongyan::collection",
            collection,
            total,
            kept = entries.len(),
            "filtered collection entries"
        );

        Ok(entries)
    }

    /// Entries of several collections, loaded concurrently and concatenated
    /// in the order given.
    pub async fn entries_batch(
        &self,
        collections: &[&str],
        query: EntryQuery,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        let loads = collections
            .iter()
            .map(|collection| self.entries(collection, query));
        let batches = try_join_all(loads).await?;
        Ok(batches.into_iter().flatten().collect())
    }

    /// The collection's own `-index` document.
    pub async fn index(&self, collection: &str) -> Result<Option<ContentEntry>, RepoError> {
        let entries = self.store.load_collection(collection).await?;
        Ok(entries.into_iter().find(|entry| entry.id == INDEX_SEGMENT))
    }

    /// Group index documents (`<group>/-index`).
    pub async fn groups(&self, collection: &str) -> Result<Vec<ContentEntry>, RepoError> {
        let entries = self.store.load_collection(collection).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.group_index_of().is_some())
            .collect())
    }

    /// Non-index entries nested under `group`.
    pub async fn entries_in_group(
        &self,
        collection: &str,
        group: &str,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        let entries = self.store.load_collection(collection).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| in_group(entry, group))
            .collect())
    }

    /// Drafts are visible only while developing.
    pub async fn entries_for_environment(
        &self,
        collection: &str,
        dev: bool,
    ) -> Result<Vec<ContentEntry>, RepoError> {
        let query = EntryQuery {
            include_drafts: dev,
            ..EntryQuery::default()
        };
        self.entries(collection, query).await
    }
}

fn in_group(entry: &ContentEntry, group: &str) -> bool {
    let mut segments = entry.segments();
    let first = segments.next();
    let rest: Vec<&str> = segments.collect();
    first == Some(group) && !rest.is_empty() && rest.last() != Some(&INDEX_SEGMENT)
}
