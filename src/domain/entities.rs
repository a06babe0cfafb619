//! Content entries as loaded from a collection directory.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::util::dates;

/// Identifier prefix marking a collection (or group) index document.
pub const INDEX_PREFIX: char = '-';
/// Identifier segment used by group index documents (`<group>/-index`).
pub const INDEX_SEGMENT: &str = "-index";

/// Read-only view of the classification labels attached to an entry.
///
/// The relevance ranker only needs identity plus labels, so anything that can
/// expose those (entries, search hits, test fixtures) can be ranked.
pub trait Taxonomy {
    fn id(&self) -> &str;
    fn categories(&self) -> &[String];
    fn tags(&self) -> &[String];
}

/// Front-matter metadata shared by every collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        serialize_with = "dates::serialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<OffsetDateTime>,
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        serialize_with = "dates::serialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "label_list")]
    pub categories: Vec<String>,
    /// Single-category field kept by older posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "label_list")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FrontMatter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            created: None,
            updated: None,
            draft: None,
            image: None,
            categories: Vec::new(),
            category: None,
            tags: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A single markdown document belonging to a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentEntry {
    pub id: String,
    pub collection: String,
    pub data: FrontMatter,
    #[serde(skip_serializing)]
    pub body: String,
}

impl ContentEntry {
    pub fn new(
        collection: impl Into<String>,
        id: impl Into<String>,
        data: FrontMatter,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            data,
            body: body.into(),
        }
    }

    /// Index documents (`-index`) describe a listing rather than an article.
    pub fn is_index(&self) -> bool {
        self.id.starts_with(INDEX_PREFIX)
    }

    pub fn is_draft(&self) -> bool {
        self.data.draft.unwrap_or(false)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.id.split('/')
    }

    /// The `<group>` of an id shaped `<group>/-index`.
    pub fn group_index_of(&self) -> Option<&str> {
        let mut segments = self.segments();
        match (segments.next(), segments.next(), segments.next()) {
            (Some(group), Some(INDEX_SEGMENT), None) => Some(group),
            _ => None,
        }
    }

    /// Every category label, including the legacy single `category` field.
    pub fn all_categories(&self) -> impl Iterator<Item = &str> {
        self.data
            .categories
            .iter()
            .map(String::as_str)
            .chain(self.data.category.as_deref())
    }
}

impl Taxonomy for ContentEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn categories(&self) -> &[String] {
        &self.data.categories
    }

    fn tags(&self) -> &[String] {
        &self.data.tags
    }
}

fn label_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(labels.unwrap_or_default().into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> ContentEntry {
        ContentEntry::new("blog", id, FrontMatter::new("Title"), "")
    }

    #[test]
    fn index_entries_are_detected_by_prefix() {
        assert!(entry("-index").is_index());
        assert!(!entry("rust/-index").is_index());
        assert!(!entry("hello").is_index());
    }

    #[test]
    fn group_index_requires_exactly_two_segments() {
        assert_eq!(entry("rust/-index").group_index_of(), Some("rust"));
        assert_eq!(entry("rust/deep/-index").group_index_of(), None);
        assert_eq!(entry("rust/intro").group_index_of(), None);
    }

    #[test]
    fn label_lists_drop_null_items() {
        let data: FrontMatter =
            serde_json::from_str(r#"{"title":"x","categories":["go",null,"rust"],"tags":null}"#)
                .expect("front matter");
        assert_eq!(data.categories, vec!["go", "rust"]);
        assert!(data.tags.is_empty());
    }

    #[test]
    fn legacy_category_is_included_in_all_categories() {
        let mut item = entry("post");
        item.data.categories = vec!["go".into()];
        item.data.category = Some("notes".into());
        let labels: Vec<_> = item.all_categories().collect();
        assert_eq!(labels, vec!["go", "notes"]);
    }
}
