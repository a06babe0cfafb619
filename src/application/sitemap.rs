//! Sitemap service for sitemap.xml, the sitemap index and robots.txt.

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::application::collection::{CollectionService, EntryQuery};
use crate::application::repos::RepoError;
use crate::application::stats::{BLOG_COLLECTION, NOTES_COLLECTION};
use crate::domain::entities::ContentEntry;
use crate::util::dates::format_calendar_date;

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to list `{collection}`: {source}")]
    Collection {
        collection: &'static str,
        #[source]
        source: RepoError,
    },
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Clone)]
pub struct SitemapService {
    collections: CollectionService,
    site_url: String,
}

impl SitemapService {
    pub fn new(collections: CollectionService, site_url: impl AsRef<str>) -> Self {
        Self {
            collections,
            site_url: site_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Entries without `updated` or `created` fall back to `today`.
    pub async fn sitemap_xml(&self, today: Date) -> Result<String, SitemapError> {
        let blog_load = self.published(BLOG_COLLECTION);
        let notes_load = self.published(NOTES_COLLECTION);
        let (blog, notes) = futures::try_join!(blog_load, notes_load)?;

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">",
        );

        xml.push_str(&url_entry(
            &format!("{}/", self.site_url),
            today,
            "daily",
            "1.0",
        ));

        for (prefix, entries) in [("blog", &blog), ("notes", &notes)] {
            for entry in entries {
                let loc = format!("{}/{prefix}/{}", self.site_url, entry.id);
                xml.push_str(&url_entry(&loc, lastmod(entry, today), "weekly", "0.9"));
            }
        }

        xml.push_str("\n</urlset>");
        Ok(xml)
    }

    pub fn sitemap_index_xml(&self, now: OffsetDateTime) -> Result<String, SitemapError> {
        let lastmod = now.to_offset(UtcOffset::UTC).format(&Rfc3339)?;
        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n  <sitemap>\n    <loc>{}/sitemap.xml</loc>\n    <lastmod>{lastmod}</lastmod>\n  </sitemap>\n</sitemapindex>",
            self.site_url
        ))
    }

    pub fn robots_txt(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
            self.site_url
        )
    }

    async fn published(&self, collection: &'static str) -> Result<Vec<ContentEntry>, SitemapError> {
        self.collections
            .entries(collection, EntryQuery::default())
            .await
            .map_err(|source| SitemapError::Collection { collection, source })
    }
}

fn lastmod(entry: &ContentEntry, today: Date) -> Date {
    entry
        .data
        .updated
        .or(entry.data.created)
        .map(|at| at.to_offset(UtcOffset::UTC).date())
        .unwrap_or(today)
}

fn url_entry(loc: &str, lastmod: Date, changefreq: &str, priority: &str) -> String {
    format!(
        "\n  <url>\n    <loc>{loc}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{changefreq}</changefreq>\n    <priority>{priority}</priority>\n  </url>",
        format_calendar_date(lastmod)
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use time::macros::{date, datetime};

    use super::*;
    use crate::application::repos::ContentStore;
    use crate::domain::entities::FrontMatter;

    struct MemoryStore(HashMap<&'static str, Vec<ContentEntry>>);

    #[async_trait]
    impl ContentStore for MemoryStore {
        async fn load_collection(&self, collection: &str) -> Result<Vec<ContentEntry>, RepoError> {
            Ok(self.0.get(collection).cloned().unwrap_or_default())
        }
    }

    fn service() -> SitemapService {
        let mut dated = FrontMatter::new("Dated");
        dated.created = Some(datetime!(2024-02-01 0:00 UTC));
        dated.updated = Some(datetime!(2024-03-05 23:30 -2));

        let mut draft = FrontMatter::new("Draft");
        draft.draft = Some(true);

        let blog = vec![
            ContentEntry::new("blog", "-index", FrontMatter::new("Blog"), ""),
            ContentEntry::new("blog", "dated", dated, ""),
            ContentEntry::new("blog", "wip", draft, ""),
        ];
        let notes = vec![ContentEntry::new("notes", "rust/intro", FrontMatter::new("Intro"), "")];

        let store = MemoryStore(HashMap::from([("blog", blog), ("notes", notes)]));
        SitemapService::new(CollectionService::new(Arc::new(store)), "https://example.com/")
    }

    #[tokio::test]
    async fn sitemap_lists_home_and_published_entries() {
        let xml = service()
            .sitemap_xml(date!(2024 - 06 - 01))
            .await
            .expect("sitemap");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://example.com/</loc>\n    <lastmod>2024-06-01</lastmod>\n    <changefreq>daily</changefreq>\n    <priority>1.0</priority>"));
        assert!(xml.contains("<loc>https://example.com/blog/dated</loc>\n    <lastmod>2024-03-06</lastmod>"));
        assert!(xml.contains("<loc>https://example.com/notes/rust/intro</loc>\n    <lastmod>2024-06-01</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>0.9</priority>"));
        assert!(!xml.contains("-index"));
        assert!(!xml.contains("/blog/wip"));
        assert!(xml.ends_with("</urlset>"));
    }

    #[test]
    fn sitemap_index_points_at_the_sitemap() {
        let xml = service()
            .sitemap_index_xml(datetime!(2024-06-01 12:00 +8))
            .expect("index");
        assert!(xml.contains("<loc>https://example.com/sitemap.xml</loc>"));
        assert!(xml.contains("<lastmod>2024-06-01T04:00:00Z</lastmod>"));
    }

    #[test]
    fn robots_txt_advertises_the_sitemap() {
        assert_eq!(
            service().robots_txt(),
            "User-agent: *\nAllow: /\nSitemap: https://example.com/sitemap.xml\n"
        );
    }
}
