use std::fs;
use std::path::Path;
use std::sync::Arc;

use chongyan::application::collection::{CollectionService, EntryQuery};
use chongyan::application::pagination::{PaginationSettings, paginate};
use chongyan::application::reading_time::{ReadingTimeEstimator, ReadingTimeFormat};
use chongyan::application::repos::{ContentStore, RepoError};
use chongyan::application::similar::similar_items;
use chongyan::application::sitemap::SitemapService;
use chongyan::application::sort::SortOrder;
use chongyan::application::stats::SiteStatsService;
use chongyan::infra::store::FsContentStore;
use tempfile::TempDir;
use time::macros::date;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent directory")).expect("create dirs");
    fs::write(path, contents).expect("write document");
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    write(
        root,
        "blog/rust-async.md",
        "---\ntitle: Async Rust\ncreated: 2024-01-10\ncategories: [编程]\ntags: [rust, async]\n---\nhello world\n",
    );
    write(
        root,
        "blog/rust-traits.md",
        "---\ntitle: Traits\ncreated: 2024-02-01\nupdated: 2024-03-01\ncategories: [编程]\ntags: [rust]\n---\nzero cost\n",
    );
    write(
        root,
        "blog/cooking.md",
        "---\ntitle: Cooking\ncreated: 2023-12-24\ncategories: [生活]\ntags: [rust]\n---\n做饭\n",
    );
    write(
        root,
        "blog/unfinished.md",
        "---\ntitle: Unfinished\ndraft: true\ncategories: [编程]\ntags: [rust]\n---\nnot yet\n",
    );
    write(root, "blog/_partial.md", "not a document");
    write(root, "blog/cover.png", "binary");

    write(root, "notes/-index.md", "---\ntitle: Notes\n---\n");
    write(root, "notes/go/-index.md", "---\ntitle: Go\n---\n");
    write(
        root,
        "notes/go/Basics.md",
        "---\ntitle: Go Basics\ncreated: 2024-04-02\n---\ngo is simple\n",
    );

    dir
}

fn collections(dir: &TempDir) -> CollectionService {
    CollectionService::new(Arc::new(FsContentStore::new(dir.path())))
}

#[tokio::test]
async fn filesystem_store_loads_documents_by_slugged_id() {
    let dir = fixture();
    let store = FsContentStore::new(dir.path());

    let blog = store.load_collection("blog").await.expect("blog");
    let ids: Vec<_> = blog.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["cooking", "rust-async", "rust-traits", "unfinished"]);

    let notes = store.load_collection("notes").await.expect("notes");
    let ids: Vec<_> = notes.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["-index", "go/-index", "go/basics"]);

    assert!(store.load_collection("projects").await.expect("missing").is_empty());
}

#[tokio::test]
async fn unknown_entries_are_not_found() {
    let dir = fixture();
    let store = FsContentStore::new(dir.path());

    let err = store.load_entry("blog", "nope").await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[tokio::test]
async fn broken_front_matter_names_the_file() {
    let dir = fixture();
    write(dir.path(), "blog/broken.md", "---\ntitle: [unclosed\n---\nbody\n");

    let err = FsContentStore::new(dir.path())
        .load_collection("blog")
        .await
        .unwrap_err();
    match err {
        RepoError::InvalidEntry { path, .. } => assert!(path.ends_with("broken.md")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn related_posts_need_a_shared_category_and_tag() {
    let dir = fixture();
    let service = collections(&dir);

    let current = service
        .store()
        .load_entry("blog", "rust-async")
        .await
        .expect("entry");
    let pool = service
        .entries("blog", EntryQuery::default())
        .await
        .expect("pool");

    let related: Vec<_> = similar_items(&current, &pool)
        .into_iter()
        .map(|entry| entry.id.as_str())
        .collect();
    assert_eq!(related, vec!["rust-traits"]);
}

#[tokio::test]
async fn listing_sorts_filters_and_pages() {
    let dir = fixture();
    let service = collections(&dir);

    let entries = service
        .entries("blog", EntryQuery::sorted(SortOrder::Date))
        .await
        .expect("entries");
    let ids: Vec<_> = entries.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["rust-traits", "rust-async", "cooking"]);

    let page = paginate(entries, 2, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    assert!(page.has_previous());
    assert!(!page.has_next());

    let with_drafts = service
        .entries(
            "blog",
            EntryQuery {
                include_drafts: true,
                ..EntryQuery::default()
            },
        )
        .await
        .expect("entries");
    assert_eq!(with_drafts.len(), 4);
    assert_eq!(
        PaginationSettings::default().page_size(PaginationSettings::kind_of("blog")),
        10
    );
}

#[tokio::test]
async fn groups_and_their_entries() {
    let dir = fixture();
    let service = collections(&dir);

    let groups = service.groups("notes").await.expect("groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].data.title, "Go");

    let index = service.index("notes").await.expect("index");
    assert_eq!(index.map(|entry| entry.data.title), Some("Notes".to_string()));

    let go = service.entries_in_group("notes", "go").await.expect("group");
    let ids: Vec<_> = go.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["go/basics"]);
}

#[tokio::test]
async fn stats_cover_blog_and_notes() {
    let dir = fixture();
    let service = SiteStatsService::new(collections(&dir), date!(2024 - 01 - 01));

    let stats = service.stats(date!(2024 - 01 - 31)).await.expect("stats");
    assert_eq!(stats.articles, 4);
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.tags, 2);
    assert_eq!(stats.total_words, 2 + 2 + 2 + 3);
    assert_eq!(stats.total_words_display, "9");
    assert_eq!(stats.running_days, 30);
}

#[tokio::test]
async fn sitemap_lists_published_entries() {
    let dir = fixture();
    let sitemap = SitemapService::new(collections(&dir), "https://example.com/");

    let xml = sitemap
        .sitemap_xml(date!(2024 - 06 - 01))
        .await
        .expect("sitemap");

    assert!(xml.contains("<loc>https://example.com/</loc>"));
    assert!(xml.contains(
        "<loc>https://example.com/blog/rust-traits</loc>\n    <lastmod>2024-03-01</lastmod>"
    ));
    assert!(xml.contains("<loc>https://example.com/notes/go/basics</loc>"));
    assert!(!xml.contains("unfinished"));
    assert!(!xml.contains("-index"));
}

#[tokio::test]
async fn reading_time_of_a_loaded_entry() {
    let dir = fixture();
    let entry = FsContentStore::new(dir.path())
        .load_entry("blog", "rust-async")
        .await
        .expect("entry");

    let format = ReadingTimeFormat::new("{minutes} min").expect("template");
    let estimator = ReadingTimeEstimator::new(format);
    assert_eq!(estimator.reading_time(&entry.body, 1.0), "1 min");
}
