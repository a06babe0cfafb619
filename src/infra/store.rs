//! Filesystem-backed content collections.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use metrics::counter;
use tokio::fs;
use tracing::{debug, info};

use crate::application::repos::{ContentStore, RepoError};
use crate::domain::entities::ContentEntry;
use crate::domain::slug::slugify;
use crate::infra::frontmatter::parse_document;

const EXTENSIONS: [&str; 2] = ["md", "mdx"];
const IGNORED_PREFIX: char = '_';

/// Reads `<root>/<collection>/**/*.md` documents.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn load_collection(&self, collection: &str) -> Result<Vec<ContentEntry>, RepoError> {
        let base = self.root.join(collection);
        if !is_directory(&base).await? {
            debug!(
                target = "chongyan::store",
                collection,
                path = %base.display(),
                "collection directory missing, treating as empty"
            );
            return Ok(Vec::new());
        }

        let files = collect_documents(&base).await?;
        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            entries.push(load_document(collection, &base, &path).await?);
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        counter!("chongyan_content_entries_loaded_total", "collection" => collection.to_string())
            .increment(entries.len() as u64);
        info!(
            target = "chongyan::store",
            collection,
            entries = entries.len(),
            "loaded content collection"
        );

        Ok(entries)
    }
}

async fn is_directory(path: &Path) -> Result<bool, RepoError> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(io_error(path, err)),
    }
}

async fn collect_documents(base: &Path) -> Result<Vec<PathBuf>, RepoError> {
    let mut pending = vec![base.to_path_buf()];
    let mut documents = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut reader = fs::read_dir(&dir).await.map_err(|err| io_error(&dir, err))?;
        while let Some(item) = reader.next_entry().await.map_err(|err| io_error(&dir, err))? {
            let path = item.path();
            let file_type = item.file_type().await.map_err(|err| io_error(&path, err))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && is_document(&path) {
                documents.push(path);
            }
        }
    }

    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    let ignored = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_none_or(|name| name.starts_with(IGNORED_PREFIX));
    let known_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)));
    !ignored && known_extension
}

async fn load_document(
    collection: &str,
    base: &Path,
    path: &Path,
) -> Result<ContentEntry, RepoError> {
    let source = fs::read_to_string(path)
        .await
        .map_err(|err| io_error(path, err))?;
    let (data, body) = parse_document(&source).map_err(|err| RepoError::InvalidEntry {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    Ok(ContentEntry::new(collection, entry_id(base, path), data, body))
}

/// `Rust Notes/Intro.md` → `rust-notes/intro`.
pub fn entry_id(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let stem = relative.with_extension("");
    stem.components()
        .filter_map(|component| component.as_os_str().to_str())
        .map(slugify)
        .collect::<Vec<_>>()
        .join("/")
}

fn io_error(path: &Path, err: io::Error) -> RepoError {
    RepoError::from_source(format!("{}: {err}", path.display()))
}
