//! Slug generation for entry ids and heading anchors.
//!
//! Two styles are supported. [`SlugStyle::Unicode`] follows the GitHub
//! flavour used by the site's markdown toolchain: lowercase, punctuation
//! removed, spaces turned into hyphens, and non-Latin letters kept as they
//! are (`基线 对齐` → `基线-对齐`). [`SlugStyle::Pinyin`] transliterates
//! Chinese through the `pinyin` crate and hands the result to `slug`, so the
//! same input becomes `ji-xian-dui-qi`.

use std::collections::HashMap;

use pinyin::{Pinyin, ToPinyin};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugStyle {
    #[default]
    Unicode,
    Pinyin,
}

impl SlugStyle {
    pub fn apply(self, input: &str) -> String {
        match self {
            SlugStyle::Unicode => slugify(input),
            SlugStyle::Pinyin => derive_pinyin_slug(input).unwrap_or_else(|_| slugify(input)),
        }
    }
}

/// GitHub-style slug of `input`.
pub fn slugify(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch == ' ' {
            output.push('-');
        } else if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            output.push(ch);
        }
    }
    output
}

/// ASCII-only slug with Chinese transliterated to pinyin.
pub fn derive_pinyin_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slug::slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Hands out document-unique anchors: repeated headings receive `-1`, `-2`, …
#[derive(Debug, Default)]
pub struct AnchorSlugger {
    style: SlugStyle,
    occurrences: HashMap<String, usize>,
}

impl AnchorSlugger {
    pub fn new(style: SlugStyle) -> Self {
        Self {
            style,
            occurrences: HashMap::new(),
        }
    }

    pub fn anchor_for(&mut self, heading: &str) -> String {
        let base = self.style.apply(heading);
        let mut candidate = base.clone();

        while self.occurrences.contains_key(&candidate) {
            let count = self.occurrences.entry(base.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{base}-{count}");
        }

        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}
