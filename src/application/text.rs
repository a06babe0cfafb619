//! Text helpers used by templates.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::application::render::{RenderError, markdownify};

pub use crate::domain::slug::slugify;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)</?[^>]+(>|$)").expect("valid pattern"));
static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]\s*[\r\n]").expect("valid pattern"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;|&lt;|&gt;|&quot;|&#39;").expect("valid pattern"));

/// `hello-world` → `Hello World`.
pub fn upper_humanize(content: &str) -> String {
    let spaced = lower_humanize(content);
    let mut output = String::with_capacity(spaced.len());
    let mut previous: Option<char> = None;

    for ch in spaced.chars() {
        let starts_word = previous.is_none_or(char::is_whitespace);
        if starts_word && is_word_char(ch) {
            output.extend(ch.to_uppercase());
        } else {
            output.push(ch);
        }
        previous = Some(ch);
    }

    output
}

/// `Hello-World` → `hello world`.
pub fn lower_humanize(content: &str) -> String {
    content.to_lowercase().replace('-', " ")
}

/// Rendered text of a markdown body with every tag removed.
pub fn plainify(markdown: &str) -> Result<String, RenderError> {
    let html = markdownify(markdown, true)?;
    let text = TAG.replace_all(&html, "");
    let text = BLANK_RUN.replace_all(&text, "");
    let decoded = ENTITY.replace_all(&text, |caps: &Captures<'_>| match &caps[0] {
        "&amp;" => "&",
        "&lt;" => "<",
        "&gt;" => ">",
        "&quot;" => "\"",
        _ => "'",
    });
    Ok(decoded.into_owned())
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_humanize_title_cases_ascii_words() {
        assert_eq!(upper_humanize("hello-world"), "Hello World");
        assert_eq!(upper_humanize("RUST-lang tips"), "Rust Lang Tips");
        assert_eq!(upper_humanize("中文-title"), "中文 Title");
        assert_eq!(upper_humanize(""), "");
    }

    #[test]
    fn lower_humanize_replaces_hyphens() {
        assert_eq!(lower_humanize("Hello-World"), "hello world");
        assert_eq!(lower_humanize("a--b"), "a  b");
    }

    #[test]
    fn plainify_strips_markup_and_decodes_entities() {
        let text = plainify("# Title\n\nFish & chips <3\n\n> quoted").expect("plainify");
        assert!(text.starts_with("Title"));
        assert!(text.contains("Fish & chips <3"));
        assert!(text.contains("quoted"));
        assert!(!text.contains("anchor-link"));
    }

    #[test]
    fn slugify_is_reexported() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }
}
