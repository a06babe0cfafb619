//! Word totals for the site statistics panel.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid pattern"));
static IMAGE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid pattern"));
static LINK_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").expect("valid pattern"));
static HEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"#{1,6}\s").expect("valid pattern"));
static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_]{1,2}([^*_]+)[*_]{1,2}").expect("valid pattern"));
static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("valid pattern"));

/// Count words in a markdown body: each Chinese character is a word, and so
/// is each standalone run of ASCII letters. Markup, image references and
/// whole links are discarded first.
pub fn count_words(markdown: &str) -> usize {
    if markdown.is_empty() {
        return 0;
    }

    let text = HTML_TAG.replace_all(markdown, "");
    let text = IMAGE_REF.replace_all(&text, "");
    let text = LINK_REF.replace_all(&text, "");
    let text = HEADING_MARKER.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "$1");
    let text = NEWLINES.replace_all(&text, " ");
    let text = text.trim();

    if text.is_empty() {
        return 0;
    }

    let cjk = text.chars().filter(|ch| is_cjk_word(*ch)).count();
    cjk + count_ascii_words(text)
}

/// `1234` → `1.2K`, `2500000` → `2.5M`.
pub fn format_word_total(total: usize) -> String {
    if total >= 1_000_000 {
        format!("{:.1}M", total as f64 / 1_000_000.0)
    } else if total >= 1_000 {
        format!("{:.1}K", total as f64 / 1_000.0)
    } else {
        total.to_string()
    }
}

fn is_cjk_word(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}

fn is_ascii_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Runs of ASCII letters with a non-word character (or the text edge) on
/// both sides. `abc1` and `x_y` do not count; `don't` counts twice.
fn count_ascii_words(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut count = 0;
    let mut idx = 0;

    while idx < chars.len() {
        if !chars[idx].is_ascii_alphabetic() {
            idx += 1;
            continue;
        }

        let start = idx;
        while idx < chars.len() && chars[idx].is_ascii_alphabetic() {
            idx += 1;
        }

        let open = start == 0 || !is_ascii_word_char(chars[start - 1]);
        let close = idx == chars.len() || !is_ascii_word_char(chars[idx]);
        if open && close {
            count += 1;
        }
    }

    count
}
