use sha2::{Digest, Sha256};

use super::escape_html;

const CHART_ID_HEX_LEN: usize = 12;

/// Placeholder the client-side renderer turns into a diagram.
pub(crate) fn mermaid_container(position: usize, source: &str) -> String {
    format!(
        "<div class=\"mermaid-container\" data-chart-id=\"{}\" data-chart=\"{}\"></div>\n",
        chart_id(position, source),
        escape_chart(source)
    )
}

pub(crate) fn is_mermaid(language: Option<&str>) -> bool {
    matches!(language, Some("mermaid"))
}

/// `mermaid-` followed by a digest of the block's position and source.
fn chart_id(position: usize, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(position.to_le_bytes());
    hasher.update(source.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("mermaid-{}", &digest[..CHART_ID_HEX_LEN])
}

/// Attribute-escaped source with newlines kept as `&#10;`.
fn escape_chart(source: &str) -> String {
    escape_html(source).replace('\n', "&#10;")
}
