//! Splitting `---` YAML front matter from markdown bodies.

use thiserror::Error;

use crate::domain::entities::FrontMatter;

const DELIMITER: &str = "---";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("document does not start with a `---` front matter block")]
    Missing,
    #[error("front matter block is not closed")]
    Unterminated,
    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parse a document into its front matter and the body that follows it.
pub fn parse_document(source: &str) -> Result<(FrontMatter, String), FrontMatterError> {
    let (yaml, body) = split(source)?;
    let data: FrontMatter = serde_yaml::from_str(yaml)?;
    Ok((data, body.to_string()))
}

fn split(source: &str) -> Result<(&str, &str), FrontMatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');

    let first = lines.next().ok_or(FrontMatterError::Missing)?;
    if first.trim_end() != DELIMITER {
        return Err(FrontMatterError::Missing);
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let yaml = &source[yaml_start..offset];
            let body = &source[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn front_matter_and_body_are_separated() {
        let source = "---\ntitle: Hello\ncreated: 2024-01-02\ntags: [rust, cli]\nseries: intro\n---\n# Body\n";
        let (data, body) = parse_document(source).expect("document");

        assert_eq!(data.title, "Hello");
        assert_eq!(data.created, Some(datetime!(2024-01-02 0:00 UTC)));
        assert_eq!(data.tags, vec!["rust", "cli"]);
        assert_eq!(data.extra.get("series").and_then(|v| v.as_str()), Some("intro"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn datetimes_without_an_offset_are_accepted() {
        let source = "---\ntitle: Timed\ncreated: 2024-01-02 10:00:00\nupdated: 2024-01-03T08:30:00\n---\n";
        let (data, _) = parse_document(source).expect("document");

        assert_eq!(data.created, Some(datetime!(2024-01-02 10:00 UTC)));
        assert_eq!(data.updated, Some(datetime!(2024-01-03 8:30 UTC)));
    }

    #[test]
    fn crlf_documents_are_accepted() {
        let (data, body) = parse_document("---\r\ntitle: Win\r\n---\r\nbody").expect("document");
        assert_eq!(data.title, "Win");
        assert_eq!(body, "body");
    }

    #[test]
    fn documents_without_front_matter_are_rejected() {
        assert!(matches!(parse_document("# Just markdown"), Err(FrontMatterError::Missing)));
        assert!(matches!(parse_document(""), Err(FrontMatterError::Missing)));
    }

    #[test]
    fn unclosed_blocks_are_rejected() {
        assert!(matches!(
            parse_document("---\ntitle: x\n"),
            Err(FrontMatterError::Unterminated)
        ));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        assert!(matches!(
            parse_document("---\ntitle: [unclosed\n---\n"),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn missing_title_is_a_yaml_error() {
        assert!(matches!(
            parse_document("---\ndraft: true\n---\n"),
            Err(FrontMatterError::Yaml(_))
        ));
    }
}
