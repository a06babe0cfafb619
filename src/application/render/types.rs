use serde::Serialize;
use thiserror::Error;

/// Whether a fragment is rendered as a whole document or as inline text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Block,
    /// A single wrapping paragraph is dropped.
    Inline,
}

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub markdown: String,
    pub mode: RenderMode,
}

impl RenderRequest {
    pub fn block(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            mode: RenderMode::Block,
        }
    }

    pub fn inline(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            mode: RenderMode::Inline,
        }
    }
}

/// A heading as it appears in the rendered table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedHeading {
    pub level: u8,
    pub slug: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub html: String,
    pub headings: Vec<RenderedHeading>,
    pub contains_code: bool,
    pub contains_mermaid: bool,
}

#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("markdown formatting failed: {message}")]
    Markdown { message: String },
    #[error("syntax highlighting failed: {language}: {message}")]
    Highlighting { language: String, message: String },
    #[error("document processing failed: {message}")]
    Document { message: String },
}

/// Implementations must be deterministic: the same request yields the same
/// output.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}
