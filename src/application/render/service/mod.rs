mod config;
mod highlight;
mod mermaid;
mod post;
mod rewrite;

use std::sync::Arc;
use std::time::Instant;

use comrak::{Arena, format_html, nodes::AstNode, parse_document};
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use syntect::{html::ClassStyle, parsing::SyntaxSet};
use tracing::debug;

use crate::application::render::types::{
    RenderError, RenderMode, RenderOutput, RenderRequest, RenderService,
};
use crate::domain::slug::SlugStyle;

use config::default_options;
use post::post_process;
use rewrite::rewrite_ast;

/// Comrak-based rendering pipeline with Syntect highlighting.
pub struct ComrakRenderService {
    options: comrak::Options<'static>,
    syntax_set: SyntaxSet,
    class_style: ClassStyle,
    slug_style: SlugStyle,
}

impl ComrakRenderService {
    /// Highlighting emits `syntax-` prefixed CSS classes.
    pub fn new(slug_style: SlugStyle) -> Self {
        Self {
            options: default_options(),
            syntax_set: SyntaxSet::load_defaults_newlines(),
            class_style: ClassStyle::SpacedPrefixed { prefix: "syntax-" },
            slug_style,
        }
    }
}

static RENDER_SERVICE: Lazy<Arc<ComrakRenderService>> =
    Lazy::new(|| Arc::new(ComrakRenderService::default()));

/// Shared renderer with the default slug style, initialised on first use.
pub fn render_service() -> Arc<ComrakRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for ComrakRenderService {
    fn default() -> Self {
        Self::new(SlugStyle::default())
    }
}

impl RenderService for ComrakRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let started = Instant::now();
        let arena = Arena::new();
        let root = parse_document(&arena, &request.markdown, &self.options);

        let outcome = rewrite_ast(root, &self.syntax_set, &self.class_style, self.slug_style)?;
        let rendered_html = render_html_stage(root, &self.options)?;
        let processed = post_process(&rendered_html, &outcome.headings)?;

        let html = match request.mode {
            RenderMode::Block => processed,
            RenderMode::Inline => unwrap_single_paragraph(&processed),
        };

        let mode = match request.mode {
            RenderMode::Block => "block",
            RenderMode::Inline => "inline",
        };
        counter!("chongyan_render_total", "mode" => mode).increment(1);
        histogram!("chongyan_render_ms").record(started.elapsed().as_secs_f64() * 1000.0);
        debug!(
            target = "chongyan::render",
            mode,
            headings = outcome.headings.len(),
            contains_code = outcome.contains_code,
            contains_mermaid = outcome.contains_mermaid,
            "rendered markdown"
        );

        Ok(RenderOutput {
            html,
            headings: outcome.headings,
            contains_code: outcome.contains_code,
            contains_mermaid: outcome.contains_mermaid,
        })
    }
}

fn render_html_stage<'a>(
    root: &'a AstNode<'a>,
    options: &comrak::Options<'static>,
) -> Result<String, RenderError> {
    let mut html = String::new();
    format_html(root, options, &mut html).map_err(|err| RenderError::Markdown {
        message: err.to_string(),
    })?;
    Ok(html)
}

/// `<p>text</p>` → `text`; anything else is returned unchanged.
fn unwrap_single_paragraph(html: &str) -> String {
    let trimmed = html.trim_end();
    if let Some(inner) = trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
        && !inner.contains("<p>")
        && !inner.contains("</p>")
    {
        return inner.to_string();
    }
    trimmed.to_string()
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
