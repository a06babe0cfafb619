use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use syntect::html::ClassStyle;
use syntect::parsing::SyntaxSet;

use crate::application::render::types::{RenderError, RenderedHeading};
use crate::domain::slug::{AnchorSlugger, SlugStyle};

use super::{escape_html, highlight, mermaid};

#[derive(Debug, Default)]
pub(crate) struct RewriteOutcome {
    pub(crate) contains_code: bool,
    pub(crate) contains_mermaid: bool,
    pub(crate) headings: Vec<RenderedHeading>,
    mermaid_counter: usize,
}

pub(crate) fn rewrite_ast<'a>(
    root: &'a AstNode<'a>,
    syntax_set: &SyntaxSet,
    class_style: &ClassStyle,
    slug_style: SlugStyle,
) -> Result<RewriteOutcome, RenderError> {
    let mut walker = RewriteWalker::new(syntax_set, class_style, slug_style);
    walker.visit_nodes(root)?;
    Ok(walker.outcome)
}

struct RewriteWalker<'a> {
    syntax_set: &'a SyntaxSet,
    class_style: &'a ClassStyle,
    outcome: RewriteOutcome,
    slugger: AnchorSlugger,
}

impl<'a> RewriteWalker<'a> {
    fn new(syntax_set: &'a SyntaxSet, class_style: &'a ClassStyle, slug_style: SlugStyle) -> Self {
        Self {
            syntax_set,
            class_style,
            outcome: RewriteOutcome::default(),
            slugger: AnchorSlugger::new(slug_style),
        }
    }

    fn visit_nodes(&mut self, node: &AstNode<'_>) -> Result<(), RenderError> {
        if is_image(node) {
            process_image_node(node);
            return Ok(());
        }

        if let Some(level) = heading_level(node) {
            let text = collect_inline_text(node);
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let slug = self.slugger.anchor_for(&normalized);
            self.outcome.headings.push(RenderedHeading {
                level,
                slug,
                text: normalized,
            });
        }

        if let Some((info, literal)) = extract_code_block(node) {
            let language = info.split_whitespace().next();

            let html = if mermaid::is_mermaid(language) {
                let position = self.outcome.mermaid_counter;
                self.outcome.mermaid_counter += 1;
                self.outcome.contains_mermaid = true;
                mermaid::mermaid_container(position, &literal)
            } else {
                self.outcome.contains_code = true;
                highlight::render_code_block(language, &literal, self.syntax_set, self.class_style)?
            };

            let mut data = node.data.borrow_mut();
            data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
                block_type: 0,
                literal: html,
            });
            return Ok(());
        }

        let mut child = node.first_child();
        while let Some(next) = child {
            child = next.next_sibling();
            self.visit_nodes(next)?;
        }

        Ok(())
    }
}

fn process_image_node(node: &AstNode<'_>) {
    let (src, title) = {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Image(link) => (link.url.clone(), link.title.clone()),
            _ => return,
        }
    };

    let alt_raw = collect_inline_text(node);
    let alt = alt_raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let html = build_image_html(&src, &alt, (!title.is_empty()).then_some(title.as_str()));

    {
        let mut data = node.data.borrow_mut();
        data.value = NodeValue::HtmlInline(html);
    }

    while let Some(child) = node.first_child() {
        child.detach();
    }
}

fn build_image_html(src: &str, alt: &str, title: Option<&str>) -> String {
    let mut html = String::with_capacity(src.len() + alt.len() * 2 + 128);
    html.push_str("<figure class=\"markdown-image\"><img src=\"");
    html.push_str(&escape_html(src));
    html.push_str("\" alt=\"");
    html.push_str(&escape_html(alt));
    html.push('"');

    if let Some(title) = title {
        html.push_str(" title=\"");
        html.push_str(&escape_html(title));
        html.push('"');
    }

    html.push_str(" loading=\"lazy\" class=\"responsive-image\" />");
    if !alt.is_empty() {
        html.push_str("<figcaption>");
        html.push_str(&escape_html(alt));
        html.push_str("</figcaption>");
    }
    html.push_str("</figure>");
    html
}

fn is_image(node: &AstNode<'_>) -> bool {
    matches!(node.data.borrow().value, NodeValue::Image(_))
}

fn collect_inline_text(node: &AstNode<'_>) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(next) = child {
        walk(next, &mut text);
        child = next.next_sibling();
    }
    text
}

fn extract_code_block(node: &AstNode<'_>) -> Option<(String, String)> {
    let data = node.data.borrow();
    if let NodeValue::CodeBlock(block) = &data.value {
        Some((block.info.trim().to_string(), block.literal.clone()))
    } else {
        None
    }
}

fn heading_level(node: &AstNode<'_>) -> Option<u8> {
    let data = node.data.borrow();
    if let NodeValue::Heading(heading) = &data.value {
        Some(heading.level)
    } else {
        None
    }
}
