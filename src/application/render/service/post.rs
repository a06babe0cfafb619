use std::{cell::RefCell, rc::Rc};

use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::application::render::types::{RenderError, RenderedHeading};

use super::escape_html;

const SOURCEPOS_ATTR: &str = "data-sourcepos";

/// Decorate formatted HTML: heading anchors, table wrappers, external link
/// targets and blockquote classes.
///
/// Only headings carrying `data-sourcepos` came from markdown and line up with
/// `headings`; raw HTML headings are left as written.
pub(crate) fn post_process(html: &str, headings: &[RenderedHeading]) -> Result<String, RenderError> {
    let headings_shared = Rc::new(headings.to_vec());
    let index = Rc::new(RefCell::new(0usize));
    let error_slot = Rc::new(RefCell::new(None));

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("h1, h2, h3, h4, h5, h6", {
                    let headings_shared = Rc::clone(&headings_shared);
                    let index = Rc::clone(&index);
                    let error_slot = Rc::clone(&error_slot);
                    move |el| {
                        if !el.has_attribute(SOURCEPOS_ATTR) {
                            return Ok(());
                        }
                        let mut idx = index.borrow_mut();
                        let Some(info) = headings_shared.get(*idx) else {
                            *error_slot.borrow_mut() = Some(RenderError::Document {
                                message: "unexpected extra heading".to_string(),
                            });
                            return Ok(());
                        };
                        *idx += 1;

                        let anchor = escape_html(&info.slug);
                        el.set_attribute("id", &info.slug)?;
                        el.prepend(
                            &format!("<a href=\"#{anchor}\" class=\"anchor-link\">"),
                            ContentType::Html,
                        );
                        el.append("</a>", ContentType::Html);
                        Ok(())
                    }
                }),
                element!("table", |el| {
                    el.set_attribute("class", "markdown-table")?;
                    el.before("<div class=\"table-wrapper\">", ContentType::Html);
                    el.after("</div>", ContentType::Html);
                    Ok(())
                }),
                element!("a[href]", |el| {
                    if let Some(href) = el.get_attribute("href")
                        && is_external_http_url(&href)
                    {
                        el.set_attribute("target", "_blank")?;
                        el.set_attribute("rel", "noopener noreferrer")?;
                    }
                    Ok(())
                }),
                element!("blockquote", |el| {
                    el.set_attribute("class", "markdown-blockquote")?;
                    Ok(())
                }),
                element!("[data-sourcepos]", |el| {
                    el.remove_attribute(SOURCEPOS_ATTR);
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::Document {
        message: err.to_string(),
    })?;

    if let Some(err) = error_slot.borrow_mut().take() {
        return Err(err);
    }

    Ok(rewritten)
}

fn is_external_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, slug: &str) -> RenderedHeading {
        RenderedHeading {
            level,
            slug: slug.to_string(),
            text: slug.to_string(),
        }
    }

    #[test]
    fn headings_receive_ids_and_anchor_links() {
        let html = post_process(
            "<h2 data-sourcepos=\"1:1-1:8\">Intro</h2>\n",
            &[heading(2, "intro")],
        )
        .expect("post");
        assert_eq!(
            html,
            "<h2 id=\"intro\"><a href=\"#intro\" class=\"anchor-link\">Intro</a></h2>\n"
        );
    }

    #[test]
    fn raw_headings_are_left_as_written() {
        let html = post_process(
            "<h2>Raw</h2>\n<h2 data-sourcepos=\"3:1-3:11\">Markdown</h2>\n<p>a <h3>x</h3></p>",
            &[heading(2, "markdown")],
        )
        .expect("post");
        assert_eq!(
            html,
            "<h2>Raw</h2>\n<h2 id=\"markdown\"><a href=\"#markdown\" class=\"anchor-link\">Markdown</a></h2>\n<p>a <h3>x</h3></p>"
        );
    }

    #[test]
    fn source_positions_are_stripped() {
        let html = post_process("<p data-sourcepos=\"1:1-1:3\">abc</p>", &[]).expect("post");
        assert_eq!(html, "<p>abc</p>");
    }

    #[test]
    fn surplus_markdown_headings_are_an_error() {
        let result = post_process(
            "<h1 data-sourcepos=\"1:1-1:3\">a</h1><h1 data-sourcepos=\"2:1-2:3\">b</h1>",
            &[heading(1, "a")],
        );
        assert!(matches!(result, Err(RenderError::Document { .. })));
    }

    #[test]
    fn tables_are_wrapped_and_classed() {
        let html = post_process("<table><tr><td>1</td></tr></table>", &[]).expect("post");
        assert_eq!(
            html,
            "<div class=\"table-wrapper\"><table class=\"markdown-table\"><tr><td>1</td></tr></table></div>"
        );
    }

    #[test]
    fn only_http_links_open_in_new_tabs() {
        let html = post_process(
            "<a href=\"https://example.com\">x</a><a href=\"/about\">y</a><a href=\"#top\">z</a>",
            &[],
        )
        .expect("post");
        assert!(html.contains(
            "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">x</a>"
        ));
        assert!(html.contains("<a href=\"/about\">y</a>"));
        assert!(html.contains("<a href=\"#top\">z</a>"));
    }

    #[test]
    fn blockquotes_get_their_class() {
        let html = post_process("<blockquote>\n<p>q</p>\n</blockquote>", &[]).expect("post");
        assert!(html.starts_with("<blockquote class=\"markdown-blockquote\">"));
    }
}
