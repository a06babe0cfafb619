//! Markdown rendering service.
//!
//! The pipeline is pure: it accepts markdown, produces deterministic HTML and
//! reports the headings it anchored along with code and diagram flags.

mod service;
mod types;

pub use service::{ComrakRenderService, render_service};
pub use types::{
    RenderError, RenderMode, RenderOutput, RenderRequest, RenderService, RenderedHeading,
};

/// Render `content` as a block document, or inline when `block` is false.
pub fn markdownify(content: &str, block: bool) -> Result<String, RenderError> {
    let request = if block {
        RenderRequest::block(content)
    } else {
        RenderRequest::inline(content)
    };
    render_service().render(&request).map(|output| output.html)
}
