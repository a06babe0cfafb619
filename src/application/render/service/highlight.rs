use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::application::render::types::RenderError;

use super::escape_html;

pub(crate) const DEFAULT_LANGUAGE: &str = "text";

const COPY_ICON: &str = concat!(
    "<svg width=\"16\" height=\"16\" viewBox=\"0 0 24 24\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\">",
    "<rect x=\"9\" y=\"9\" width=\"13\" height=\"13\" rx=\"2\" ry=\"2\"></rect>",
    "<path d=\"M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1\"></path>",
    "</svg>"
);

/// Highlighted code block with the language header and copy button.
pub(crate) fn render_code_block(
    language: Option<&str>,
    code: &str,
    syntax_set: &SyntaxSet,
    class_style: &ClassStyle,
) -> Result<String, RenderError> {
    let lang_token = language
        .filter(|lang| !lang.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);
    let highlighted = highlight_code(lang_token, code, syntax_set, class_style)?;
    let lang = escape_html(lang_token);

    Ok(format!(
        "<div class=\"code-block-wrapper\">\n\
         <div class=\"code-block-header\">\n\
         <span class=\"code-language\">{lang}</span>\n\
         <button class=\"copy-code-btn\" onclick=\"copyCode(this)\" title=\"复制代码\">{COPY_ICON}</button>\n\
         </div>\n\
         <pre><code class=\"language-{lang}\">{highlighted}</code></pre>\n\
         </div>\n"
    ))
}

fn highlight_code(
    lang_token: &str,
    code: &str,
    syntax_set: &SyntaxSet,
    class_style: &ClassStyle,
) -> Result<String, RenderError> {
    let syntax =
        find_syntax(syntax_set, lang_token).unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    let mut code_with_newline = code.to_string();
    if !code_with_newline.ends_with('\n') {
        code_with_newline.push('\n');
    }

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, *class_style);

    for line in LinesWithEndings::from(code_with_newline.as_str()) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|err| RenderError::Highlighting {
                language: lang_token.to_string(),
                message: err.to_string(),
            })?;
    }

    Ok(generator.finalize())
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, token: &str) -> Option<&'a SyntaxReference> {
    let lowercase = token.to_ascii_lowercase();
    syntax_set
        .find_syntax_by_token(&lowercase)
        .or_else(|| syntax_set.find_syntax_by_name(&lowercase))
        .or_else(|| syntax_set.find_syntax_by_extension(&lowercase))
}
