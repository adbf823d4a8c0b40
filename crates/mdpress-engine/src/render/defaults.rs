//! Default rules for the content-bearing token kinds.
//!
//! Purely structural kinds (paragraphs, lists, tables) have no rule here;
//! the renderer's structural fallback prints them.

use super::{RenderOptions, Renderer, escape_fragment};
use crate::tokens::{Token, TokenKind};

pub(super) fn install(renderer: &mut Renderer) {
    renderer.register(TokenKind::Text, text);
    renderer.register(TokenKind::CodeInline, code_inline);
    renderer.register(TokenKind::Fence, fence);
    renderer.register(TokenKind::IndentedCode, indented_code);
    renderer.register(TokenKind::HtmlBlock, html_passthrough);
    renderer.register(TokenKind::HtmlInline, html_passthrough);
    renderer.register(TokenKind::SoftBreak, soft_break);
    renderer.register(TokenKind::HardBreak, hard_break);
}

fn text(_renderer: &Renderer, tokens: &[Token], idx: usize, _options: &RenderOptions) -> String {
    escape_fragment(&tokens[idx].content)
}

/// Plain `<code>` wrapping. Sites that mark long spans displace this rule.
fn code_inline(
    _renderer: &Renderer,
    tokens: &[Token],
    idx: usize,
    _options: &RenderOptions,
) -> String {
    format!("<code>{}</code>", escape_fragment(&tokens[idx].content))
}

fn fence(_renderer: &Renderer, tokens: &[Token], idx: usize, options: &RenderOptions) -> String {
    let token = &tokens[idx];
    // First word of the info string names the language; the rest is for
    // other tools (`rust,no_run`).
    let lang = token.info.split([' ', '\t', ',']).next().unwrap_or_default();
    if lang.is_empty() {
        format!(
            "<pre><code>{}</code></pre>\n",
            escape_fragment(&token.content)
        )
    } else {
        format!(
            "<pre><code class=\"{}{}\">{}</code></pre>\n",
            escape_fragment(&options.lang_prefix),
            escape_fragment(lang),
            escape_fragment(&token.content)
        )
    }
}

fn indented_code(
    _renderer: &Renderer,
    tokens: &[Token],
    idx: usize,
    _options: &RenderOptions,
) -> String {
    format!(
        "<pre><code>{}</code></pre>\n",
        escape_fragment(&tokens[idx].content)
    )
}

fn html_passthrough(
    _renderer: &Renderer,
    tokens: &[Token],
    idx: usize,
    _options: &RenderOptions,
) -> String {
    tokens[idx].content.clone()
}

fn soft_break(
    _renderer: &Renderer,
    _tokens: &[Token],
    _idx: usize,
    _options: &RenderOptions,
) -> String {
    "\n".to_string()
}

fn hard_break(
    _renderer: &Renderer,
    _tokens: &[Token],
    _idx: usize,
    _options: &RenderOptions,
) -> String {
    "<br />\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::super::{RenderOptions, Renderer, render_html};
    use pretty_assertions::assert_eq;

    #[test]
    fn default_inline_code_has_no_class() {
        let renderer = Renderer::new();
        let html = render_html("`cargo`", &renderer, &RenderOptions::default());
        assert_eq!(html, "<p><code>cargo</code></p>\n");
    }

    #[test]
    fn fence_gets_a_prefixed_language_class() {
        let renderer = Renderer::new();
        let html = render_html(
            "```rust\nfn main() {}\n```\n",
            &renderer,
            &RenderOptions::default(),
        );
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn fence_language_is_the_first_info_word() {
        let renderer = Renderer::new();
        let html = render_html(
            "```rust,no_run\nlet x = 1;\n```\n",
            &renderer,
            &RenderOptions::default(),
        );
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n"
        );
    }

    #[test]
    fn bare_fence_has_no_class() {
        let renderer = Renderer::new();
        let html = render_html("```\nplain\n```\n", &renderer, &RenderOptions::default());
        assert_eq!(html, "<pre><code>plain\n</code></pre>\n");
    }

    #[test]
    fn fence_body_is_escaped() {
        let renderer = Renderer::new();
        let html = render_html(
            "```html\n<b>&amp;</b>\n```\n",
            &renderer,
            &RenderOptions::default(),
        );
        assert_eq!(
            html,
            "<pre><code class=\"language-html\">&lt;b&gt;&amp;amp;&lt;/b&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn lang_prefix_is_configurable() {
        let renderer = Renderer::new();
        let options = RenderOptions {
            lang_prefix: "lang-".to_string(),
            ..RenderOptions::default()
        };
        let html = render_html("```toml\nkey = 1\n```\n", &renderer, &options);
        assert_eq!(
            html,
            "<pre><code class=\"lang-toml\">key = 1\n</code></pre>\n"
        );
    }

    #[test]
    fn inline_html_passes_through_raw() {
        let renderer = Renderer::new();
        let html = render_html(
            "before <kbd>Ctrl</kbd> after",
            &renderer,
            &RenderOptions::default(),
        );
        assert_eq!(html, "<p>before <kbd>Ctrl</kbd> after</p>\n");
    }

    #[test]
    fn hard_break_renders_self_closing() {
        let renderer = Renderer::new();
        let html = render_html("a  \nb", &renderer, &RenderOptions::default());
        assert_eq!(html, "<p>a<br />\nb</p>\n");
    }

    #[test]
    fn text_content_is_escaped() {
        let renderer = Renderer::new();
        let html = render_html("AT&T <3", &renderer, &RenderOptions::default());
        assert_eq!(html, "<p>AT&amp;T &lt;3</p>\n");
    }
}
