//! Length-aware inline code rendering.
//!
//! Long inline spans (full commands, configuration keys, deep paths) get a
//! `long` class so the site stylesheet can let them wrap instead of
//! stretching the line. Short spans keep the bare `<code>` element.

use super::{RenderOptions, Renderer, escape_fragment};
use crate::tokens::{Token, TokenKind};

/// Inline code with at least this many characters counts as long.
pub const LONG_CODE_THRESHOLD: usize = 20;

/// Replace the plain inline-code rule with the length-aware one.
///
/// The displaced default is dropped: every span renders through the same
/// length decision, so there is no fallback condition to keep it for.
pub fn install(renderer: &mut Renderer) {
    let _previous = renderer.register(TokenKind::CodeInline, render_code_inline);
}

fn render_code_inline(
    _renderer: &Renderer,
    tokens: &[Token],
    idx: usize,
    options: &RenderOptions,
) -> String {
    let content = &tokens[idx].content;
    let escaped = escape_fragment(content);
    // Length is measured on the raw content in characters, not on the
    // escaped text, so entities never push a short span over the line.
    if content.chars().count() >= options.long_code_threshold {
        format!("<code class=\"long\">{escaped}</code>")
    } else {
        format!("<code>{escaped}</code>")
    }
}
