//! Token-to-HTML rendering.
//!
//! A [`Renderer`] owns a table mapping token kinds to rule functions. Kinds
//! without a registered rule fall back to [`Renderer::render_token`], which
//! prints the token's tag and attributes structurally. Site customizations
//! swap individual rules via [`Renderer::register`] at startup; rendering
//! itself takes the renderer by shared reference and mutates nothing.

use std::collections::HashMap;

use pulldown_cmark_escape::escape_html;

use crate::tokens::{Nesting, Token, TokenKind, tokenize};

mod defaults;
pub mod inline_code;

/// A rendering rule for one token kind.
///
/// Rules receive the whole token sequence plus the index of the token they
/// are rendering, so lookahead is possible, and a reference to the renderer
/// so they can delegate to [`Renderer::render_token`] or another rule.
pub type RenderRule = fn(&Renderer, &[Token], usize, &RenderOptions) -> String;

/// Knobs a site configuration can turn without swapping rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Inline code with at least this many characters is marked `long`.
    pub long_code_threshold: usize,
    /// Class prefix for fenced code languages.
    pub lang_prefix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            long_code_threshold: inline_code::LONG_CODE_THRESHOLD,
            lang_prefix: "language-".to_string(),
        }
    }
}

/// Rule registry plus the structural fallback.
pub struct Renderer {
    rules: HashMap<TokenKind, RenderRule>,
}

impl Default for Renderer {
    fn default() -> Self {
        let mut renderer = Self {
            rules: HashMap::new(),
        };
        defaults::install(&mut renderer);
        renderer
    }
}

impl Renderer {
    /// Renderer with the default rule set installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` for `kind`, returning the rule it displaced so the
    /// caller can delegate to it or restore it later.
    pub fn register(&mut self, kind: TokenKind, rule: RenderRule) -> Option<RenderRule> {
        self.rules.insert(kind, rule)
    }

    /// Currently registered rule for `kind`.
    pub fn rule(&self, kind: TokenKind) -> Option<RenderRule> {
        self.rules.get(&kind).copied()
    }

    /// Render a token sequence to an HTML fragment.
    pub fn render(&self, tokens: &[Token], options: &RenderOptions) -> String {
        let mut html = String::new();
        for idx in 0..tokens.len() {
            match self.rule(tokens[idx].kind) {
                Some(rule) => html.push_str(&rule(self, tokens, idx, options)),
                None => html.push_str(&self.render_token(tokens, idx)),
            }
        }
        html
    }

    /// Structural fallback: print the token's own tag.
    ///
    /// Opening and self-closing tags carry their attributes with escaped
    /// values. Block-level tags are followed by a newline, except an opening
    /// tag whose content starts inline (`<li>text`) or whose element is
    /// empty (`<tbody></tbody>`). A leaf without a tag renders as escaped
    /// text so content is never silently dropped.
    pub fn render_token(&self, tokens: &[Token], idx: usize) -> String {
        let token = &tokens[idx];
        if token.nesting == Nesting::Leaf && token.tag.is_empty() {
            return escape_fragment(&token.content);
        }

        let mut html = String::new();
        html.push('<');
        if token.nesting == Nesting::Close {
            html.push('/');
        }
        html.push_str(token.tag);
        if token.nesting != Nesting::Close {
            for (name, value) in &token.attrs {
                html.push(' ');
                html.push_str(name);
                html.push_str("=\"");
                html.push_str(&escape_fragment(value));
                html.push('"');
            }
        }
        if token.nesting == Nesting::Leaf {
            html.push_str(" /");
        }
        html.push('>');
        if needs_newline(tokens, idx) {
            html.push('\n');
        }
        html
    }
}

/// One-call pipeline: tokenize a page and render it with the given renderer.
pub fn render_html(source: &str, renderer: &Renderer, options: &RenderOptions) -> String {
    renderer.render(&tokenize(source), options)
}

fn needs_newline(tokens: &[Token], idx: usize) -> bool {
    let token = &tokens[idx];
    if !token.kind.is_block() {
        return false;
    }
    if token.nesting == Nesting::Open
        && let Some(next) = tokens.get(idx + 1)
    {
        if !next.kind.is_block() {
            return false;
        }
        if next.nesting == Nesting::Close && next.kind == token.kind {
            return false;
        }
    }
    true
}

/// Escape `&`, `<`, `>` and `"` for element content and attribute values.
fn escape_fragment(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = escape_html(&mut escaped, text);
    escaped
}
