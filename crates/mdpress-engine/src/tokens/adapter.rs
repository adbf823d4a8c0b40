//! Event-to-token adaptation.
//!
//! Tokenization itself belongs to pulldown-cmark; this module only reshapes
//! its event stream into the flat [`Token`] sequence the renderer indexes
//! into. Events for constructs the engine does not enable are ignored.

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use super::{Nesting, Token, TokenKind};

/// Parser extensions the engine enables: the constructs a documentation page
/// actually uses, plus YAML frontmatter so it can be stripped from the body.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Tokenize one markdown document into a flat token sequence.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut adapter = TokenAdapter::new();
    for event in Parser::new_ext(source, parser_options()) {
        adapter.process_event(event);
    }
    adapter.finalize()
}

/// Pending fenced or indented code block.
struct CodeCapture {
    /// Fence info line; `None` for indented code.
    info: Option<String>,
    content: String,
}

impl CodeCapture {
    fn into_token(self) -> Token {
        match self.info {
            Some(info) => {
                let mut token = Token::text_leaf(TokenKind::Fence, self.content);
                token.info = info;
                token
            }
            None => Token::text_leaf(TokenKind::IndentedCode, self.content),
        }
    }
}

/// Pending image whose subtree is being flattened into alt text.
struct ImageCapture {
    url: String,
    title: String,
    alt: String,
}

impl ImageCapture {
    fn into_token(self) -> Token {
        let mut token = Token::leaf(TokenKind::Image, "img")
            .with_attr("src", self.url)
            .with_attr("alt", self.alt);
        if !self.title.is_empty() {
            token = token.with_attr("title", self.title);
        }
        token
    }
}

/// Accumulates tokens while tracking the little state pulldown-cmark's event
/// stream requires: code block bodies arrive as bare text events, image alt
/// text arrives as a nested subtree, and table cells do not know on their own
/// whether they sit in the header row.
struct TokenAdapter {
    tokens: Vec<Token>,
    code: Option<CodeCapture>,
    image: Option<ImageCapture>,
    image_depth: usize,
    in_metadata: bool,
    in_table_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TokenAdapter {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            code: None,
            image: None,
            image_depth: 0,
            in_metadata: false,
            in_table_head: false,
            alignments: Vec::new(),
            cell_index: 0,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        // An open image redirects everything into alt-text capture until its
        // matching end event.
        if self.image_depth > 0 {
            self.capture_image_event(event);
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if self.in_metadata {
                    // Frontmatter never reaches the page body.
                } else if let Some(capture) = self.code.as_mut() {
                    capture.content.push_str(&text);
                } else {
                    self.push_text(text.to_string());
                }
            }
            Event::Code(code) => self
                .tokens
                .push(Token::text_leaf(TokenKind::CodeInline, code.to_string())),
            Event::Html(html) => self.push_html_block(html.to_string()),
            Event::InlineHtml(html) => self
                .tokens
                .push(Token::text_leaf(TokenKind::HtmlInline, html.to_string())),
            Event::SoftBreak => self.tokens.push(Token::leaf(TokenKind::SoftBreak, "")),
            Event::HardBreak => self.tokens.push(Token::leaf(TokenKind::HardBreak, "br")),
            Event::Rule => self.tokens.push(Token::leaf(TokenKind::ThematicBreak, "hr")),
            // Events for extensions this engine does not enable (math,
            // footnotes, task lists, definition lists).
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.tokens.push(Token::open(TokenKind::Paragraph, "p")),
            Tag::Heading { level, .. } => self
                .tokens
                .push(Token::open(TokenKind::Heading, heading_tag(level))),
            Tag::BlockQuote(_) => self
                .tokens
                .push(Token::open(TokenKind::Blockquote, "blockquote")),
            Tag::CodeBlock(kind) => {
                self.code = Some(CodeCapture {
                    info: match kind {
                        CodeBlockKind::Fenced(info) => Some(info.to_string()),
                        CodeBlockKind::Indented => None,
                    },
                    content: String::new(),
                });
            }
            // Raw HTML is carried by the Html events inside the block.
            Tag::HtmlBlock => {}
            Tag::List(Some(start)) => {
                let mut token = Token::open(TokenKind::OrderedList, "ol");
                if start != 1 {
                    token = token.with_attr("start", start.to_string());
                }
                self.tokens.push(token);
            }
            Tag::List(None) => self.tokens.push(Token::open(TokenKind::BulletList, "ul")),
            Tag::Item => self.tokens.push(Token::open(TokenKind::Item, "li")),
            Tag::Table(alignments) => {
                self.alignments = alignments;
                self.tokens.push(Token::open(TokenKind::Table, "table"));
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.tokens.push(Token::open(TokenKind::TableHead, "thead"));
                self.tokens.push(Token::open(TokenKind::TableRow, "tr"));
            }
            Tag::TableRow => {
                self.cell_index = 0;
                self.tokens.push(Token::open(TokenKind::TableRow, "tr"));
            }
            Tag::TableCell => {
                let (kind, tag) = self.cell_kind();
                let mut token = Token::open(kind, tag);
                if let Some(style) = alignment_style(self.alignments.get(self.cell_index)) {
                    token = token.with_attr("style", style);
                }
                self.cell_index += 1;
                self.tokens.push(token);
            }
            Tag::Emphasis => self.tokens.push(Token::open(TokenKind::Emphasis, "em")),
            Tag::Strong => self.tokens.push(Token::open(TokenKind::Strong, "strong")),
            Tag::Strikethrough => self
                .tokens
                .push(Token::open(TokenKind::Strikethrough, "del")),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut token =
                    Token::open(TokenKind::Link, "a").with_attr("href", dest_url.to_string());
                if !title.is_empty() {
                    token = token.with_attr("title", title.to_string());
                }
                self.tokens.push(token);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(ImageCapture {
                    url: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
                self.image_depth = 1;
            }
            Tag::MetadataBlock(_) => self.in_metadata = true,
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.tokens.push(Token::close(TokenKind::Paragraph, "p")),
            TagEnd::Heading(level) => self
                .tokens
                .push(Token::close(TokenKind::Heading, heading_tag(level))),
            TagEnd::BlockQuote(_) => self
                .tokens
                .push(Token::close(TokenKind::Blockquote, "blockquote")),
            TagEnd::CodeBlock => {
                if let Some(capture) = self.code.take() {
                    self.tokens.push(capture.into_token());
                }
            }
            TagEnd::HtmlBlock => {}
            TagEnd::List(true) => self.tokens.push(Token::close(TokenKind::OrderedList, "ol")),
            TagEnd::List(false) => self.tokens.push(Token::close(TokenKind::BulletList, "ul")),
            TagEnd::Item => self.tokens.push(Token::close(TokenKind::Item, "li")),
            TagEnd::Table => {
                self.tokens.push(Token::close(TokenKind::TableBody, "tbody"));
                self.tokens.push(Token::close(TokenKind::Table, "table"));
            }
            TagEnd::TableHead => {
                // The header row also ends the <thead>; body rows follow
                // inside an unconditional <tbody>.
                self.in_table_head = false;
                self.tokens.push(Token::close(TokenKind::TableRow, "tr"));
                self.tokens.push(Token::close(TokenKind::TableHead, "thead"));
                self.tokens.push(Token::open(TokenKind::TableBody, "tbody"));
            }
            TagEnd::TableRow => self.tokens.push(Token::close(TokenKind::TableRow, "tr")),
            TagEnd::TableCell => {
                let (kind, tag) = self.cell_kind();
                self.tokens.push(Token::close(kind, tag));
            }
            TagEnd::Emphasis => self.tokens.push(Token::close(TokenKind::Emphasis, "em")),
            TagEnd::Strong => self.tokens.push(Token::close(TokenKind::Strong, "strong")),
            TagEnd::Strikethrough => self
                .tokens
                .push(Token::close(TokenKind::Strikethrough, "del")),
            TagEnd::Link => self.tokens.push(Token::close(TokenKind::Link, "a")),
            TagEnd::MetadataBlock(_) => self.in_metadata = false,
            _ => {}
        }
    }

    fn capture_image_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Image { .. }) => self.image_depth += 1,
            Event::End(TagEnd::Image) => {
                self.image_depth -= 1;
                if self.image_depth == 0
                    && let Some(capture) = self.image.take()
                {
                    self.tokens.push(capture.into_token());
                }
            }
            Event::Text(text) | Event::Code(text) | Event::InlineHtml(text) => {
                if let Some(capture) = self.image.as_mut() {
                    capture.alt.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(capture) = self.image.as_mut() {
                    capture.alt.push(' ');
                }
            }
            // Structure inside alt text contributes only its text.
            _ => {}
        }
    }

    fn cell_kind(&self) -> (TokenKind, &'static str) {
        if self.in_table_head {
            (TokenKind::TableHeader, "th")
        } else {
            (TokenKind::TableCell, "td")
        }
    }

    /// Consecutive text events merge into one token.
    fn push_text(&mut self, text: String) {
        if let Some(last) = self.tokens.last_mut()
            && last.kind == TokenKind::Text
            && last.nesting == Nesting::Leaf
        {
            last.content.push_str(&text);
            return;
        }
        self.tokens.push(Token::text_leaf(TokenKind::Text, text));
    }

    /// Raw block HTML lines merge the same way.
    fn push_html_block(&mut self, html: String) {
        if let Some(last) = self.tokens.last_mut()
            && last.kind == TokenKind::HtmlBlock
        {
            last.content.push_str(&html);
            return;
        }
        self.tokens.push(Token::text_leaf(TokenKind::HtmlBlock, html));
    }

    fn finalize(mut self) -> Vec<Token> {
        // A dangling capture means an unbalanced event stream; flush rather
        // than drop the content.
        if let Some(capture) = self.code.take() {
            self.tokens.push(capture.into_token());
        }
        if let Some(capture) = self.image.take() {
            self.tokens.push(capture.into_token());
        }
        self.tokens
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn alignment_style(alignment: Option<&Alignment>) -> Option<&'static str> {
    match alignment {
        Some(Alignment::Left) => Some("text-align: left"),
        Some(Alignment::Center) => Some("text-align: center"),
        Some(Alignment::Right) => Some("text-align: right"),
        Some(Alignment::None) | None => None,
    }
}
