//! Flat token stream produced from pulldown-cmark events.
//!
//! The renderer consumes tokens by index, so the stream is deliberately flat:
//! container constructs appear as paired `Open`/`Close` tokens, content
//! constructs as single `Leaf` tokens carrying their raw text.

mod adapter;

pub use adapter::tokenize;

/// The construct a token belongs to. Doubles as the rule name a renderer
/// looks up when deciding how to emit the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Paragraph,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    Item,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableHeader,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    CodeInline,
    Fence,
    IndentedCode,
    HtmlBlock,
    HtmlInline,
    SoftBreak,
    HardBreak,
    ThematicBreak,
    Text,
}

impl TokenKind {
    /// Whether tokens of this kind take part in block layout. Structural
    /// rendering places newlines after block tags but never inside a run of
    /// inline content.
    pub fn is_block(self) -> bool {
        match self {
            TokenKind::Paragraph
            | TokenKind::Heading
            | TokenKind::Blockquote
            | TokenKind::BulletList
            | TokenKind::OrderedList
            | TokenKind::Item
            | TokenKind::Table
            | TokenKind::TableHead
            | TokenKind::TableBody
            | TokenKind::TableRow
            | TokenKind::TableHeader
            | TokenKind::TableCell
            | TokenKind::Fence
            | TokenKind::IndentedCode
            | TokenKind::HtmlBlock
            | TokenKind::ThematicBreak => true,
            TokenKind::Emphasis
            | TokenKind::Strong
            | TokenKind::Strikethrough
            | TokenKind::Link
            | TokenKind::Image
            | TokenKind::CodeInline
            | TokenKind::HtmlInline
            | TokenKind::SoftBreak
            | TokenKind::HardBreak
            | TokenKind::Text => false,
        }
    }
}

/// Whether a token opens a container, closes one, or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
    Leaf,
}

/// One parsed markdown construct.
///
/// `content` is the raw text of content-bearing leaves (text runs, inline
/// code, fenced code bodies); it is never pre-escaped. `info` carries the
/// fence info string. `attrs` carries HTML attributes collected during
/// tokenization (`href`, `title`, `src`, `alt`, `start`, `style`).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub nesting: Nesting,
    /// HTML tag for structural rendering; empty for tag-less leaves.
    pub tag: &'static str,
    pub content: String,
    pub info: String,
    pub attrs: Vec<(String, String)>,
}

impl Token {
    pub fn open(kind: TokenKind, tag: &'static str) -> Self {
        Self::new(kind, Nesting::Open, tag)
    }

    pub fn close(kind: TokenKind, tag: &'static str) -> Self {
        Self::new(kind, Nesting::Close, tag)
    }

    /// A stand-alone token with no content, e.g. a thematic break.
    pub fn leaf(kind: TokenKind, tag: &'static str) -> Self {
        Self::new(kind, Nesting::Leaf, tag)
    }

    /// A stand-alone token carrying raw text, e.g. a text run or inline code.
    pub fn text_leaf(kind: TokenKind, content: impl Into<String>) -> Self {
        let mut token = Self::new(kind, Nesting::Leaf, "");
        token.content = content.into();
        token
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    fn new(kind: TokenKind, nesting: Nesting, tag: &'static str) -> Self {
        Self {
            kind,
            nesting,
            tag,
            content: String::new(),
            info: String::new(),
            attrs: Vec::new(),
        }
    }
}
