use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords
    Let,
    Const,
    If,
    Else,
    Println,
    ReadInput,
    ReadEnv,

    // Type names
    NumberType,
    StringType,
    BooleanType,

    // Literals
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,

    Identifier,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Equal,

    // Punctuation
    Colon,
    Semicolon,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NumberLiteral | Self::StringLiteral | Self::BooleanLiteral
        )
    }

    pub fn is_type_name(self) -> bool {
        matches!(self, Self::NumberType | Self::StringType | Self::BooleanType)
    }

    /// `let` and `const`, the two tokens that open a binding.
    pub fn is_declaration_keyword(self) -> bool {
        matches!(self, Self::Let | Self::Const)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let => write!(f, "let"),
            Self::Const => write!(f, "const"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::Println => write!(f, "println"),
            Self::ReadInput => write!(f, "readInput"),
            Self::ReadEnv => write!(f, "readEnv"),
            Self::NumberType => write!(f, "number"),
            Self::StringType => write!(f, "string"),
            Self::BooleanType => write!(f, "boolean"),
            Self::NumberLiteral => write!(f, "NUMBER"),
            Self::StringLiteral => write!(f, "STRING"),
            Self::BooleanLiteral => write!(f, "BOOLEAN"),
            Self::Identifier => write!(f, "IDENTIFIER"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Equal => write!(f, "="),
            Self::Colon => write!(f, ":"),
            Self::Semicolon => write!(f, ";"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
        }
    }
}

/// Zero-based line and column of a token's first character.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of the byte `offset` in `source`. Scanning many offsets of
    /// one text should go through a shared [`LineIndex`] instead.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        LineIndex::new(source).position(offset)
    }
}

/// Line start offsets of a text, for repeated offset to position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    text: &'s str,
    starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    pub fn new(text: &'s str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    /// Offsets past the end clamp to the end of the text.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        let column = self.text[self.starts[line]..offset].chars().count();
        Position::new(line, column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} and column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn contains(&self, other: Span) -> bool {
        self.offset <= other.offset && other.end() <= self.end()
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.offset.into(), span.len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} '{}' @{}:{}",
            self.kind, self.text, self.position.line, self.position.column
        )
    }
}
