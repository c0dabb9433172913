use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scanner::token::TokenKind;

/// Language version accepted by the lexer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Version {
    #[strum(serialize = "1.0")]
    #[serde(rename = "1.0")]
    V1_0,
    #[strum(serialize = "1.1")]
    #[serde(rename = "1.1")]
    V1_1,
}

impl Version {
    /// Resolve a version tag such as `"1.1"`.
    pub fn from_tag(tag: &str) -> Result<Self, ConfigError> {
        tag.parse().map_err(|_| ConfigError::UnsupportedVersion {
            version: tag.to_string(),
        })
    }

    pub fn profile(self) -> &'static Profile {
        match self {
            Self::V1_0 => &V1_0,
            Self::V1_1 => &V1_1,
        }
    }
}

/// The fixed token tables of one language version.
#[derive(Debug)]
pub struct Profile {
    pub version: Version,
    pub keywords: &'static [(&'static str, TokenKind)],
    pub types: &'static [(&'static str, TokenKind)],
    pub operators: &'static [(char, TokenKind)],
    pub booleans: bool,
    /// Words that belong to a later version.
    pub reserved_words: &'static [&'static str],
    /// Operator characters that belong to a later version.
    pub reserved_operators: &'static [char],
}

const OPERATORS_V1_0: &[(char, TokenKind)] = &[
    ('+', TokenKind::Plus),
    ('-', TokenKind::Minus),
    ('*', TokenKind::Star),
    ('/', TokenKind::Slash),
    ('=', TokenKind::Equal),
    ('(', TokenKind::LeftParen),
    (')', TokenKind::RightParen),
    (':', TokenKind::Colon),
    (';', TokenKind::Semicolon),
];

const OPERATORS_V1_1: &[(char, TokenKind)] = &[
    ('+', TokenKind::Plus),
    ('-', TokenKind::Minus),
    ('*', TokenKind::Star),
    ('/', TokenKind::Slash),
    ('=', TokenKind::Equal),
    ('(', TokenKind::LeftParen),
    (')', TokenKind::RightParen),
    (':', TokenKind::Colon),
    (';', TokenKind::Semicolon),
    ('{', TokenKind::LeftBrace),
    ('}', TokenKind::RightBrace),
];

static V1_0: Profile = Profile {
    version: Version::V1_0,
    keywords: &[("let", TokenKind::Let), ("println", TokenKind::Println)],
    types: &[
        ("number", TokenKind::NumberType),
        ("string", TokenKind::StringType),
    ],
    operators: OPERATORS_V1_0,
    booleans: false,
    reserved_words: &[
        "const",
        "if",
        "else",
        "readInput",
        "readEnv",
        "boolean",
        "true",
        "false",
    ],
    reserved_operators: &['{', '}'],
};

static V1_1: Profile = Profile {
    version: Version::V1_1,
    keywords: &[
        ("let", TokenKind::Let),
        ("const", TokenKind::Const),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("println", TokenKind::Println),
        ("readInput", TokenKind::ReadInput),
        ("readEnv", TokenKind::ReadEnv),
    ],
    types: &[
        ("number", TokenKind::NumberType),
        ("string", TokenKind::StringType),
        ("boolean", TokenKind::BooleanType),
    ],
    operators: OPERATORS_V1_1,
    booleans: true,
    reserved_words: &[],
    reserved_operators: &[],
};

impl Profile {
    pub fn keyword(&self, word: &str) -> Option<TokenKind> {
        lookup(self.keywords, word)
    }

    pub fn type_name(&self, word: &str) -> Option<TokenKind> {
        lookup(self.types, word)
    }

    pub fn operator(&self, c: char) -> Option<TokenKind> {
        self.operators
            .iter()
            .find(|(op, _)| *op == c)
            .map(|(_, kind)| *kind)
    }

    pub fn is_boolean(&self, word: &str) -> bool {
        self.booleans && matches!(word, "true" | "false")
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words.contains(&word)
    }

    /// Words the identifier sub-lexer must never emit.
    pub fn is_identifier_excluded(&self, word: &str) -> bool {
        self.keyword(word).is_some()
            || self.type_name(word).is_some()
            || self.is_boolean(word)
            || self.is_reserved(word)
    }
}

fn lookup(table: &[(&str, TokenKind)], word: &str) -> Option<TokenKind> {
    table
        .iter()
        .find(|(text, _)| *text == word)
        .map(|(_, kind)| *kind)
}
