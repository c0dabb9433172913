//! Single-purpose lexers, one per token category.
//!
//! Every sub-lexer scans the whole input on its own and reports the tokens it
//! recognizes together with their absolute position. The composite lexer in
//! [`crate::scanner::lexer`] merges the results.

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

use crate::error::LexError;
use crate::number;
use crate::scanner::profile::Profile;
use crate::scanner::token::{LineIndex, Position, Span, Token, TokenKind};

/// Input shared by all sub-lexers of one run.
pub struct Source<'s> {
    pub text: &'s str,
    lines: LineIndex<'s>,
    /// Spans of string literals, including their quotes, in source order.
    quoted: Vec<Span>,
}

impl<'s> Source<'s> {
    pub fn new(text: &'s str) -> Self {
        let quoted = find_all(text, string_literal, false)
            .into_iter()
            .map(|(span, _)| span)
            .collect();
        Self {
            text,
            lines: LineIndex::new(text),
            quoted,
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        self.lines.position(offset)
    }

    pub fn is_quoted(&self, span: Span) -> bool {
        // literals never overlap, so only the last one starting at or before
        // `span` can hold it
        let after = self.quoted.partition_point(|q| q.offset <= span.offset);
        after > 0 && self.quoted[after - 1].contains(span)
    }

    fn token(&self, kind: TokenKind, text: impl Into<String>, span: Span) -> Token {
        Token::new(kind, text, self.position(span.offset), span)
    }

    /// Matches of `matcher` that do not lie inside a string literal.
    fn unquoted<F>(&self, matcher: F, word: bool) -> Vec<(Span, &'s str)>
    where
        F: FnMut(&mut &'s str) -> ModalResult<&'s str>,
    {
        find_all(self.text, matcher, word)
            .into_iter()
            .filter(|(span, _)| !self.is_quoted(*span))
            .collect()
    }
}

pub trait SubLexer {
    fn name(&self) -> &'static str;

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError>;
}

pub struct KeywordLexer {
    pub profile: &'static Profile,
}

impl SubLexer for KeywordLexer {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        for (span, word) in source.unquoted(word, true) {
            if let Some(kind) = self.profile.keyword(word) {
                tokens.push(source.token(kind, word, span));
            } else if self.profile.is_reserved(word) {
                let position = source.position(span.offset);
                return Err(LexError::unsupported(
                    word,
                    self.profile.version,
                    position,
                    span,
                ));
            }
        }
        Ok(tokens)
    }
}

pub struct TypeLexer {
    pub profile: &'static Profile,
}

impl SubLexer for TypeLexer {
    fn name(&self) -> &'static str {
        "type"
    }

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError> {
        Ok(source
            .unquoted(word, true)
            .into_iter()
            .filter_map(|(span, word)| {
                self.profile
                    .type_name(word)
                    .map(|kind| source.token(kind, word, span))
            })
            .collect())
    }
}

pub struct IdentifierLexer {
    pub profile: &'static Profile,
}

impl SubLexer for IdentifierLexer {
    fn name(&self) -> &'static str {
        "identifier"
    }

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError> {
        Ok(source
            .unquoted(word, true)
            .into_iter()
            .filter(|(_, word)| !self.profile.is_identifier_excluded(word))
            .map(|(span, word)| source.token(TokenKind::Identifier, word, span))
            .collect())
    }
}

pub struct BooleanLexer {
    pub profile: &'static Profile,
}

impl SubLexer for BooleanLexer {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError> {
        Ok(source
            .unquoted(word, true)
            .into_iter()
            .filter(|(_, word)| self.profile.is_boolean(word))
            .map(|(span, word)| source.token(TokenKind::BooleanLiteral, word, span))
            .collect())
    }
}

pub struct NumberLexer;

impl SubLexer for NumberLexer {
    fn name(&self) -> &'static str {
        "number"
    }

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError> {
        Ok(source
            .unquoted(number_literal, true)
            .into_iter()
            .map(|(span, lexeme)| {
                source.token(TokenKind::NumberLiteral, number::literal_text(lexeme), span)
            })
            .collect())
    }
}

pub struct StringLexer;

impl SubLexer for StringLexer {
    fn name(&self) -> &'static str {
        "string"
    }

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError> {
        Ok(find_all(source.text, string_literal, false)
            .into_iter()
            .map(|(span, lexeme)| {
                let content = &lexeme[1..lexeme.len() - 1];
                source.token(TokenKind::StringLiteral, content, span)
            })
            .collect())
    }
}

pub struct OperatorLexer {
    pub profile: &'static Profile,
}

impl SubLexer for OperatorLexer {
    fn name(&self) -> &'static str {
        "operator"
    }

    fn tokenize(&self, source: &Source<'_>) -> Result<Vec<Token>, LexError> {
        let profile = self.profile;
        let mut tokens = Vec::new();
        for (span, lexeme) in source.unquoted(|input| operator_char(input, profile), false) {
            let c = lexeme.chars().next().unwrap_or_default();
            match profile.operator(c) {
                Some(kind) => tokens.push(source.token(kind, lexeme, span)),
                None => {
                    let position = source.position(span.offset);
                    return Err(LexError::unsupported(
                        lexeme,
                        profile.version,
                        position,
                        span,
                    ));
                }
            }
        }
        Ok(tokens)
    }
}

// --- Matchers ---

fn word<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        any.verify(|c: &char| c.is_ascii_alphabetic() || *c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn number_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (digit1, opt(('.', digit1))).take().parse_next(input)
}

fn string_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        ('"', take_till(0.., ['"', '\n']), '"'),
        ('\'', take_till(0.., ['\'', '\n']), '\''),
    ))
    .take()
    .parse_next(input)
}

/// A single operator character, including the ones reserved for a later version.
fn operator_char<'a>(input: &mut &'a str, profile: &Profile) -> ModalResult<&'a str> {
    any.verify(|c: &char| profile.operator(*c).is_some() || profile.reserved_operators.contains(c))
        .take()
        .parse_next(input)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Every non-overlapping match of `matcher` in `text`, scanning left to right.
///
/// With `word` set, a match must start and end on a word boundary.
fn find_all<'s, F>(text: &'s str, mut matcher: F, word: bool) -> Vec<(Span, &'s str)>
where
    F: FnMut(&mut &'s str) -> ModalResult<&'s str>,
{
    let mut found = Vec::new();
    let mut offset = 0;
    while offset < text.len() {
        let rest = &text[offset..];
        let at_boundary = !word || !text[..offset].chars().next_back().is_some_and(is_word_char);
        if at_boundary {
            let mut input = rest;
            if let Ok(lexeme) = matcher(&mut input) {
                let ends_on_boundary = !word || !input.chars().next().is_some_and(is_word_char);
                if !lexeme.is_empty() && ends_on_boundary {
                    found.push((Span::new(offset, lexeme.len()), lexeme));
                    offset += lexeme.len();
                    continue;
                }
            }
        }
        offset += rest.chars().next().map_or(1, char::len_utf8);
    }
    found
}
