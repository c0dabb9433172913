use log::{debug, trace};

use crate::error::{ConfigError, LexError};
use crate::scanner::profile::{Profile, Version};
use crate::scanner::sublexer::{
    BooleanLexer, IdentifierLexer, KeywordLexer, NumberLexer, OperatorLexer, Source, StringLexer,
    SubLexer, TypeLexer,
};
use crate::scanner::token::{Span, Token};

/// Composite lexer: runs every sub-lexer of a version profile over the whole
/// input and merges their tokens back into source order.
pub struct Lexer {
    profile: &'static Profile,
    lexers: Vec<Box<dyn SubLexer>>,
}

impl Lexer {
    pub fn new(version: Version) -> Self {
        let profile = version.profile();
        let mut lexers: Vec<Box<dyn SubLexer>> = vec![
            Box::new(KeywordLexer { profile }),
            Box::new(TypeLexer { profile }),
            Box::new(IdentifierLexer { profile }),
            Box::new(NumberLexer),
            Box::new(OperatorLexer { profile }),
            Box::new(StringLexer),
        ];
        if profile.booleans {
            lexers.push(Box::new(BooleanLexer { profile }));
        }
        Self { profile, lexers }
    }

    /// Build a lexer from a version tag such as `"1.0"`.
    pub fn for_version(tag: &str) -> Result<Self, ConfigError> {
        Version::from_tag(tag).map(Self::new)
    }

    pub fn version(&self) -> Version {
        self.profile.version
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexError> {
        let source = Source::new(text);
        let mut tokens = Vec::new();
        for lexer in &self.lexers {
            let found = lexer.tokenize(&source)?;
            trace!("{} lexer matched {} token(s)", lexer.name(), found.len());
            tokens.extend(found);
        }
        tokens.sort_by_key(|t| t.position);

        check_coverage(&source, &tokens)?;
        debug!(
            "scanned {} token(s) under version {}",
            tokens.len(),
            self.profile.version
        );
        Ok(tokens)
    }
}

/// Fail on the first run of non-whitespace input that no token covers.
fn check_coverage(source: &Source<'_>, tokens: &[Token]) -> Result<(), LexError> {
    let text = source.text;
    let mut covered = vec![false; text.len()];
    for token in tokens {
        covered[token.span.offset..token.span.end()].fill(true);
    }

    let mut chars = text.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        if covered[offset] || c.is_whitespace() {
            continue;
        }
        let mut end = offset + c.len_utf8();
        while let Some(&(next, n)) = chars.peek() {
            if covered[next] || n.is_whitespace() {
                break;
            }
            end = next + n.len_utf8();
            chars.next();
        }
        return Err(LexError::unmatched(
            &text[offset..end],
            source.position(offset),
            Span::new(offset, end - offset),
        ));
    }
    Ok(())
}
