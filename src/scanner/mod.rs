pub mod lexer;
pub mod profile;
pub mod sublexer;
pub mod token;

use crate::error::LexError;
use lexer::Lexer;
use profile::Version;
use token::Token;

/// Scan source code into a list of tokens under the given language version.
pub fn scan(source: &str, version: Version) -> Result<Vec<Token>, LexError> {
    Lexer::new(version).tokenize(source)
}
