pub mod ast;
pub mod error;
pub mod formatter;
pub mod interpreter;
pub mod linter;
pub mod number;
pub mod parser;
mod rules;
pub mod scanner;

// Re-export error types for convenience
pub use error::{ConfigError, Error, LexError, ParseError, RuntimeError};
pub use scanner::profile::Version;

use ast::Program;
use parser::Parser;

/// Scan and parse `source` under `version`. Lex and parse errors carry the
/// source code for diagnostic rendering.
pub fn parse_source(source: &str, version: Version) -> Result<Program, Error> {
    let tokens = scanner::scan(source, version)
        .map_err(|e| e.with_source_code("input", source))?;
    let program = Parser::new(tokens)
        .parse()
        .map_err(|e| e.with_source_code("input", source))?;
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_source_reports_each_stage() {
        assert!(parse_source("let x: number = 1;", Version::V1_0).is_ok());
        assert!(matches!(
            parse_source("let x: number = 1 @ 2;", Version::V1_1),
            Err(Error::Lex(_))
        ));
        assert!(matches!(
            parse_source("let x: number = ;", Version::V1_1),
            Err(Error::Parse(_))
        ));
    }
}
