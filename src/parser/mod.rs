pub mod expression;
pub mod statement;

use log::debug;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::scanner::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn parse(self) -> Result<Program, ParseError> {
        let statements = parse_statements(&self.tokens)?;
        debug!(
            "parsed {} statement(s) from {} token(s)",
            statements.len(),
            self.tokens.len()
        );
        Ok(Program { statements })
    }
}

/// Segment `tokens` and parse every segment; also used for `if` branch bodies.
pub(crate) fn parse_statements(tokens: &[Token]) -> Result<Vec<Stmt>, ParseError> {
    segment(tokens)?
        .into_iter()
        .map(statement::parse_statement)
        .collect()
}

/// Split a token stream into one slice per top-level statement.
///
/// `;` at brace depth 0 ends a statement and is dropped. A `}` that brings the
/// depth back to 0 ends the statement too, unless an `else` follows it.
fn segment(tokens: &[Token]) -> Result<Vec<&[Token]>, ParseError> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Semicolon if depth == 0 => {
                push_nonempty(&mut statements, &tokens[start..i]);
                start = i + 1;
            }
            TokenKind::LeftBrace => depth += 1,
            TokenKind::RightBrace => {
                if depth == 0 {
                    return Err(ParseError::unexpected(token));
                }
                depth -= 1;
                let else_follows = tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::Else);
                if depth == 0 && !else_follows {
                    push_nonempty(&mut statements, &tokens[start..=i]);
                    start = i + 1;
                }
            }
            _ => {}
        }
    }

    if let Some(first) = tokens.get(start) {
        return Err(ParseError::at(
            ParseErrorKind::UnfinishedStatement,
            "Unfinished statement, check for a missing ';' or '}'",
            first,
        ));
    }
    Ok(statements)
}

fn push_nonempty<'t>(statements: &mut Vec<&'t [Token]>, slice: &'t [Token]) {
    if !slice.is_empty() {
        statements.push(slice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use crate::scanner::profile::Version;

    fn tokens(source: &str) -> Vec<Token> {
        scanner::scan(source, Version::V1_1).expect("scan should succeed")
    }

    fn parse_ok(source: &str) -> Program {
        Parser::new(tokens(source))
            .parse()
            .expect("parse should succeed")
    }

    fn parse_err(source: &str) -> ParseError {
        Parser::new(tokens(source)).parse().unwrap_err()
    }

    fn parse_sexp(source: &str) -> String {
        let program = parse_ok(source);
        crate::ast::printer::to_sexp(&program).trim().to_string()
    }

    fn segment_lengths(source: &str) -> Vec<usize> {
        let tokens = tokens(source);
        segment(&tokens).unwrap().iter().map(|s| s.len()).collect()
    }

    #[test]
    fn semicolons_split_statements() {
        assert_eq!(
            segment_lengths("let x: number = 1; x = 2; println(x);"),
            vec![6, 3, 4]
        );
    }

    #[test]
    fn if_else_is_one_segment() {
        let lengths = segment_lengths(
            "if (a) { println(1); } else { println(2); } println(3);",
        );
        assert_eq!(lengths, vec![19, 4]);
    }

    #[test]
    fn semicolon_after_block_is_dropped() {
        assert_eq!(segment_lengths("if (a) { println(1); };"), vec![11]);
    }

    #[test]
    fn unfinished_statement() {
        let err = parse_err("let x: number = 1; println(x)");
        assert_eq!(err.kind, ParseErrorKind::UnfinishedStatement);
        assert!(err.to_string().contains("line 0 and column 19"));
    }

    #[test]
    fn unbalanced_closing_brace() {
        let err = parse_err("println(1); }");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn unclosed_block_is_unfinished() {
        let err = parse_err("if (a) { println(1);");
        assert_eq!(err.kind, ParseErrorKind::UnfinishedStatement);
    }

    #[test]
    fn program_in_order() {
        assert_eq!(
            parse_sexp("let x: number = 1 + 2 * 3; x = (x - 1) / 2; println(x);"),
            "(let x: number (+ 1.0 (* 2.0 3.0)))\n(= x (/ (- x 1.0) 2.0))\n(println x)"
        );
    }

    #[test]
    fn conditional_with_else() {
        assert_eq!(
            parse_sexp(
                "let a: boolean = true; if (a) { let b: number = 1; } else { let x: number = 0; };"
            ),
            "(let a: boolean true)\n(if a (let b: number 1.0) (let x: number 0.0))"
        );
    }

    #[test]
    fn nested_conditionals() {
        assert_eq!(
            parse_sexp("if (a) { if (b) { println(1); } else { println(2); } }"),
            "(if a (if b (println 1.0) (println 2.0)))"
        );
    }

    #[test]
    fn reparsing_is_stable() {
        let tokens = tokens("const greeting: string = \"hi \" + name; println(greeting);");
        let first = Parser::new(tokens.clone()).parse().unwrap();
        let second = Parser::new(tokens).parse().unwrap();
        assert_eq!(
            crate::ast::printer::to_json(&first).unwrap(),
            crate::ast::printer::to_json(&second).unwrap()
        );
    }
}
