use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::scanner::token::{Token, TokenKind};

/// Parse a whole, non-empty token span as one expression.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = ExpressionParser { tokens, current: 0 };
    let expr = parser.expression(1)?;
    if let Some(extra) = parser.peek() {
        return Err(ParseError::unexpected(extra));
    }
    Ok(expr)
}

/// Precedence climbing: `* /` bind tighter than `+ -`, both left-associative.
struct ExpressionParser<'t> {
    tokens: &'t [Token],
    current: usize,
}

impl<'t> ExpressionParser<'t> {
    fn expression(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.factor()?;

        while let Some((operator, token)) = self.peek_operator(min_precedence) {
            self.advance();
            if self.peek().is_none() {
                let operand = if operator.precedence() > 1 { "factor" } else { "term" };
                return Err(ParseError::at(
                    ParseErrorKind::MissingOperand,
                    format!("Expected {operand} after operator '{operator}'"),
                    token,
                ));
            }
            let right = self.expression(operator.precedence() + 1)?;
            left = Expr::Binary(BinaryExpr {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                position: token.position,
            });
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.advance() else {
            return Err(self.missing_operand());
        };

        if let Some(kind) = LiteralKind::from_token(token.kind) {
            return Ok(Expr::Literal(LiteralExpr {
                kind,
                text: token.text.clone(),
                position: token.position,
            }));
        }

        match token.kind {
            TokenKind::Identifier => Ok(Expr::Identifier(IdentifierExpr {
                name: token.text.clone(),
                position: token.position,
            })),
            TokenKind::LeftParen => {
                if let Some(next) = self.peek().filter(|t| t.kind == TokenKind::RightParen) {
                    return Err(ParseError::unexpected(next));
                }
                let expr = self.expression(1)?;
                match self.peek() {
                    Some(close) if close.kind == TokenKind::RightParen => {
                        self.advance();
                        Ok(expr)
                    }
                    _ => Err(ParseError::at(
                        ParseErrorKind::UnclosedParenthesis,
                        "Expected ')' after expression",
                        token,
                    )),
                }
            }
            _ => Err(ParseError::unexpected(token)),
        }
    }

    fn peek_operator(&self, min_precedence: u8) -> Option<(BinaryOp, &'t Token)> {
        let token = self.peek()?;
        let operator = BinaryOp::from_token(token.kind)?;
        (operator.precedence() >= min_precedence).then_some((operator, token))
    }

    fn missing_operand(&self) -> ParseError {
        match self.tokens.last() {
            Some(last) => ParseError::at(
                ParseErrorKind::MissingOperand,
                format!("Expected a value after '{}'", last.text),
                last,
            ),
            None => ParseError::new(ParseErrorKind::MissingValue, "Expected a value"),
        }
    }

    // ============= Helpers =============

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.current)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.current)?;
        self.current += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use crate::scanner::profile::Version;
    use crate::scanner::token::Position;
    use rstest::rstest;

    fn parse_expr(source: &str) -> Result<Expr, ParseError> {
        let tokens = scanner::scan(source, Version::V1_1).expect("scan should succeed");
        parse(&tokens)
    }

    fn sexp(source: &str) -> String {
        let expr = parse_expr(source).expect("parse should succeed");
        crate::ast::printer::expr_to_sexp(&expr)
    }

    #[rstest]
    #[case("1", "1.0")]
    #[case("x", "x")]
    #[case("\"a b\"", "\"a b\"")]
    #[case("true", "true")]
    #[case("1 + 2 * 3", "(+ 1.0 (* 2.0 3.0))")]
    #[case("1 * 2 + 3", "(+ (* 1.0 2.0) 3.0)")]
    #[case("1 - 2 - 3", "(- (- 1.0 2.0) 3.0)")]
    #[case("8 / 4 / 2", "(/ (/ 8.0 4.0) 2.0)")]
    #[case("(1 + 2) * 3", "(* (+ 1.0 2.0) 3.0)")]
    #[case("((x))", "x")]
    #[case("a + b * c - d / e", "(- (+ a (* b c)) (/ d e))")]
    fn precedence_and_associativity(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(sexp(source), expected);
    }

    #[test]
    fn binary_position_is_the_operator() {
        let Expr::Binary(binary) = parse_expr("a + b").unwrap() else {
            panic!("expected a binary expression");
        };
        assert_eq!(binary.position, Position::new(0, 2));
        assert_eq!(binary.left.position(), Position::new(0, 0));
    }

    #[rstest]
    #[case("1 +", ParseErrorKind::MissingOperand, "Expected term after operator '+'")]
    #[case("2 *", ParseErrorKind::MissingOperand, "Expected factor after operator '*'")]
    #[case("(1 + 2", ParseErrorKind::UnclosedParenthesis, "Expected ')' after expression")]
    #[case("1 2", ParseErrorKind::UnexpectedToken, "Unexpected token '2.0'")]
    #[case("(1))", ParseErrorKind::UnexpectedToken, "Unexpected token ')'")]
    #[case("()", ParseErrorKind::UnexpectedToken, "Unexpected token ')'")]
    #[case("+ 1", ParseErrorKind::UnexpectedToken, "Unexpected token '+'")]
    #[case("(", ParseErrorKind::MissingOperand, "Expected a value after '('")]
    fn rejects_malformed_expression(
        #[case] source: &str,
        #[case] kind: ParseErrorKind,
        #[case] message: &str,
    ) {
        let err = parse_expr(source).unwrap_err();
        assert_eq!(err.kind, kind);
        assert!(err.message.starts_with(message), "{}", err.message);
    }
}
