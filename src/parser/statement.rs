use log::trace;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::parser::{expression, parse_statements};
use crate::scanner::token::{Token, TokenKind};

type Accepts = fn(&[Token]) -> bool;
type ParseFn = fn(&[Token]) -> Result<Stmt, ParseError>;

/// Statement parsers in priority order; the first whose predicate accepts a
/// segment parses it.
const STATEMENT_PARSERS: [(&str, Accepts, ParseFn); 5] = [
    ("print", is_print, parse_print),
    ("declaration", is_declaration, parse_declaration),
    (
        "declaration-and-assignment",
        is_declaration_and_assignment,
        parse_declaration_and_assignment,
    ),
    ("assignment", is_assignment, parse_assignment),
    ("if", is_if, parse_if),
];

pub fn parse_statement(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let Some(first) = tokens.first() else {
        return Err(ParseError::new(
            ParseErrorKind::InvalidStatement,
            "Empty statement",
        ));
    };
    let Some((name, _, parse)) = STATEMENT_PARSERS
        .iter()
        .find(|(_, accepts, _)| accepts(tokens))
    else {
        return Err(ParseError::at(
            ParseErrorKind::InvalidStatement,
            format!("Invalid statement starting with '{}'", first.text),
            first,
        ));
    };
    trace!("{name} parser accepts statement at {}", first.position);
    parse(tokens)
}

fn first_kind(tokens: &[Token]) -> Option<TokenKind> {
    tokens.first().map(|t| t.kind)
}

fn has_equal(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.kind == TokenKind::Equal)
}

fn is_print(tokens: &[Token]) -> bool {
    first_kind(tokens) == Some(TokenKind::Println)
}

fn is_declaration(tokens: &[Token]) -> bool {
    first_kind(tokens).is_some_and(|k| k.is_declaration_keyword()) && !has_equal(tokens)
}

fn is_declaration_and_assignment(tokens: &[Token]) -> bool {
    first_kind(tokens).is_some_and(|k| k.is_declaration_keyword()) && has_equal(tokens)
}

fn is_assignment(tokens: &[Token]) -> bool {
    first_kind(tokens) == Some(TokenKind::Identifier)
}

fn is_if(tokens: &[Token]) -> bool {
    first_kind(tokens) == Some(TokenKind::If)
}

/// Require `tokens[index]` to be of `kind`; `what` describes it for the error.
fn expect<'t>(
    tokens: &'t [Token],
    index: usize,
    kind: TokenKind,
    what: &str,
) -> Result<&'t Token, ParseError> {
    match tokens.get(index) {
        Some(token) if token.kind == kind => Ok(token),
        Some(token) => Err(ParseError::at(
            ParseErrorKind::MalformedStatement,
            format!("Expected {what}, found '{}'", token.text),
            token,
        )),
        None => Err(missing(tokens, what)),
    }
}

fn missing(tokens: &[Token], what: &str) -> ParseError {
    match tokens.last() {
        Some(last) => ParseError::at(
            ParseErrorKind::MalformedStatement,
            format!("Expected {what} after '{}'", last.text),
            last,
        ),
        None => ParseError::new(ParseErrorKind::MalformedStatement, format!("Expected {what}")),
    }
}

fn reject_trailing(tokens: &[Token], end: usize) -> Result<(), ParseError> {
    match tokens.get(end) {
        Some(extra) => Err(ParseError::unexpected(extra)),
        None => Ok(()),
    }
}

// ============= Declarations and assignment =============

/// `let|const <identifier> : <type>`
fn binding(tokens: &[Token]) -> Result<(DeclaredIdentifier, TypeName), ParseError> {
    let keyword = &tokens[0];
    let name = expect(tokens, 1, TokenKind::Identifier, "an identifier")?;
    expect(tokens, 2, TokenKind::Colon, "':'")?;
    let declared_type = match tokens.get(3) {
        Some(token) => TypeName::from_token(token.kind).ok_or_else(|| {
            ParseError::at(
                ParseErrorKind::MalformedStatement,
                format!("Expected a type name, found '{}'", token.text),
                token,
            )
        })?,
        None => return Err(missing(tokens, "a type name")),
    };
    let identifier = DeclaredIdentifier {
        name: name.text.clone(),
        mutable: keyword.kind == TokenKind::Let,
        position: name.position,
    };
    Ok((identifier, declared_type))
}

fn parse_declaration(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let (identifier, declared_type) = binding(tokens)?;
    reject_trailing(tokens, 4)?;
    Ok(Stmt::Declaration(DeclarationStmt {
        identifier,
        declared_type,
        position: tokens[0].position,
    }))
}

fn parse_declaration_and_assignment(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let (identifier, declared_type) = binding(tokens)?;
    let equal = expect(tokens, 4, TokenKind::Equal, "'='")?;
    let initializer = parse_value(
        &tokens[5..],
        equal,
        "Expected value after assignment operator in declaration",
    )?;
    Ok(Stmt::DeclarationAndAssignment(DeclarationAndAssignmentStmt {
        identifier,
        declared_type,
        initializer,
        position: tokens[0].position,
    }))
}

fn parse_assignment(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let name = &tokens[0];
    let equal = expect(tokens, 1, TokenKind::Equal, "'='")?;
    let value = parse_value(
        &tokens[2..],
        equal,
        "Expected value after assignment operator",
    )?;
    Ok(Stmt::Assignment(AssignmentStmt {
        identifier: IdentifierExpr {
            name: name.text.clone(),
            position: name.position,
        },
        value,
        position: name.position,
    }))
}

/// Right-hand side of a binding: an input call or an expression.
fn parse_value(tokens: &[Token], anchor: &Token, missing: &str) -> Result<Expr, ParseError> {
    match first_kind(tokens) {
        None => Err(ParseError::at(ParseErrorKind::MissingValue, missing, anchor)),
        Some(TokenKind::ReadInput) => parse_read_input(tokens),
        Some(TokenKind::ReadEnv) => parse_read_env(tokens),
        Some(_) => expression::parse(tokens),
    }
}

/// `readInput()` or `readInput("prompt")`
fn parse_read_input(tokens: &[Token]) -> Result<Expr, ParseError> {
    expect(tokens, 1, TokenKind::LeftParen, "'(' after readInput")?;
    let (prompt, close) = match tokens.get(2) {
        Some(token) if token.kind == TokenKind::StringLiteral => (token.text.clone(), 3),
        _ => (String::new(), 2),
    };
    expect(tokens, close, TokenKind::RightParen, "')' to close readInput")?;
    reject_trailing(tokens, close + 1)?;
    Ok(Expr::ReadInput(ReadInputExpr {
        prompt,
        position: tokens[0].position,
    }))
}

/// `readEnv(name)` or `readEnv("name")`
fn parse_read_env(tokens: &[Token]) -> Result<Expr, ParseError> {
    expect(tokens, 1, TokenKind::LeftParen, "'(' after readEnv")?;
    let source = match tokens.get(2) {
        Some(token)
            if matches!(token.kind, TokenKind::Identifier | TokenKind::StringLiteral) =>
        {
            token.text.clone()
        }
        Some(token) => {
            return Err(ParseError::at(
                ParseErrorKind::MalformedStatement,
                format!("Expected a variable name in readEnv, found '{}'", token.text),
                token,
            ));
        }
        None => return Err(missing(tokens, "a variable name")),
    };
    expect(tokens, 3, TokenKind::RightParen, "')' to close readEnv")?;
    reject_trailing(tokens, 4)?;
    Ok(Expr::ReadEnv(ReadEnvExpr {
        source,
        position: tokens[0].position,
    }))
}

// ============= println =============

/// `println ( <expression> )`
fn parse_print(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let open = expect(tokens, 1, TokenKind::LeftParen, "'(' after println")?;
    let close = tokens.len() - 1;
    if close < 2 || tokens[close].kind != TokenKind::RightParen {
        return Err(ParseError::at(
            ParseErrorKind::UnclosedParenthesis,
            "Expected ')' to close println",
            open,
        ));
    }
    let inner = &tokens[2..close];
    if inner.is_empty() {
        return Err(ParseError::at(
            ParseErrorKind::MissingValue,
            "Expected value inside println",
            open,
        ));
    }
    Ok(Stmt::Print(PrintStmt {
        value: expression::parse(inner)?,
        position: tokens[0].position,
    }))
}

// ============= if / else =============

/// `if ( <identifier> ) { <stmt> } [ else { <stmt> } ]`
fn parse_if(tokens: &[Token]) -> Result<Stmt, ParseError> {
    expect(tokens, 1, TokenKind::LeftParen, "'(' after if")?;
    let condition = expect(tokens, 2, TokenKind::Identifier, "a condition variable")?;
    expect(tokens, 3, TokenKind::RightParen, "')' after if condition")?;
    let open = expect(tokens, 4, TokenKind::LeftBrace, "'{' to open if block")?;

    let close = matching_brace(tokens, 4)?;
    let then_branch = parse_branch(&tokens[5..close], open)?;

    let else_branch = if close + 1 < tokens.len() {
        expect(tokens, close + 1, TokenKind::Else, "'else'")?;
        let else_open = expect(tokens, close + 2, TokenKind::LeftBrace, "'{' to open else block")?;
        let else_close = matching_brace(tokens, close + 2)?;
        reject_trailing(tokens, else_close + 1)?;
        Some(parse_branch(&tokens[close + 3..else_close], else_open)?)
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition: IdentifierExpr {
            name: condition.text.clone(),
            position: condition.position,
        },
        then_branch,
        else_branch,
        position: tokens[0].position,
    }))
}

/// Index of the `}` closing the `{` at `open`.
fn matching_brace(tokens: &[Token], open: usize) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LeftBrace => depth += 1,
            TokenKind::RightBrace => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(ParseError::at(
        ParseErrorKind::MalformedStatement,
        "Expected '}' to close block",
        &tokens[open],
    ))
}

/// A branch body holds exactly one statement.
fn parse_branch(body: &[Token], open: &Token) -> Result<Box<Stmt>, ParseError> {
    let mut statements = parse_statements(body)?;
    if statements.len() != 1 {
        return Err(ParseError::at(
            ParseErrorKind::MalformedStatement,
            format!(
                "An if branch must hold exactly one statement, found {}",
                statements.len()
            ),
            open,
        ));
    }
    Ok(Box::new(statements.remove(0)))
}
