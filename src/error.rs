use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::scanner::token::{Position, Span, Token};

// ============= Front-end errors (with miette diagnostics) =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LexErrorKind {
    #[strum(serialize = "unmatched input")]
    Unmatched,
    #[strum(serialize = "unsupported token")]
    Unsupported,
}

#[derive(Error, Debug, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(printscript::lex))]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub text: String,
    pub position: Position,
    #[label("here")]
    span: SourceSpan,
    #[source_code]
    src: miette::NamedSource<String>,
}

impl LexError {
    pub fn unmatched(text: impl Into<String>, position: Position, span: Span) -> Self {
        let text = text.into();
        Self::new(
            LexErrorKind::Unmatched,
            format!("No matching token for input: {text}, in {position}"),
            text,
            position,
            span,
        )
    }

    pub fn unsupported(
        text: impl Into<String>,
        version: impl std::fmt::Display,
        position: Position,
        span: Span,
    ) -> Self {
        let text = text.into();
        Self::new(
            LexErrorKind::Unsupported,
            format!("Token {text} is not supported in version {version}, in {position}"),
            text,
            position,
            span,
        )
    }

    fn new(
        kind: LexErrorKind,
        message: String,
        text: String,
        position: Position,
        span: Span,
    ) -> Self {
        Self {
            kind,
            message,
            text,
            position,
            span: span.into(),
            src: miette::NamedSource::new("input", String::new()),
        }
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.src = miette::NamedSource::new(name.into(), source.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ParseErrorKind {
    #[strum(serialize = "unfinished statement")]
    UnfinishedStatement,
    #[strum(serialize = "unexpected token")]
    UnexpectedToken,
    #[strum(serialize = "missing value")]
    MissingValue,
    #[strum(serialize = "missing operand")]
    MissingOperand,
    #[strum(serialize = "unclosed parenthesis")]
    UnclosedParenthesis,
    #[strum(serialize = "invalid statement")]
    InvalidStatement,
    #[strum(serialize = "malformed statement")]
    MalformedStatement,
}

#[derive(Error, Debug, Diagnostic)]
#[error("parse error: {message}")]
#[diagnostic(code(printscript::parse))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub position: Option<Position>,
    #[label("here")]
    span: Option<SourceSpan>,
    #[source_code]
    src: miette::NamedSource<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            span: None,
            src: miette::NamedSource::new("input", String::new()),
        }
    }

    /// Error located at `token`; the message gains its line and column.
    pub fn at(kind: ParseErrorKind, message: impl Into<String>, token: &Token) -> Self {
        Self {
            kind,
            message: format!("{} in {}", message.into(), token.position),
            position: Some(token.position),
            span: Some(Span::new(token.span.offset, token.span.len.max(1)).into()),
            src: miette::NamedSource::new("input", String::new()),
        }
    }

    pub fn unexpected(token: &Token) -> Self {
        Self::at(
            ParseErrorKind::UnexpectedToken,
            format!("Unexpected token '{}'", token.text),
            token,
        )
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.src = miette::NamedSource::new(name.into(), source.into());
        self
    }
}

// ============= Runtime errors (simple, no miette) =============

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Variable {name} already exists{}", located(.position))]
    AlreadyExists {
        name: String,
        position: Option<Position>,
    },

    #[error("Variable {name} not found{}", located(.position))]
    NotFound {
        name: String,
        position: Option<Position>,
    },

    #[error(
        "Type mismatch for variable {name}: expected {expected}, found {found}{}",
        located(.position)
    )]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
        position: Option<Position>,
    },

    #[error("Variable {name} is not mutable{}", located(.position))]
    NotMutable {
        name: String,
        position: Option<Position>,
    },

    #[error("Invalid argument type for if statement: {name}{}", located(.position))]
    InvalidIfCondition {
        name: String,
        position: Option<Position>,
    },

    #[error("Variable {name} is not initialized{}", located(.position))]
    Uninitialized {
        name: String,
        position: Option<Position>,
    },

    #[error("Invalid operand '{text}' for operator '{operator}'{}", located(.position))]
    InvalidOperand {
        operator: String,
        text: String,
        position: Option<Position>,
    },

    #[error("Invalid number literal '{text}'{}", located(.position))]
    InvalidLiteral {
        text: String,
        position: Option<Position>,
    },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

fn located(position: &Option<Position>) -> String {
    position.map(|p| format!(" in {p}")).unwrap_or_default()
}

impl RuntimeError {
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            name: name.into(),
            position: None,
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            position: None,
        }
    }

    pub fn type_mismatch(
        name: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: expected.to_string(),
            found: found.to_string(),
            position: None,
        }
    }

    pub fn not_mutable(name: impl Into<String>) -> Self {
        Self::NotMutable {
            name: name.into(),
            position: None,
        }
    }

    pub fn invalid_if_condition(name: impl Into<String>) -> Self {
        Self::InvalidIfCondition {
            name: name.into(),
            position: None,
        }
    }

    pub fn uninitialized(name: impl Into<String>) -> Self {
        Self::Uninitialized {
            name: name.into(),
            position: None,
        }
    }

    pub fn invalid_operand(operator: impl ToString, text: impl Into<String>) -> Self {
        Self::InvalidOperand {
            operator: operator.to_string(),
            text: text.into(),
            position: None,
        }
    }

    pub fn invalid_literal(text: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            text: text.into(),
            position: None,
        }
    }

    /// Source location of the offending node, once the interpreter attached it.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::AlreadyExists { position, .. }
            | Self::NotFound { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::NotMutable { position, .. }
            | Self::InvalidIfCondition { position, .. }
            | Self::Uninitialized { position, .. }
            | Self::InvalidOperand { position, .. }
            | Self::InvalidLiteral { position, .. } => *position,
            Self::Io(_) => None,
        }
    }

    /// Attach `at` unless a more precise location is already set.
    pub fn at(mut self, at: Position) -> Self {
        match &mut self {
            Self::AlreadyExists { position, .. }
            | Self::NotFound { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::NotMutable { position, .. }
            | Self::InvalidIfCondition { position, .. }
            | Self::Uninitialized { position, .. }
            | Self::InvalidOperand { position, .. }
            | Self::InvalidLiteral { position, .. } => {
                position.get_or_insert(at);
            }
            Self::Io(_) => {}
        }
        self
    }
}

// ============= Configuration errors =============

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Version {version} not supported")]
    UnsupportedVersion { version: String },

    #[error("cannot read rules file '{}'", path.display())]
    RulesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rules: {0}")]
    RulesFormat(#[from] serde_json::Error),
}

/// Any failure of the toolchain.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ============= Tests =============
