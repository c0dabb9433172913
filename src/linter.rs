//! Rule-driven style checks over a [`Program`].

use std::fmt;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::error::ConfigError;
use crate::rules;
use crate::scanner::token::Position;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum IdentifierCase {
    #[default]
    #[serde(rename = "camelCase")]
    #[strum(serialize = "camelCase")]
    CamelCase,
    #[serde(rename = "snake_case")]
    #[strum(serialize = "snake_case")]
    SnakeCase,
}

impl IdentifierCase {
    pub fn matches(self, name: &str) -> bool {
        match self {
            Self::CamelCase => is_camel_case(name),
            Self::SnakeCase => is_snake_case(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawLinterRules")]
pub struct LinterRules {
    pub identifier_format: IdentifierCase,
    /// Whether `println` may take a binary expression directly.
    pub operation_in_println: bool,
}

/// Linter settings as written in a rules file. `idFormatCamelCase` is the
/// older boolean spelling of `identifierFormat`; the latter wins when both
/// are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawLinterRules {
    identifier_format: Option<IdentifierCase>,
    id_format_camel_case: Option<bool>,
    operation_in_println: Option<bool>,
}

impl From<RawLinterRules> for LinterRules {
    fn from(raw: RawLinterRules) -> Self {
        let defaults = Self::default();
        let legacy = raw.id_format_camel_case.map(|camel| {
            if camel {
                IdentifierCase::CamelCase
            } else {
                IdentifierCase::SnakeCase
            }
        });
        Self {
            identifier_format: raw
                .identifier_format
                .or(legacy)
                .unwrap_or(defaults.identifier_format),
            operation_in_println: raw
                .operation_in_println
                .unwrap_or(defaults.operation_in_println),
        }
    }
}

impl Default for LinterRules {
    fn default() -> Self {
        Self {
            identifier_format: IdentifierCase::CamelCase,
            operation_in_println: true,
        }
    }
}

impl LinterRules {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        rules::from_json(json)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        rules::from_path(path.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintError {
    pub message: String,
    pub position: Option<Position>,
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Every rule violation in `program`, in source order.
pub fn check_errors(program: &Program, rules: &LinterRules) -> Vec<LintError> {
    let mut linter = Linter {
        rules,
        errors: Vec::new(),
    };
    for stmt in &program.statements {
        linter.stmt(stmt);
    }
    debug!("linter found {} issue(s)", linter.errors.len());
    linter.errors
}

struct Linter<'r> {
    rules: &'r LinterRules,
    errors: Vec<LintError>,
}

impl Linter<'_> {
    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(d) => self.identifier(&d.identifier.name, d.identifier.position),
            Stmt::DeclarationAndAssignment(d) => {
                self.identifier(&d.identifier.name, d.identifier.position);
                self.expr(&d.initializer);
            }
            Stmt::Assignment(a) => {
                self.identifier(&a.identifier.name, a.identifier.position);
                self.expr(&a.value);
            }
            Stmt::Print(p) => {
                if let (false, Expr::Binary(b)) = (self.rules.operation_in_println, &p.value) {
                    self.errors.push(LintError {
                        message: format!("Binary operation in println in {}", b.position),
                        position: Some(b.position),
                    });
                }
                self.expr(&p.value);
            }
            Stmt::If(i) => {
                self.identifier(&i.condition.name, i.condition.position);
                self.stmt(&i.then_branch);
                if let Some(ref else_branch) = i.else_branch {
                    self.stmt(else_branch);
                }
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(i) => self.identifier(&i.name, i.position),
            Expr::Binary(b) => {
                self.expr(&b.left);
                self.expr(&b.right);
            }
            Expr::Literal(_) | Expr::ReadInput(_) | Expr::ReadEnv(_) => {}
        }
    }

    fn identifier(&mut self, name: &str, position: Position) {
        let format = self.rules.identifier_format;
        if !format.matches(name) {
            self.errors.push(LintError {
                message: format!("Identifier {name} is not in {format} format in {position}"),
                position: Some(position),
            });
        }
    }
}

/// Lowercase first letter, then letters and digits only.
fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Lowercase words of letters and digits joined by single underscores.
fn is_snake_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && name.split('_').all(|word| {
            !word.is_empty()
                && word
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}
