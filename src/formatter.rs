//! Rule-driven rendering of a [`Program`] back to source text.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::error::ConfigError;
use crate::{number, rules};

/// Formatter settings. Each key also loads under its older `number...` name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FormatterRules {
    #[serde(alias = "numberSpacesBeforeColon")]
    pub spaces_before_colon: usize,
    #[serde(alias = "numberSpaceAfterColon")]
    pub spaces_after_colon: usize,
    #[serde(alias = "numberSpaceBeforeAssignation")]
    pub spaces_before_assignment: usize,
    #[serde(alias = "numberSpaceAfterAssignation")]
    pub spaces_after_assignment: usize,
    /// Blank lines emitted before every `println`.
    #[serde(alias = "numberNewLinesBeforePrint")]
    pub newlines_before_println: usize,
    /// Indentation width inside `if` and `else` blocks.
    #[serde(alias = "numberSpacesInBlock")]
    pub block_indent: usize,
}

impl Default for FormatterRules {
    fn default() -> Self {
        Self {
            spaces_before_colon: 0,
            spaces_after_colon: 1,
            spaces_before_assignment: 1,
            spaces_after_assignment: 1,
            newlines_before_println: 0,
            block_indent: 4,
        }
    }
}

impl FormatterRules {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        rules::from_json(json)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        rules::from_path(path.as_ref())
    }
}

/// Render `program` one statement per line.
pub fn format(program: &Program, rules: &FormatterRules) -> String {
    let mut out = String::new();
    for stmt in &program.statements {
        format_stmt(&mut out, stmt, rules);
    }
    debug!(
        "formatted {} statement(s) into {} byte(s)",
        program.statements.len(),
        out.len()
    );
    out
}

fn format_stmt(out: &mut String, stmt: &Stmt, rules: &FormatterRules) {
    match stmt {
        Stmt::Declaration(d) => {
            binding(out, &d.identifier, d.declared_type, rules);
            out.push_str(";\n");
        }
        Stmt::DeclarationAndAssignment(d) => {
            binding(out, &d.identifier, d.declared_type, rules);
            assign_operator(out, rules);
            out.push_str(&expr_text(&d.initializer));
            out.push_str(";\n");
        }
        Stmt::Assignment(a) => {
            out.push_str(&a.identifier.name);
            assign_operator(out, rules);
            out.push_str(&expr_text(&a.value));
            out.push_str(";\n");
        }
        Stmt::Print(p) => {
            out.push_str(&"\n".repeat(rules.newlines_before_println));
            out.push_str("println(");
            out.push_str(&expr_text(&p.value));
            out.push_str(");\n");
        }
        Stmt::If(i) => {
            out.push_str("if (");
            out.push_str(&i.condition.name);
            out.push_str(") {\n");
            block(out, &i.then_branch, rules);
            out.push_str("}\n");
            if let Some(ref else_branch) = i.else_branch {
                out.push_str("else {\n");
                block(out, else_branch, rules);
                out.push_str("}\n");
            }
        }
    }
}

fn binding(
    out: &mut String,
    identifier: &DeclaredIdentifier,
    declared_type: TypeName,
    rules: &FormatterRules,
) {
    out.push_str(if identifier.mutable { "let " } else { "const " });
    out.push_str(&identifier.name);
    out.push_str(&" ".repeat(rules.spaces_before_colon));
    out.push(':');
    out.push_str(&" ".repeat(rules.spaces_after_colon));
    out.push_str(&declared_type.to_string());
}

fn assign_operator(out: &mut String, rules: &FormatterRules) {
    out.push_str(&" ".repeat(rules.spaces_before_assignment));
    out.push('=');
    out.push_str(&" ".repeat(rules.spaces_after_assignment));
}

/// Indent every non-blank line of the nested statement.
fn block(out: &mut String, stmt: &Stmt, rules: &FormatterRules) {
    let mut inner = String::new();
    format_stmt(&mut inner, stmt, rules);
    let indent = " ".repeat(rules.block_indent);
    for line in inner.lines() {
        if !line.is_empty() {
            out.push_str(&indent);
            out.push_str(line);
        }
        out.push('\n');
    }
}

fn expr_text(expr: &Expr) -> String {
    match expr {
        Expr::Literal(l) => match l.kind {
            LiteralKind::Number => number::canonicalize(&l.text).unwrap_or_else(|| l.text.clone()),
            LiteralKind::String => quoted(&l.text),
            LiteralKind::Boolean => l.text.clone(),
        },
        Expr::Identifier(i) => i.name.clone(),
        Expr::Binary(b) => {
            let precedence = b.operator.precedence();
            format!(
                "{} {} {}",
                operand_text(&b.left, precedence, false),
                b.operator,
                operand_text(&b.right, precedence, true)
            )
        }
        Expr::ReadInput(r) if r.prompt.is_empty() => "readInput()".to_string(),
        Expr::ReadInput(r) => format!("readInput({})", quoted(&r.prompt)),
        Expr::ReadEnv(r) => format!("readEnv({})", r.source),
    }
}

/// Double quotes unless the text itself holds one.
fn quoted(text: &str) -> String {
    if text.contains('"') {
        format!("'{text}'")
    } else {
        format!("\"{text}\"")
    }
}

/// Parenthesize an operand that binds looser than its parent, or as tightly
/// when it sits on the right.
fn operand_text(operand: &Expr, parent: u8, right: bool) -> String {
    let text = expr_text(operand);
    match operand {
        Expr::Binary(b)
            if b.operator.precedence() < parent
                || (right && b.operator.precedence() == parent) =>
        {
            format!("({text})")
        }
        _ => text,
    }
}
