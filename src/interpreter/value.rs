use std::fmt;

use crate::ast::{BinaryOp, LiteralKind};
use crate::error::RuntimeError;
use crate::number;

/// A runtime value: a kind plus its textual form. Number text is always in
/// runtime canonical form (`5`, `2.5`).
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    pub kind: LiteralKind,
    pub text: String,
}

impl Value {
    pub fn number(n: f64) -> Self {
        Self {
            kind: LiteralKind::Number,
            text: number::value_text(n),
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self {
            kind: LiteralKind::String,
            text: text.into(),
        }
    }

    pub fn boolean(b: bool) -> Self {
        Self {
            kind: LiteralKind::Boolean,
            text: b.to_string(),
        }
    }

    /// Value of a literal node; number literal text is re-rendered.
    pub fn from_literal(kind: LiteralKind, text: &str) -> Result<Self, RuntimeError> {
        match kind {
            LiteralKind::Number => number::canonicalize(text)
                .map(|text| Self { kind, text })
                .ok_or_else(|| RuntimeError::invalid_literal(text)),
            _ => Ok(Self {
                kind,
                text: text.to_string(),
            }),
        }
    }

    /// Interpret raw input text as a value of `kind`, if it reads as one.
    /// `NaN` is not accepted as number input.
    pub fn coerce(text: &str, kind: LiteralKind) -> Option<Self> {
        match kind {
            LiteralKind::String => Some(Self::string(text)),
            LiteralKind::Number => number::parse(text)
                .filter(|n| !n.is_nan())
                .map(Self::number),
            LiteralKind::Boolean => match text.trim() {
                "true" => Some(Self::boolean(true)),
                "false" => Some(Self::boolean(false)),
                _ => None,
            },
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            LiteralKind::Number => number::parse(&self.text),
            _ => None,
        }
    }

    /// `Some` for a boolean holding `true` or `false`.
    pub fn as_bool(&self) -> Option<bool> {
        match (self.kind, self.text.as_str()) {
            (LiteralKind::Boolean, "true") => Some(true),
            (LiteralKind::Boolean, "false") => Some(false),
            _ => None,
        }
    }

    /// Apply a binary operator. `+` adds two numbers and otherwise concatenates,
    /// keeping the left operand's kind; the rest need two numbers.
    pub fn binary(operator: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
        if operator == BinaryOp::Add {
            return Ok(match (left.as_number(), right.as_number()) {
                (Some(a), Some(b)) => Value::number(a + b),
                _ => Value {
                    kind: left.kind,
                    text: format!("{}{}", left.text, right.text),
                },
            });
        }

        let a = numeric_operand(operator, left)?;
        let b = numeric_operand(operator, right)?;
        let result = match operator {
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            BinaryOp::Add => a + b,
        };
        Ok(Value::number(result))
    }
}

fn numeric_operand(operator: BinaryOp, value: &Value) -> Result<f64, RuntimeError> {
    value
        .as_number()
        .ok_or_else(|| RuntimeError::invalid_operand(operator, value.text.clone()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
