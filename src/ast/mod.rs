pub mod printer;

use serde::{Deserialize, Serialize};

use crate::scanner::token::{Position, TokenKind};

/// Top-level program: statements in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    Declaration(DeclarationStmt),
    DeclarationAndAssignment(DeclarationAndAssignmentStmt),
    Assignment(AssignmentStmt),
    If(IfStmt),
    Print(PrintStmt),
}

impl Stmt {
    pub fn position(&self) -> Position {
        match self {
            Self::Declaration(s) => s.position,
            Self::DeclarationAndAssignment(s) => s.position,
            Self::Assignment(s) => s.position,
            Self::If(s) => s.position,
            Self::Print(s) => s.position,
        }
    }
}

/// A binding site. `let` makes it mutable, `const` does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredIdentifier {
    pub name: String,
    pub mutable: bool,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationStmt {
    pub identifier: DeclaredIdentifier,
    pub declared_type: TypeName,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationAndAssignmentStmt {
    pub identifier: DeclaredIdentifier,
    pub declared_type: TypeName,
    pub initializer: Expr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentStmt {
    pub identifier: IdentifierExpr,
    pub value: Expr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: IdentifierExpr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintStmt {
    pub value: Expr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    Binary(BinaryExpr),
    ReadInput(ReadInputExpr),
    ReadEnv(ReadEnvExpr),
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Self::Literal(e) => e.position,
            Self::Identifier(e) => e.position,
            Self::Binary(e) => e.position,
            Self::ReadInput(e) => e.position,
            Self::ReadEnv(e) => e.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub text: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierExpr {
    pub name: String,
    pub position: Position,
}

/// `position` is the operator's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub operator: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadInputExpr {
    pub prompt: String,
    pub position: Position,
}

/// Reads the current value of another declared variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadEnvExpr {
    pub source: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Self::Add),
            TokenKind::Minus => Some(Self::Subtract),
            TokenKind::Star => Some(Self::Multiply),
            TokenKind::Slash => Some(Self::Divide),
            _ => None,
        }
    }

    /// Binding strength: `*` and `/` bind tighter than `+` and `-`.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
        }
    }
}

/// Kind of a literal, and of every runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LiteralKind {
    Number,
    String,
    Boolean,
}

impl LiteralKind {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::NumberLiteral => Some(Self::Number),
            TokenKind::StringLiteral => Some(Self::String),
            TokenKind::BooleanLiteral => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// A type name written in a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TypeName {
    Number,
    String,
    Boolean,
}

impl TypeName {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::NumberType => Some(Self::Number),
            TokenKind::StringType => Some(Self::String),
            TokenKind::BooleanType => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl From<TypeName> for LiteralKind {
    fn from(type_name: TypeName) -> Self {
        match type_name {
            TypeName::Number => Self::Number,
            TypeName::String => Self::String,
            TypeName::Boolean => Self::Boolean,
        }
    }
}
