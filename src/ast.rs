//! Abstract syntax tree for SBML programs.
//!
//! Nodes are built once by the [`Parser`](crate::parser::Parser) and are
//! read‑only afterwards.  Every node owns its children; names are copied out
//! of the token stream so the tree outlives the source buffer.

use std::fmt;

use num_bigint::BigInt;

/// A **literal constant** that appears directly in the source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),

    Int(BigInt),

    /// Plain (`3.14`) or exponent form (`1.5e3`).
    Real(f64),

    /// String literal without surrounding quotes.
    Str(String),
}

/// Infix operators, grouped by precedence tier (loosest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    OrElse,
    AndAlso,

    Less,
    LessEqual,
    Equal,
    NotEqual,
    GreaterEqual,
    Greater,

    /// `::`, prepend onto a list.
    Cons,
    /// `in`, membership in a list or string.
    In,

    Plus,
    Minus,

    Times,
    /// `div`, truncating integer division.
    IntDivide,
    Divide,
    /// `mod`
    Modulus,

    /// `**`
    Exponent,
}

impl BinaryOp {
    /// Node label used by the AST renderer.
    pub fn label(self) -> &'static str {
        match self {
            BinaryOp::OrElse => "Orelse",
            BinaryOp::AndAlso => "Andalso",
            BinaryOp::Less => "LessThan",
            BinaryOp::LessEqual => "LEQ",
            BinaryOp::Equal => "EqualTo",
            BinaryOp::NotEqual => "NEQ",
            BinaryOp::GreaterEqual => "GEQ",
            BinaryOp::Greater => "GreaterThan",
            BinaryOp::Cons => "Cons",
            BinaryOp::In => "In",
            BinaryOp::Plus => "Plus",
            BinaryOp::Minus => "Minus",
            BinaryOp::Times => "Times",
            BinaryOp::IntDivide => "IntDivision",
            BinaryOp::Divide => "Division",
            BinaryOp::Modulus => "Modulus",
            BinaryOp::Exponent => "Exponent",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::OrElse => "orelse",
            BinaryOp::AndAlso => "andalso",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "<>",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Greater => ">",
            BinaryOp::Cons => "::",
            BinaryOp::In => "in",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::IntDivide => "div",
            BinaryOp::Divide => "/",
            BinaryOp::Modulus => "mod",
            BinaryOp::Exponent => "**",
        };

        f.write_str(symbol)
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `not`
    Not,
    /// Arithmetic `-`.
    Negate,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => f.write_str("not"),
            UnaryOp::Negate => f.write_str("-"),
        }
    }
}

/// **Abstract‑Syntax‑Tree node** for every kind of *expression*.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant: boolean, integer, real or string.
    Literal(LiteralValue),

    /// Prefix operator expression  
    /// *Example:* `not done` or `-x`
    Unary {
        operator: UnaryOp,
        right: Box<Expr>,
        line: usize,
    },

    /// Infix operator expression  
    /// *Example:* `a + b`, `x :: xs`, `3 in l`
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        line: usize,
    },

    /// `[e1, e2, ...]`
    List(Vec<Expr>),

    /// `(e1, e2, ...)`, always at least one element.
    Tuple(Vec<Expr>),

    /// `target[index]` on a list, tuple or string (0‑based).
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        line: usize,
    },

    /// `#position tuple` (1‑based).
    TupleIndex {
        position: Box<Expr>,
        tuple: Box<Expr>,
        line: usize,
    },

    /// Variable access, resolved against the environment at runtime.
    Variable { name: String, line: usize },

    /// User function call  
    /// *Example:* `fact(n - 1)`
    Call {
        name: String,
        arguments: Vec<Expr>,
        line: usize,
    },
}

/// **Abstract‑Syntax‑Tree node** for *statements*.  Statements only ever
/// appear inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `print(expr);`
    Print(Expr),

    /// `name = expr;`
    Assign {
        name: String,
        value: Expr,
        line: usize,
    },

    /// `name[index] = expr;`, mutates a list in place.
    AssignIndex {
        name: String,
        index: Expr,
        value: Expr,
        line: usize,
    },

    /// `if (cond) { ... }` with an optional `else { ... }`.
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        line: usize,
    },

    /// `while (cond) { ... }`
    While {
        condition: Expr,
        body: Vec<Stmt>,
        line: usize,
    },

    /// Nested `{ ... }`.
    Block(Vec<Stmt>),

    /// A call evaluated for its side effects; the result is discarded.
    Call(Expr),
}

/// `fun name(params) = { body } result;`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,

    pub params: Vec<String>,

    /// Statements run on every call before `result` is evaluated.
    pub body: Vec<Stmt>,

    /// Expression whose value is the call's value.
    pub result: Expr,

    pub line: usize,
}

/// One top‑level unit of a program.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Block(Vec<Stmt>),

    Function(FunctionDecl),
}
