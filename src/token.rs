use log::debug;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;
use std::mem;

/// The different kinds of tokens recognized by the SBML scanner.
///
/// Variants without data represent operator, punctuation or keyword tokens.
/// `INTEGER(BigInt)`, `REAL(f64)` and `STRING(String)` carry their decoded
/// literal values. `IDENTIFIER` is used for user‑defined names.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '['
    LEFT_BRACKET,

    /// ']'
    RIGHT_BRACKET,

    /// '{'
    LEFT_BRACE,

    /// '}'
    RIGHT_BRACE,

    /// ','
    COMMA,

    /// ';'
    SEMICOLON,

    /// '#'
    HASH,

    /// '::'
    COLON_COLON,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '*'
    STAR,

    /// '**'
    STAR_STAR,

    /// '/'
    SLASH,

    /// '='
    EQUAL,

    /// '=='
    EQUAL_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// '<>'
    LESS_GREATER,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// A user‑defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes)
    STRING(String),

    /// An integer literal, unbounded in size
    INTEGER(#[serde(serialize_with = "decimal")] BigInt),

    /// A floating point literal, plain or in exponent form
    REAL(f64),

    /// 'andalso'
    ANDALSO,

    /// 'orelse'
    ORELSE,

    /// 'not'
    NOT,

    /// 'mod'
    MOD,

    /// 'in'
    IN,

    /// 'div'
    DIV,

    /// 'print'
    PRINT,

    /// 'if'
    IF,

    /// 'else'
    ELSE,

    /// 'while'
    WHILE,

    /// 'fun'
    FUN,

    /// 'True'
    TRUE,

    /// 'False'
    FALSE,

    /// End‑of‑file marker
    EOF,
}

impl TokenType {
    /// Variant name without payload, as used by the token dump.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::LEFT_BRACKET => "LEFT_BRACKET",
            TokenType::RIGHT_BRACKET => "RIGHT_BRACKET",
            TokenType::LEFT_BRACE => "LEFT_BRACE",
            TokenType::RIGHT_BRACE => "RIGHT_BRACE",
            TokenType::COMMA => "COMMA",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::HASH => "HASH",
            TokenType::COLON_COLON => "COLON_COLON",
            TokenType::PLUS => "PLUS",
            TokenType::MINUS => "MINUS",
            TokenType::STAR => "STAR",
            TokenType::STAR_STAR => "STAR_STAR",
            TokenType::SLASH => "SLASH",
            TokenType::EQUAL => "EQUAL",
            TokenType::EQUAL_EQUAL => "EQUAL_EQUAL",
            TokenType::LESS => "LESS",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::LESS_GREATER => "LESS_GREATER",
            TokenType::GREATER => "GREATER",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::STRING(_) => "STRING",
            TokenType::INTEGER(_) => "INTEGER",
            TokenType::REAL(_) => "REAL",
            TokenType::ANDALSO => "ANDALSO",
            TokenType::ORELSE => "ORELSE",
            TokenType::NOT => "NOT",
            TokenType::MOD => "MOD",
            TokenType::IN => "IN",
            TokenType::DIV => "DIV",
            TokenType::PRINT => "PRINT",
            TokenType::IF => "IF",
            TokenType::ELSE => "ELSE",
            TokenType::WHILE => "WHILE",
            TokenType::FUN => "FUN",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::EOF => "EOF",
        }
    }
}

/// Integer literals go into the JSON token dump as decimal strings.
fn decimal<S: Serializer>(n: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(n)
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token, including its type, the original lexeme,
/// and the line number where it was found.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token<'a> {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: &'a str,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl<'a> Token<'a> {
    /// Create a new Token with the given type, lexeme, and line.
    pub fn new(token_type: TokenType, lexeme: &'a str, line: usize) -> Self {
        debug!(
            "Creating new token: type={:?}, lexeme={}, line={}",
            token_type, lexeme, line
        );

        Self {
            token_type,
            lexeme,
            line,
        }
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant: &'static str = self.token_type.name();

        match &self.token_type {
            TokenType::STRING(s) => write!(f, "{} {} {}", variant, self.lexeme, s),

            TokenType::INTEGER(n) => write!(f, "{} {} {}", variant, self.lexeme, n),

            TokenType::REAL(n) => write!(f, "{} {} {:?}", variant, self.lexeme, n),

            _ => write!(f, "{} {} null", variant, self.lexeme),
        }
    }
}
