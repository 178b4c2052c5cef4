/*!
Recursive‑descent parser for SBML.

Grammar (EBNF, loosest binding first)
-------------------------------------

```text
program        → section* EOF ;
section        → block | fundef ;
fundef         → "fun" IDENT "(" params? ")" "=" block expression ";" ;
params         → IDENT ( "," IDENT )* ","? ;
block          → "{" statement* "}" ;
statement      → ";"
               | block
               | "print" "(" expression ")" ";"
               | IDENT "=" expression ";"
               | IDENT "[" expression "]" "=" expression ";"
               | "if" "(" expression ")" block ( "else" block )?
               | "while" "(" expression ")" block
               | call ";"? ;
expression     → orelse ;
orelse         → andalso ( "orelse" andalso )* ;
andalso        → not ( "andalso" not )* ;
not            → "not" not | relation ;
relation       → cons ( ( "<" | "<=" | "==" | "<>" | ">=" | ">" ) cons )* ;
cons           → member ( "::" cons )? ;
member         → additive ( "in" additive )* ;
additive       → multiplicative ( ( "+" | "-" ) multiplicative )* ;
multiplicative → exponent ( ( "*" | "div" | "/" | "mod" ) exponent )* ;
exponent       → tuple_index ( "**" exponent )? ;
tuple_index    → "#" unary unary | unary ;
unary          → "-" unary | postfix ;
postfix        → primary ( "[" expression "]" )* ;
primary        → INTEGER | REAL | STRING | "True" | "False"
               | call | IDENT
               | "not" not
               | "[" ( expression ( "," expression )* ","? )? "]"
               | "(" expression "," ( expression ( "," expression )* ","? )? ")"
               | "(" expression ")" ;
call           → IDENT "(" ( expression ( "," expression )* ","? )? ")" ;
```

The relational tier is left‑associative, so `a < b < c` parses as
`(a < b) < c`.  `::` and `**` are right‑associative.  A `not` met where an
operand is expected extends as far right as its own tier allows:
`a == not b < c` parses as `a == (not (b < c))`.

Parsing is fail‑fast: the first mismatch returns `SbmlError::Syntax` and no
partial tree survives.
*/

use crate::ast::{BinaryOp, Expr, FunctionDecl, LiteralValue, Section, Stmt, UnaryOp};
use crate::error::{Result, SbmlError};
use crate::scanner;
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser. `tokens` must end with an `EOF` token, as
    /// produced by [`scanner::tokenize`].
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self { tokens, current: 0 }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its sections in source order.
    pub fn parse(&mut self) -> Result<Vec<Section>> {
        info!("Beginning parse phase");

        let mut sections: Vec<Section> = Vec::new();

        while !self.is_at_end() {
            sections.push(self.section()?);
        }

        info!("Parsed {} sections", sections.len());

        Ok(sections)
    }

    /// Parse a single expression followed by `EOF`.
    pub fn parse_expression(&mut self) -> Result<Expr> {
        let expr = self.expression()?;

        if !self.is_at_end() {
            return Err(self.error_at_peek("Expected end of input after expression"));
        }

        Ok(expr)
    }

    // ──────────────────────── section rules ───────────────────────

    fn section(&mut self) -> Result<Section> {
        debug!("Entering section");

        if self.matches(TokenType::FUN) {
            Ok(Section::Function(self.function()?))
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Section::Block(self.block()?))
        } else {
            Err(self.error_at_peek("Expected '{' or 'fun' at top level"))
        }
    }

    fn function(&mut self) -> Result<FunctionDecl> {
        let name: &Token<'_> = self.consume(TokenType::IDENTIFIER, "Expected function name")?;

        self.consume(TokenType::LEFT_PAREN, "Expected '(' after function name")?;

        let mut params: Vec<String> = Vec::new();

        while !self.check(TokenType::RIGHT_PAREN) {
            let param = self.consume(TokenType::IDENTIFIER, "Expected parameter name")?;

            if params.iter().any(|p| p == param.lexeme) {
                return Err(SbmlError::syntax(
                    param.line,
                    format!("Duplicate parameter '{}' in '{}'", param.lexeme, name.lexeme),
                ));
            }

            params.push(param.lexeme.to_string());

            if !self.matches(TokenType::COMMA) {
                break;
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;
        self.consume(TokenType::EQUAL, "Expected '=' before function body")?;
        self.consume(TokenType::LEFT_BRACE, "Expected '{' before function body")?;

        let body: Vec<Stmt> = self.block()?;
        let result: Expr = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after function result")?;

        debug!("Parsed function '{}' with {} params", name.lexeme, params.len());

        Ok(FunctionDecl {
            name: name.lexeme.to_string(),
            params,
            body,
            result,
            line: name.line,
        })
    }

    // ───────────────────────── statement rules ────────────────────

    /// Parses statements up to the closing `}`; the opening `{` has already
    /// been consumed.
    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            // empty statement
            if self.matches(TokenType::SEMICOLON) {
                continue;
            }

            statements.push(self.statement()?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block")?;

        Ok(statements)
    }

    fn statement(&mut self) -> Result<Stmt> {
        debug!("Entering statement at line {}", self.peek().line);

        if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.check(TokenType::IDENTIFIER) {
            self.identifier_statement()
        } else {
            Err(self.error_at_peek("Expected statement"))
        }
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'print'")?;
        let value: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after value")?;
        self.consume(TokenType::SEMICOLON, "Expected ';' after print")?;

        Ok(Stmt::Print(value))
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        let line = self.previous().line;

        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'if'")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        self.consume(TokenType::LEFT_BRACE, "Expected '{' after if condition")?;
        let then_branch: Vec<Stmt> = self.block()?;

        let else_branch: Option<Vec<Stmt>> = if self.matches(TokenType::ELSE) {
            self.consume(TokenType::LEFT_BRACE, "Expected '{' after 'else'")?;
            Some(self.block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            line,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        let line = self.previous().line;

        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before loop body")?;
        let body: Vec<Stmt> = self.block()?;

        Ok(Stmt::While {
            condition,
            body,
            line,
        })
    }

    /// Assignment, indexed assignment or call statement; all start with a name.
    fn identifier_statement(&mut self) -> Result<Stmt> {
        let name: &Token<'_> = self.advance();

        if self.matches(TokenType::EQUAL) {
            let value: Expr = self.expression()?;
            self.consume(TokenType::SEMICOLON, "Expected ';' after assignment")?;

            return Ok(Stmt::Assign {
                name: name.lexeme.to_string(),
                value,
                line: name.line,
            });
        }

        if self.matches(TokenType::LEFT_BRACKET) {
            let index: Expr = self.expression()?;
            self.consume(TokenType::RIGHT_BRACKET, "Expected ']' after index")?;
            self.consume(TokenType::EQUAL, "Expected '=' in indexed assignment")?;
            let value: Expr = self.expression()?;
            self.consume(TokenType::SEMICOLON, "Expected ';' after assignment")?;

            return Ok(Stmt::AssignIndex {
                name: name.lexeme.to_string(),
                index,
                value,
                line: name.line,
            });
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let call: Expr = self.finish_call(name)?;
            self.matches(TokenType::SEMICOLON);

            return Ok(Stmt::Call(call));
        }

        Err(self.error_at_peek("Expected '=', '[' or '(' after name"))
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.orelse()
    }

    fn orelse(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.andalso()?;

        while self.matches(TokenType::ORELSE) {
            let line = self.previous().line;
            let right: Expr = self.andalso()?;
            expr = binary(expr, BinaryOp::OrElse, right, line);
        }

        Ok(expr)
    }

    fn andalso(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.not()?;

        while self.matches(TokenType::ANDALSO) {
            let line = self.previous().line;
            let right: Expr = self.not()?;
            expr = binary(expr, BinaryOp::AndAlso, right, line);
        }

        Ok(expr)
    }

    fn not(&mut self) -> Result<Expr> {
        if self.matches(TokenType::NOT) {
            let line = self.previous().line;
            let right: Expr = self.not()?;

            return Ok(Expr::Unary {
                operator: UnaryOp::Not,
                right: Box::new(right),
                line,
            });
        }

        self.relation()
    }

    fn relation(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.cons()?;

        loop {
            let operator = match self.peek().token_type {
                TokenType::LESS => BinaryOp::Less,
                TokenType::LESS_EQUAL => BinaryOp::LessEqual,
                TokenType::EQUAL_EQUAL => BinaryOp::Equal,
                TokenType::LESS_GREATER => BinaryOp::NotEqual,
                TokenType::GREATER_EQUAL => BinaryOp::GreaterEqual,
                TokenType::GREATER => BinaryOp::Greater,
                _ => break,
            };

            let line = self.advance().line;
            let right: Expr = self.cons()?;
            expr = binary(expr, operator, right, line);
        }

        Ok(expr)
    }

    fn cons(&mut self) -> Result<Expr> {
        let expr: Expr = self.member()?;

        if self.matches(TokenType::COLON_COLON) {
            let line = self.previous().line;
            let right: Expr = self.cons()?;

            return Ok(binary(expr, BinaryOp::Cons, right, line));
        }

        Ok(expr)
    }

    fn member(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.additive()?;

        while self.matches(TokenType::IN) {
            let line = self.previous().line;
            let right: Expr = self.additive()?;
            expr = binary(expr, BinaryOp::In, right, line);
        }

        Ok(expr)
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.multiplicative()?;

        loop {
            let operator = match self.peek().token_type {
                TokenType::PLUS => BinaryOp::Plus,
                TokenType::MINUS => BinaryOp::Minus,
                _ => break,
            };

            let line = self.advance().line;
            let right: Expr = self.multiplicative()?;
            expr = binary(expr, operator, right, line);
        }

        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.exponent()?;

        loop {
            let operator = match self.peek().token_type {
                TokenType::STAR => BinaryOp::Times,
                TokenType::DIV => BinaryOp::IntDivide,
                TokenType::SLASH => BinaryOp::Divide,
                TokenType::MOD => BinaryOp::Modulus,
                _ => break,
            };

            let line = self.advance().line;
            let right: Expr = self.exponent()?;
            expr = binary(expr, operator, right, line);
        }

        Ok(expr)
    }

    fn exponent(&mut self) -> Result<Expr> {
        let expr: Expr = self.tuple_index()?;

        if self.matches(TokenType::STAR_STAR) {
            let line = self.previous().line;
            let right: Expr = self.exponent()?;

            return Ok(binary(expr, BinaryOp::Exponent, right, line));
        }

        Ok(expr)
    }

    fn tuple_index(&mut self) -> Result<Expr> {
        if self.matches(TokenType::HASH) {
            let line = self.previous().line;
            let position: Expr = self.unary()?;
            let tuple: Expr = self.unary()?;

            return Ok(Expr::TupleIndex {
                position: Box::new(position),
                tuple: Box::new(tuple),
                line,
            });
        }

        self.unary()
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::MINUS) {
            let line = self.previous().line;
            let right: Expr = self.unary()?;

            return Ok(Expr::Unary {
                operator: UnaryOp::Negate,
                right: Box::new(right),
                line,
            });
        }

        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        while self.matches(TokenType::LEFT_BRACKET) {
            let line = self.previous().line;
            let index: Expr = self.expression()?;
            self.consume(TokenType::RIGHT_BRACKET, "Expected ']' after index")?;

            expr = Expr::Index {
                target: Box::new(expr),
                index: Box::new(index),
                line,
            };
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::Bool(true)));
        }
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::Bool(false)));
        }

        match self.peek().token_type {
            TokenType::INTEGER(ref n) => {
                let n = n.clone();
                self.advance();
                return Ok(Expr::Literal(LiteralValue::Int(n)));
            }
            TokenType::REAL(n) => {
                self.advance();
                return Ok(Expr::Literal(LiteralValue::Real(n)));
            }
            TokenType::STRING(ref s) => {
                let s = s.clone();
                self.advance();
                return Ok(Expr::Literal(LiteralValue::Str(s)));
            }
            _ => {}
        }

        if self.matches(TokenType::IDENTIFIER) {
            let name: &Token<'_> = self.previous();

            if self.matches(TokenType::LEFT_PAREN) {
                return self.finish_call(name);
            }

            return Ok(Expr::Variable {
                name: name.lexeme.to_string(),
                line: name.line,
            });
        }

        if self.check(TokenType::NOT) {
            return self.not();
        }

        if self.matches(TokenType::LEFT_BRACKET) {
            let elements = self.elements(TokenType::RIGHT_BRACKET, "Expected ']' after list")?;

            return Ok(Expr::List(elements));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let first: Expr = self.expression()?;

            if self.matches(TokenType::COMMA) {
                let mut elements =
                    self.elements(TokenType::RIGHT_PAREN, "Expected ')' after tuple")?;
                elements.insert(0, first);

                return Ok(Expr::Tuple(elements));
            }

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            return Ok(first);
        }

        Err(self.error_at_peek("Expected expression"))
    }

    /// Parses the argument list of a call to `name`; `(` is already consumed.
    fn finish_call(&mut self, name: &Token<'_>) -> Result<Expr> {
        let arguments: Vec<Expr> =
            self.elements(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;

        Ok(Expr::Call {
            name: name.lexeme.to_string(),
            arguments,
            line: name.line,
        })
    }

    /// Comma separated expressions up to `close`, tolerating a trailing comma.
    fn elements(&mut self, close: TokenType, message: &str) -> Result<Vec<Expr>> {
        let mut elements: Vec<Expr> = Vec::new();

        while !self.check(close.clone()) {
            elements.push(self.expression()?);

            if !self.matches(TokenType::COMMA) {
                break;
            }
        }

        self.consume(close, message)?;

        Ok(elements)
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        debug!("consume failed at {:?}: {}", self.peek().token_type, message);

        Err(self.error_at_peek(message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current - 1]
    }

    fn error_at_peek(&self, message: &str) -> SbmlError {
        let token = self.peek();

        let at = if token.token_type == TokenType::EOF {
            "end".to_string()
        } else {
            format!("'{}'", token.lexeme)
        };

        SbmlError::syntax(token.line, format!("{} at {}", message, at))
    }
}

fn binary(left: Expr, operator: BinaryOp, right: Expr, line: usize) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        line,
    }
}

/// Scan and parse a complete program.
pub fn parse(src: &str) -> Result<Vec<Section>> {
    let tokens: Vec<Token<'_>> = scanner::tokenize(src)?;

    Parser::new(&tokens).parse()
}

/// Scan and parse a single expression.
pub fn parse_expression(src: &str) -> Result<Expr> {
    let tokens: Vec<Token<'_>> = scanner::tokenize(src)?;

    Parser::new(&tokens).parse_expression()
}
