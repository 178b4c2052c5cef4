//! Module `scanner` implements a one‑pass, streaming lexer for SBML.
//!
//! It transforms a source `&str` into a sequence of `Token<'a>`s, skipping
//! whitespace and emitting exactly one `EOF` token at the end. Designed as a
//! `FusedIterator`, it can be chained safely with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a str) -> Scanner<'a>`
//!   Create a new lexer over the input text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token<'a>>` on each `.next()`. The first `Err` is also the
//!   last item: lexing halts at an unrecognised character sequence.
//!
//! - `tokenize(src) -> Result<Vec<Token<'_>>>`
//!   Collects the whole stream, failing fast on the first error.
//!
//! # Token Recognition (`scan_token`)
//!
//! - Single‑character tokens: `(`, `)`, `[`, `]`, `{`, `}`, `,`, `;`, `#`, `+`, `-`, `/`.
//! - Multi‑character operators: `**`, `::`, `==`, `<=`, `<>`, `>=`.
//! - String literals: `'…'` or `"…"` on a single line, no escapes.
//! - Numeric literals, most specific form first: exponent (`1.5e-3`), real
//!   (`2.`, `.5`, `3.14`), integer (`42`).
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash `KEYWORDS` map.
//! - Errors: any unexpected byte yields `SbmlError::syntax(line, message)`.

use crate::error::{Result, SbmlError};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr2;
use num_bigint::BigInt;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"andalso" => TokenType::ANDALSO,
    b"orelse"  => TokenType::ORELSE,
    b"not"     => TokenType::NOT,
    b"mod"     => TokenType::MOD,
    b"in"      => TokenType::IN,
    b"div"     => TokenType::DIV,
    b"print"   => TokenType::PRINT,
    b"if"      => TokenType::IF,
    b"else"    => TokenType::ELSE,
    b"while"   => TokenType::WHILE,
    b"fun"     => TokenType::FUN,
    b"True"    => TokenType::TRUE,
    b"False"   => TokenType::FALSE,
};

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.  The lifetime `'a` ties every emitted token's
/// `lexeme` slice back to the original source buffer.
pub struct Scanner<'a> {
    src: &'a str,               // entire source text
    bytes: &'a [u8],            // same text, byte view for the hot path
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            bytes: src.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes[self.curr];
        self.curr += 1;
        b
    }

    /// Peek `offset` bytes ahead without consuming.  Returns `0` past EOF.
    #[inline(always)]
    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.curr + offset).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace is
    /// skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'[' => self.pending = Some(TokenType::LEFT_BRACKET),
            b']' => self.pending = Some(TokenType::RIGHT_BRACKET),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b',' => self.pending = Some(TokenType::COMMA),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b'#' => self.pending = Some(TokenType::HASH),
            b'+' => self.pending = Some(TokenType::PLUS),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'/' => self.pending = Some(TokenType::SLASH),

            // ── operators sharing a prefix (longest match wins) ─────────
            b'*' => {
                let tt = if self.match_byte(b'*') {
                    TokenType::STAR_STAR
                } else {
                    TokenType::STAR
                };

                self.pending = Some(tt);
            }

            b'=' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.pending = Some(tt);
            }

            b'<' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else if self.match_byte(b'>') {
                    TokenType::LESS_GREATER
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            b'>' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            b':' => {
                if !self.match_byte(b':') {
                    return Err(SbmlError::syntax(self.line, "Unexpected character: :"));
                }

                self.pending = Some(TokenType::COLON_COLON);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(());
            }

            b'\n' => {
                self.line += 1;

                return Ok(());
            }

            // ── string literal ' … ' or " … " ───────────────────────────
            b'"' | b'\'' => {
                return self.parse_string(b);
            }

            // ── number literal (digit‑ or dot‑leading) ──────────────────
            b'0'..=b'9' => {
                return self.parse_number();
            }

            b'.' if self.peek().is_ascii_digit() => {
                return self.parse_number();
            }

            // ── identifiers / keywords (alpha or underscore‑leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                let ch = self.src[self.start..].chars().next().unwrap_or('?');

                return Err(SbmlError::syntax(
                    self.line,
                    format!("Unexpected character: {}", ch),
                ));
            }
        }

        Ok(())
    }

    /// Parse a string literal delimited by `quote`.
    ///
    /// * `self.start` still points to the opening quote.
    /// * Strings end at the first matching quote and may not span lines.
    fn parse_string(&mut self, quote: u8) -> Result<()> {
        match memchr2(quote, b'\n', &self.bytes[self.curr..]) {
            Some(pos) if self.bytes[self.curr + pos] == quote => {
                self.curr += pos + 1; // consume through the closing quote
            }
            _ => {
                return Err(SbmlError::syntax(self.line, "Unterminated string."));
            }
        }

        let s: &str = &self.src[self.start + 1..self.curr - 1];

        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal. `self.start` points at its first byte, which
    /// is either a digit or a `.` followed by a digit.
    ///
    /// Exponent form requires a fractional digit (`1.5e3`); `2.` is a real,
    /// and `12` an integer.
    fn parse_number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let mut is_real = self.bytes[self.start] == b'.';
        let mut fraction_digits = is_real;

        if !is_real && self.peek() == b'.' {
            self.advance(); // consume "."
            is_real = true;
        }

        if is_real {
            while self.peek().is_ascii_digit() {
                self.advance();
                fraction_digits = true;
            }
        }

        if fraction_digits && self.peek() == b'e' {
            let exponent_start = if self.peek_at(1) == b'-' { 2 } else { 1 };

            if self.peek_at(exponent_start).is_ascii_digit() {
                for _ in 0..exponent_start {
                    self.advance();
                }

                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        let s: &str = &self.src[self.start..self.curr];

        let tt = if is_real {
            let n: f64 = s
                .parse::<f64>()
                .map_err(|e| SbmlError::syntax(self.line, format!("Invalid real {}: {}", s, e)))?;
            TokenType::REAL(n)
        } else {
            let n: BigInt = s.parse::<BigInt>().map_err(|e| {
                SbmlError::syntax(self.line, format!("Invalid integer {}: {}", s, e))
            })?;
            TokenType::INTEGER(n)
        };

        self.pending = Some(tt);

        Ok(())
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.bytes[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr <= self.len() {
            // 1. EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1;
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token; an error ends the stream.
            if let Err(e) = self.scan_token() {
                self.curr = self.len() + 1;
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                let lex: &str = &self.src[self.start..self.curr];
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, lex, self.line)));
            }
        }

        None
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan all of `src`, returning the full token stream (ending in `EOF`) or
/// the first lexical error.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>> {
    let tokens = Scanner::new(src).collect::<Result<Vec<_>>>()?;

    info!("Tokenized {} tokens", tokens.len());

    Ok(tokens)
}
