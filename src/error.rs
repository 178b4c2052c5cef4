//! Centralised error hierarchy for the **SBML interpreter**.
//!
//! The language only knows two failure kinds: a *syntax* error raised by the
//! scanner or parser, and a *semantic* error raised while evaluating.  Both
//! halt the run.  I/O and UTF‑8 failures only occur at the binary boundary
//! and are wrapped transparently so `?` works there too.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SbmlError {
    /// Lexical or grammatical failure, with the offending source line.
    #[error("[line {line}] Syntax error: {message}")]
    Syntax {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Runtime evaluation failure (type mismatch, bad index, arity, ...).
    #[error("Semantic error: {message}")]
    Semantic { message: String },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl SbmlError {
    /// Helper constructor for the **scanner** and **parser**.
    pub fn syntax<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Syntax error: line={}, msg={}", line, message);

        SbmlError::Syntax { message, line }
    }

    /// Helper constructor for the **interpreter**.
    pub fn semantic<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Semantic error: msg={}", message);

        SbmlError::Semantic { message }
    }

    /// The fixed diagnostic the CLI prints when a run halts.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            SbmlError::Syntax { .. } => "SYNTAX ERROR",
            SbmlError::Semantic { .. } => "SEMANTIC ERROR",
            SbmlError::Io(_) | SbmlError::Utf8(_) => "IO ERROR",
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, SbmlError::Syntax { .. })
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, SbmlError::Semantic { .. })
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, SbmlError>;
