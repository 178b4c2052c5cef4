//! Interpreter for SBML, a small expression language with booleans,
//! integers, reals, strings, lists, tuples, conditionals, loops and
//! recursive functions.
//!
//! Source text flows through [`scanner`] → [`parser`] → [`interpreter`];
//! any failure surfaces as an [`SbmlError`] and halts the run.

pub mod ast;
pub mod ast_printer;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod operators;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use std::io::{self, Write};
use std::{panic, thread};

pub use error::{Result, SbmlError};
pub use interpreter::Interpreter;
pub use value::Value;

/// Parses `src` and runs it, writing `print` output to `out`.
///
/// Nothing is evaluated unless the whole program parses.  Output written
/// before a semantic error stays in `out`.
pub fn run_source<W: Write>(src: &str, out: &mut W) -> Result<()> {
    let sections = parser::parse(src)?;

    Interpreter::with_output(out).interpret(&sections)
}

/// Stack reserved for the thread that runs a program.  Every pending SBML
/// call holds several native frames, so the default main-thread stack runs
/// out after a few hundred nested calls.
pub const RUN_STACK_SIZE: usize = 512 * 1024 * 1024;

/// Runs `job` to completion on a scoped thread with [`RUN_STACK_SIZE`]
/// bytes of stack.  A panic in `job` is resumed on the calling thread.
pub fn with_run_stack<T, F>(job: F) -> io::Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("sbml-run".into())
            .stack_size(RUN_STACK_SIZE)
            .spawn_scoped(scope, job)?;

        Ok(handle
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload)))
    })
}
