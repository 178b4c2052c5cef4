use std::collections::HashMap;
use std::io::{self, Stdout, Write};

use log::{debug, info};

use crate::ast::{Expr, FunctionDecl, LiteralValue, Section, Stmt};
use crate::environment::Environment;
use crate::error::{Result, SbmlError};
use crate::operators;
use crate::value::Value;

/// Tree‑walking evaluator.
///
/// Holds all mutable program state: the [`Environment`] (globals plus call
/// frames), the function table, and the sink `print` writes to.  Function
/// definitions borrow their declaration from the parsed program, hence the
/// `'p` lifetime.
pub struct Interpreter<'p, W: Write = Stdout> {
    environment: Environment,
    functions: HashMap<String, &'p FunctionDecl>,
    out: W,
}

impl<'p> Interpreter<'p, Stdout> {
    /// Creates an interpreter that prints to standard output.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl<'p> Default for Interpreter<'p, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p, W: Write> Interpreter<'p, W> {
    /// Creates an interpreter that prints to `out`.
    pub fn with_output(out: W) -> Self {
        info!("Initializing Interpreter");

        Self {
            environment: Environment::new(),
            functions: HashMap::new(),
            out,
        }
    }

    /// Runs every section in order, stopping at the first error.
    pub fn interpret(&mut self, sections: &'p [Section]) -> Result<()> {
        debug!("Interpreting {} sections", sections.len());

        for section in sections {
            self.run_section(section)?;
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");

        Ok(())
    }

    /// Runs one top‑level section: a block is executed, a function
    /// definition is registered (redefinition overwrites).
    pub fn run_section(&mut self, section: &'p Section) -> Result<()> {
        match section {
            Section::Block(statements) => self.execute_block(statements),

            Section::Function(decl) => {
                debug!("Defining function '{}'", decl.name);

                self.functions.insert(decl.name.clone(), decl);

                info!(
                    "Function '{}' defined with {} parameters",
                    decl.name,
                    decl.params.len()
                );

                Ok(())
            }
        }
    }

    pub fn execute_block(&mut self, statements: &[Stmt]) -> Result<()> {
        for stmt in statements {
            self.execute(stmt)?;
        }

        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(())
            }

            Stmt::Assign { name, value, .. } => {
                let value = self.evaluate(value)?;
                debug!("Assigning {} to '{}'", value, name);
                self.environment.assign(name, value);
                Ok(())
            }

            Stmt::AssignIndex {
                name,
                index,
                value,
                line,
            } => {
                let value = self.evaluate(value)?;
                let index = self.evaluate(index)?;
                let target = self.environment.get(name, *line)?;
                operators::set_index(target, &index, value, *line)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                line,
            } => {
                if self.guard(condition, *line)? {
                    debug!("Condition is true; executing then branch");
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    debug!("Condition is false; executing else branch");
                    self.execute_block(else_branch)
                } else {
                    Ok(())
                }
            }

            Stmt::While {
                condition,
                body,
                line,
            } => {
                debug!("Entering while loop");
                while self.guard(condition, *line)? {
                    self.execute_block(body)?;
                }
                debug!("Exited while loop");
                Ok(())
            }

            Stmt::Block(statements) => self.execute_block(statements),

            Stmt::Call(expr) => {
                let value = self.evaluate(expr)?;
                debug!("Discarding call result {}", value);
                Ok(())
            }
        }
    }

    /// Evaluates an expression, children first.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Int(n) => Value::Int(n.clone()),
                LiteralValue::Real(n) => Value::Real(*n),
                LiteralValue::Str(s) => Value::Str(s.clone()),
            }),

            Expr::Unary {
                operator,
                right,
                line,
            } => {
                let right = self.evaluate(right)?;
                operators::unary(*operator, right, *line)
            }

            Expr::Binary {
                left,
                operator,
                right,
                line,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                operators::binary(*operator, left, right, *line)
            }

            Expr::List(elements) => Ok(Value::list(self.evaluate_all(elements)?)),

            Expr::Tuple(elements) => Ok(Value::Tuple(self.evaluate_all(elements)?)),

            Expr::Index {
                target,
                index,
                line,
            } => {
                let target = self.evaluate(target)?;
                let index = self.evaluate(index)?;
                operators::index(&target, &index, *line)
            }

            Expr::TupleIndex {
                position,
                tuple,
                line,
            } => {
                let position = self.evaluate(position)?;
                let tuple = self.evaluate(tuple)?;
                operators::tuple_index(&position, &tuple, *line)
            }

            Expr::Variable { name, line } => {
                let value = self.environment.get(name, *line)?.clone();
                debug!("Variable '{}' evaluated to: {}", name, value);
                Ok(value)
            }

            Expr::Call {
                name,
                arguments,
                line,
            } => self.call(name, arguments, *line),
        }
    }

    /// Calls a user function.
    ///
    /// Arguments are evaluated in the caller's environment, then the name and
    /// arity are checked.  The parameters live in a fresh frame for the
    /// duration of the body and the result expression; the frame is popped
    /// whether or not evaluation succeeded.
    fn call(&mut self, name: &str, arguments: &[Expr], line: usize) -> Result<Value> {
        let args: Vec<Value> = self.evaluate_all(arguments)?;

        let function: &'p FunctionDecl = self.functions.get(name).copied().ok_or_else(|| {
            SbmlError::semantic(format!("Undefined function '{}'. [line {}]", name, line))
        })?;

        if function.params.len() != args.len() {
            return Err(SbmlError::semantic(format!(
                "Function '{}' (defined on line {}) expects {} arguments but got {}. [line {}]",
                name,
                function.line,
                function.params.len(),
                args.len(),
                line
            )));
        }

        debug!("Calling '{}' at depth {}", name, self.environment.depth());

        self.environment
            .push_frame(name, function.params.iter().cloned().zip(args));

        let result = self
            .execute_block(&function.body)
            .and_then(|()| self.evaluate(&function.result));

        self.environment.pop_frame();

        if let Ok(value) = &result {
            debug!("Function '{}' returned: {}", name, value);
        }

        result
    }

    fn evaluate_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>> {
        exprs.iter().map(|expr| self.evaluate(expr)).collect()
    }

    /// `if`/`while` conditions must evaluate to a boolean.
    fn guard(&mut self, condition: &Expr, line: usize) -> Result<bool> {
        match self.evaluate(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(SbmlError::semantic(format!(
                "Condition must be a boolean, got {}. [line {}]",
                other.type_name(),
                line
            ))),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Gives back the output sink, e.g. to inspect captured output.
    pub fn into_output(self) -> W {
        self.out
    }
}
