//! Indented tree dump of a parsed program, one node label per line and one
//! tab per nesting level.  The depth is threaded through the recursion, so
//! nodes need no parent links.

use std::fmt::Write;

use crate::ast::{Expr, LiteralValue, Section, Stmt, UnaryOp};

pub fn render_program(sections: &[Section]) -> String {
    let mut out = String::new();

    for section in sections {
        render_section(section, 0, &mut out);
    }

    out
}

pub fn render_section(section: &Section, depth: usize, out: &mut String) {
    match section {
        Section::Block(statements) => {
            line(out, depth, "Block");
            for stmt in statements {
                render_stmt(stmt, depth + 1, out);
            }
        }

        Section::Function(decl) => {
            line(
                out,
                depth,
                &format!("FunctionDef: {}({})", decl.name, decl.params.join(", ")),
            );
            line(out, depth + 1, "Block");
            for stmt in &decl.body {
                render_stmt(stmt, depth + 2, out);
            }
            render_expr(&decl.result, depth + 1, out);
        }
    }
}

pub fn render_stmt(stmt: &Stmt, depth: usize, out: &mut String) {
    match stmt {
        Stmt::Print(expr) => {
            line(out, depth, "Print");
            render_expr(expr, depth + 1, out);
        }

        Stmt::Assign { name, value, .. } => {
            line(out, depth, "Assignment");
            line(out, depth + 1, &format!("Variable: {}", name));
            render_expr(value, depth + 1, out);
        }

        Stmt::AssignIndex {
            name, index, value, ..
        } => {
            line(out, depth, "Assignment");
            line(out, depth + 1, "Index");
            line(out, depth + 2, &format!("Variable: {}", name));
            render_expr(index, depth + 2, out);
            render_expr(value, depth + 1, out);
        }

        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            let label = if else_branch.is_some() {
                "ConditionalElse"
            } else {
                "Conditional"
            };

            line(out, depth, label);
            render_expr(condition, depth + 1, out);
            render_block(then_branch, depth + 1, out);
            if let Some(else_branch) = else_branch {
                render_block(else_branch, depth + 1, out);
            }
        }

        Stmt::While {
            condition, body, ..
        } => {
            line(out, depth, "Loop");
            render_expr(condition, depth + 1, out);
            render_block(body, depth + 1, out);
        }

        Stmt::Block(statements) => render_block(statements, depth, out),

        Stmt::Call(expr) => render_expr(expr, depth, out),
    }
}

pub fn render_expr(expr: &Expr, depth: usize, out: &mut String) {
    match expr {
        Expr::Literal(literal) => {
            let label = match literal {
                LiteralValue::Bool(true) => "True".to_string(),
                LiteralValue::Bool(false) => "False".to_string(),
                LiteralValue::Int(n) => format!("Number: {}", n),
                LiteralValue::Real(n) => format!("Real: {:?}", n),
                LiteralValue::Str(s) => format!("String: {}", s),
            };
            line(out, depth, &label);
        }

        Expr::Unary {
            operator, right, ..
        } => {
            let label = match operator {
                UnaryOp::Not => "Not",
                UnaryOp::Negate => "Uminus",
            };
            line(out, depth, label);
            render_expr(right, depth + 1, out);
        }

        Expr::Binary {
            left,
            operator,
            right,
            ..
        } => {
            line(out, depth, operator.label());
            render_expr(left, depth + 1, out);
            render_expr(right, depth + 1, out);
        }

        Expr::List(elements) => {
            line(out, depth, "List");
            for element in elements {
                render_expr(element, depth + 1, out);
            }
        }

        Expr::Tuple(elements) => {
            line(out, depth, "Tuple");
            for element in elements {
                render_expr(element, depth + 1, out);
            }
        }

        Expr::Index { target, index, .. } => {
            line(out, depth, "Index");
            render_expr(target, depth + 1, out);
            render_expr(index, depth + 1, out);
        }

        Expr::TupleIndex {
            position, tuple, ..
        } => {
            line(out, depth, "TupleIndex");
            render_expr(position, depth + 1, out);
            render_expr(tuple, depth + 1, out);
        }

        Expr::Variable { name, .. } => line(out, depth, &format!("Variable: {}", name)),

        Expr::Call {
            name, arguments, ..
        } => {
            line(out, depth, &format!("FunctionCall: {}", name));
            for argument in arguments {
                render_expr(argument, depth + 1, out);
            }
        }
    }
}

fn render_block(statements: &[Stmt], depth: usize, out: &mut String) {
    line(out, depth, "Block");
    for stmt in statements {
        render_stmt(stmt, depth + 1, out);
    }
}

fn line(out: &mut String, depth: usize, label: &str) {
    for _ in 0..depth {
        out.push('\t');
    }
    // writing to a String cannot fail
    let _ = writeln!(out, "{}", label);
}
