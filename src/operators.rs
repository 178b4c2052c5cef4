//! Operator semantics.
//!
//! Every operator's legal operand types are decided here, by an exhaustive
//! match on the evaluated operands.  The interpreter only walks the tree and
//! hands finished values over.

use std::cmp::Ordering;

use log::debug;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::ast::{BinaryOp, UnaryOp};
use crate::error::{Result, SbmlError};
use crate::value::Value;

/// Applies `op` to two already evaluated operands.
pub fn binary(op: BinaryOp, left: Value, right: Value, line: usize) -> Result<Value> {
    debug!("Applying {} to {} and {}", op, left.type_name(), right.type_name());

    match op {
        BinaryOp::Plus => plus(left, right, line),
        BinaryOp::Minus => arithmetic(op, left, right, line, |a, b| a - b, |a, b| a - b),
        BinaryOp::Times => arithmetic(op, left, right, line, |a, b| a * b, |a, b| a * b),
        BinaryOp::Divide => divide(left, right, line),
        BinaryOp::IntDivide => int_divide(left, right, line),
        BinaryOp::Modulus => modulus(left, right, line),
        BinaryOp::Exponent => exponent(left, right, line),

        BinaryOp::AndAlso => match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a && b)),
            (a, b) => Err(mismatch(op, &a, &b, line)),
        },
        BinaryOp::OrElse => match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a || b)),
            (a, b) => Err(mismatch(op, &a, &b, line)),
        },

        BinaryOp::Less => compare(op, &left, &right, line).map(|o| Value::Bool(o.is_lt())),
        BinaryOp::LessEqual => compare(op, &left, &right, line).map(|o| Value::Bool(o.is_le())),
        BinaryOp::Greater => compare(op, &left, &right, line).map(|o| Value::Bool(o.is_gt())),
        BinaryOp::GreaterEqual => {
            compare(op, &left, &right, line).map(|o| Value::Bool(o.is_ge()))
        }

        BinaryOp::Equal => equals(op, &left, &right, line).map(Value::Bool),
        BinaryOp::NotEqual => equals(op, &left, &right, line).map(|eq| Value::Bool(!eq)),

        BinaryOp::Cons => match (left, right) {
            (head, Value::List(tail)) => {
                let tail = tail.borrow();
                let mut items = Vec::with_capacity(tail.len() + 1);
                items.push(head);
                items.extend(tail.iter().cloned());
                Ok(Value::list(items))
            }
            (a, b) => Err(mismatch(op, &a, &b, line)),
        },

        BinaryOp::In => match (&left, &right) {
            (needle, Value::List(items)) => Ok(Value::Bool(
                items.borrow().iter().any(|item| structurally_equal(needle, item)),
            )),
            (Value::Str(needle), Value::Str(haystack)) => {
                Ok(Value::Bool(haystack.contains(needle.as_str())))
            }
            (a, b) => Err(mismatch(op, a, b, line)),
        },
    }
}

/// Applies a prefix operator.
pub fn unary(op: UnaryOp, operand: Value, line: usize) -> Result<Value> {
    match (op, operand) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Negate, Value::Int(n)) => Ok(Value::Int(-n)),
        (UnaryOp::Negate, Value::Real(n)) => Ok(Value::Real(-n)),
        (op, v) => Err(SbmlError::semantic(format!(
            "Cannot apply '{}' to {}. [line {}]",
            op,
            v.type_name(),
            line
        ))),
    }
}

/// `target[index]`, 0‑based, on a list, tuple or string.
pub fn index(target: &Value, index: &Value, line: usize) -> Result<Value> {
    let i = as_index(index, line)?.ok_or_else(|| out_of_range(index, line))?;

    match target {
        Value::List(items) => items
            .borrow()
            .get(i)
            .cloned()
            .ok_or_else(|| out_of_range(index, line)),

        Value::Tuple(items) => items
            .get(i)
            .cloned()
            .ok_or_else(|| out_of_range(index, line)),

        Value::Str(s) => s
            .chars()
            .nth(i)
            .map(|c| Value::Str(c.to_string()))
            .ok_or_else(|| out_of_range(index, line)),

        other => Err(SbmlError::semantic(format!(
            "Cannot index into {}. [line {}]",
            other.type_name(),
            line
        ))),
    }
}

/// `target[index] = value` on a list.  The element is replaced in the
/// list's shared storage, so every alias of the list observes it.
pub fn set_index(target: &Value, index: &Value, value: Value, line: usize) -> Result<()> {
    let i = as_index(index, line)?;

    match target {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let slot = i
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| out_of_range(index, line))?;
            *slot = value;
            Ok(())
        }

        other => Err(SbmlError::semantic(format!(
            "Cannot assign an element of {}. [line {}]",
            other.type_name(),
            line
        ))),
    }
}

/// `#position tuple`, 1‑based.
pub fn tuple_index(position: &Value, tuple: &Value, line: usize) -> Result<Value> {
    match (position, tuple) {
        (Value::Int(p), Value::Tuple(items)) => p
            .to_usize()
            .and_then(|p| p.checked_sub(1))
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or_else(|| out_of_range(position, line)),

        (p, t) => Err(SbmlError::semantic(format!(
            "Tuple index needs an integer and a tuple, got {} and {}. [line {}]",
            p.type_name(),
            t.type_name(),
            line
        ))),
    }
}

/// Structural equality used by `in`; numbers compare across integer/real,
/// mismatched types are simply unequal.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (x, y) if x.is_numeric() && y.is_numeric() => x.as_f64() == y.as_f64(),
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(xs), Value::List(ys)) => all_equal(&xs.borrow(), &ys.borrow()),
        (Value::Tuple(xs), Value::Tuple(ys)) => all_equal(xs, ys),
        _ => false,
    }
}

fn all_equal(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
}

// ───────────────────────────── arithmetic ─────────────────────────────

/// `+` builds a new string, list or tuple; the operands are left untouched.
fn plus(left: Value, right: Value, line: usize) -> Result<Value> {
    match (left, right) {
        (Value::Str(mut a), Value::Str(b)) => {
            a.push_str(&b);
            Ok(Value::Str(a))
        }
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (Value::Tuple(mut a), Value::Tuple(b)) => {
            a.extend(b);
            Ok(Value::Tuple(a))
        }
        (a, b) => arithmetic(BinaryOp::Plus, a, b, line, |a, b| a + b, |a, b| a + b),
    }
}

/// Integer op when both sides are integers, real op when at least one is a
/// real, error otherwise.
fn arithmetic(
    op: BinaryOp,
    left: Value,
    right: Value,
    line: usize,
    int_op: fn(&BigInt, &BigInt) -> BigInt,
    real_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(a, b))),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Real(real_op(a, b))),
            _ => Err(mismatch(op, &left, &right, line)),
        },
    }
}

fn divide(left: Value, right: Value, line: usize) -> Result<Value> {
    match (left.as_f64(), right.as_f64()) {
        (Some(_), Some(b)) if b == 0.0 => Err(division_by_zero(line)),
        (Some(a), Some(b)) => Ok(Value::Real(a / b)),
        _ => Err(mismatch(BinaryOp::Divide, &left, &right, line)),
    }
}

/// Truncates toward zero.
fn int_divide(left: Value, right: Value, line: usize) -> Result<Value> {
    match (left, right) {
        (Value::Int(_), Value::Int(b)) if b.is_zero() => Err(division_by_zero(line)),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a / b)),
        (a, b) => Err(mismatch(BinaryOp::IntDivide, &a, &b, line)),
    }
}

/// The result takes the sign of the divisor: `-7 mod 2 == 1`.
fn modulus(left: Value, right: Value, line: usize) -> Result<Value> {
    match (left, right) {
        (Value::Int(_), Value::Int(b)) if b.is_zero() => Err(division_by_zero(line)),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.mod_floor(&b))),
        (a, b) => Err(mismatch(BinaryOp::Modulus, &a, &b, line)),
    }
}

/// Integer result for a non‑negative integer exponent, real otherwise.
fn exponent(left: Value, right: Value, line: usize) -> Result<Value> {
    if let (Value::Int(base), Value::Int(exp)) = (&left, &right) {
        if !exp.is_negative() {
            return int_power(base, exp, line).map(Value::Int);
        }
    }

    let (base, exp) = match (left.as_f64(), right.as_f64()) {
        (Some(base), Some(exp)) => (base, exp),
        _ => return Err(mismatch(BinaryOp::Exponent, &left, &right, line)),
    };

    if base == 0.0 && exp < 0.0 {
        return Err(division_by_zero(line));
    }

    let result = base.powf(exp);

    if result.is_nan() && !base.is_nan() && !exp.is_nan() {
        return Err(SbmlError::semantic(format!(
            "Negative base with fractional exponent has no real result. [line {}]",
            line
        )));
    }

    Ok(Value::Real(result))
}

/// `base ** exp` for `exp >= 0`.  Exponents past `u32::MAX` are only
/// computable for the bases 0, 1 and -1.
fn int_power(base: &BigInt, exp: &BigInt, line: usize) -> Result<BigInt> {
    if let Some(exp) = exp.to_u32() {
        return Ok(base.pow(exp));
    }

    match base.to_i8() {
        Some(0) => Ok(BigInt::zero()),
        Some(1) => Ok(BigInt::from(1)),
        Some(-1) if exp.is_even() => Ok(BigInt::from(1)),
        Some(-1) => Ok(BigInt::from(-1)),
        _ => Err(SbmlError::semantic(format!(
            "Exponent {} is too large. [line {}]",
            exp, line
        ))),
    }
}

// ───────────────────────────── comparison ─────────────────────────────

/// Ordering for `<`, `<=`, `>`, `>=`: numbers with numbers, strings with
/// strings.
fn compare(op: BinaryOp, left: &Value, right: &Value, line: usize) -> Result<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (a, b) if a.is_numeric() && b.is_numeric() => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .ok_or_else(|| mismatch(op, a, b, line)),
        (a, b) => Err(mismatch(op, a, b, line)),
    }
}

/// `==` / `<>`: both operands must share a type (integer and real count as
/// one numeric type); the comparison itself is structural.
fn equals(op: BinaryOp, left: &Value, right: &Value, line: usize) -> Result<bool> {
    let same_type = (left.is_numeric() && right.is_numeric())
        || std::mem::discriminant(left) == std::mem::discriminant(right);

    if !same_type {
        return Err(mismatch(op, left, right, line));
    }

    Ok(structurally_equal(left, right))
}

// ───────────────────────────── helpers ────────────────────────────────

/// `Ok(None)` for a negative integer, which is always out of range.
fn as_index(index: &Value, line: usize) -> Result<Option<usize>> {
    match index {
        Value::Int(i) => Ok(i.to_usize()),
        other => Err(SbmlError::semantic(format!(
            "Index must be an integer, got {}. [line {}]",
            other.type_name(),
            line
        ))),
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value, line: usize) -> SbmlError {
    SbmlError::semantic(format!(
        "Cannot apply '{}' to {} and {}. [line {}]",
        op,
        left.type_name(),
        right.type_name(),
        line
    ))
}

fn division_by_zero(line: usize) -> SbmlError {
    SbmlError::semantic(format!("Division by zero. [line {}]", line))
}

fn out_of_range(index: &Value, line: usize) -> SbmlError {
    SbmlError::semantic(format!("Index {} out of range. [line {}]", index, line))
}
