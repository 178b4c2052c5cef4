use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Backing store of a list.  Copying a list value copies the handle, so
/// every name bound to it sees element assignments made through any other.
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// A runtime value.  There is no implicit conversion between variants;
/// every operator decides which combinations it accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(BigInt),
    Real(f64),
    Str(String),
    List(ListRef),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn int(n: impl Into<BigInt>) -> Self {
        Value::Int(n.into())
    }

    /// A fresh list that shares nothing with any existing one.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// Name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Numeric view for mixed integer/real arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => n.to_f64(),
            Value::Real(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Real(_))
    }

    /// `nested` selects the form used for elements of a list or tuple,
    /// where strings appear quoted.  `open` holds the lists currently being
    /// written; meeting one of them again prints `[...]`.
    fn write(
        &self,
        f: &mut fmt::Formatter<'_>,
        nested: bool,
        open: &mut Vec<*const RefCell<Vec<Value>>>,
    ) -> fmt::Result {
        match self {
            Value::Bool(true) => f.write_str("True"),

            Value::Bool(false) => f.write_str("False"),

            Value::Int(n) => match n.to_i64() {
                Some(small) => {
                    let mut buf: itoa::Buffer = itoa::Buffer::new();
                    f.write_str(buf.format(small))
                }
                None => write!(f, "{}", n),
            },

            Value::Real(n) => write_real(f, *n),

            Value::Str(s) if nested => write_quoted(f, s),

            Value::Str(s) => f.write_str(s),

            Value::List(items) => {
                let id = Rc::as_ptr(items);

                if open.contains(&id) {
                    return f.write_str("[...]");
                }

                open.push(id);
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write(f, true, open)?;
                }
                open.pop();
                f.write_str("]")
            }

            Value::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write(f, true, open)?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, false, &mut Vec::new())
    }
}

/// Reals always show a fractional part or an exponent: `3.0`, `3.5`,
/// `1e-05`, `1.5e+16`.
fn write_real(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("nan");
    }

    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "inf" } else { "-inf" });
    }

    let magnitude = n.abs();

    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", n);

        // `{:e}` always contains an exponent marker
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };

        return write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    if n.fract() == 0.0 {
        write!(f, "{:.1}", n)
    } else {
        write!(f, "{}", n)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    write!(f, "{}", quote)?;
    for c in s.chars() {
        if c == quote || c == '\\' {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, "{}", quote)
}
