use super::parser::{BinaryOp, Expr, UnaryOp};
use crate::{Error, Result, Scope, Value};

use std::{borrow::Cow, cmp::Ordering};

/// Evaluation context: the source text is kept for error messages.
pub(crate) struct Eval<'a> {
    pub(crate) src: &'a str,
    pub(crate) scope: &'a Scope,
}

impl<'a> Eval<'a> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::expression_evaluation_failed(self.src, message)
    }

    /// `None` means the expression refers to something that is not bound.
    pub(crate) fn eval(&self, expr: &Expr) -> Result<Option<Value>> {
        Ok(self.resolve(expr)?.map(Cow::into_owned))
    }

    /// Like [`Eval::eval`] but paths into the scope are borrowed, not cloned.
    fn resolve(&self, expr: &Expr) -> Result<Option<Cow<'a, Value>>> {
        match expr {
            Expr::Lit(value) => Ok(Some(Cow::Owned(value.clone()))),
            Expr::Ident(name) => Ok(self.scope.get(name).map(Cow::Borrowed)),
            Expr::Field(base, field) => match self.resolve(base)? {
                None => Ok(None),
                Some(Cow::Borrowed(base)) => match base {
                    Value::Null => Ok(None),
                    Value::Map(map) => Ok(map.get(field).map(Cow::Borrowed)),
                    other => Err(self.no_field(field, other)),
                },
                Some(Cow::Owned(base)) => match base {
                    Value::Null => Ok(None),
                    Value::Map(mut map) => Ok(map.shift_remove(field).map(Cow::Owned)),
                    other => Err(self.no_field(field, &other)),
                },
            },
            Expr::Index(base, index) => {
                let Some(base) = self.resolve(base)? else {
                    return Ok(None);
                };
                let index = self.eval(index)?.unwrap_or(Value::Null);
                match base {
                    Cow::Borrowed(base) => self.index(base, &index).map(|v| v.map(Cow::Borrowed)),
                    Cow::Owned(base) => self
                        .index(&base, &index)
                        .map(|v| v.cloned().map(Cow::Owned)),
                }
            }
            Expr::Unary(op, operand) => {
                let operand = self.eval(operand)?;
                match (op, operand) {
                    (UnaryOp::Not, operand) => Ok(owned(Value::Bool(!self.truthy(operand)?))),
                    (UnaryOp::Neg, Some(Value::I64(v))) => v
                        .checked_neg()
                        .map(|v| owned(Value::I64(v)))
                        .ok_or_else(|| self.error("integer overflow")),
                    (UnaryOp::Neg, Some(Value::F64(v))) => Ok(owned(Value::F64(-v))),
                    (UnaryOp::Neg, other) => Err(self.error(format!(
                        "cannot negate {}",
                        describe(other.as_ref())
                    ))),
                }
            }
            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                if !self.truthy(self.eval(lhs)?)? {
                    return Ok(owned(Value::Bool(false)));
                }
                Ok(owned(Value::Bool(self.truthy(self.eval(rhs)?)?)))
            }
            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                if self.truthy(self.eval(lhs)?)? {
                    return Ok(owned(Value::Bool(true)));
                }
                Ok(owned(Value::Bool(self.truthy(self.eval(rhs)?)?)))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.binary(*op, lhs, rhs).map(owned)
            }
            Expr::Call(name, args) => Ok(self.call(name, args)?.map(Cow::Owned)),
        }
    }

    fn index<'v>(&self, base: &'v Value, index: &Value) -> Result<Option<&'v Value>> {
        match (base, index) {
            (Value::Null, _) => Ok(None),
            (Value::List(items), Value::I64(i)) => {
                let len = items.len() as i64;
                let pos = if *i < 0 { len + i } else { *i };
                if pos < 0 || pos >= len {
                    return Err(self.error(format!(
                        "index out of range: {i} (length {len})"
                    )));
                }
                Ok(items.get(pos as usize))
            }
            (Value::Map(map), Value::String(key)) => Ok(map.get(key)),
            (base, index) => Err(self.error(format!(
                "cannot index {} with {}",
                base.type_name(),
                index.type_name()
            ))),
        }
    }

    fn no_field(&self, field: &str, base: &Value) -> Error {
        self.error(format!(
            "cannot access field `{field}` on {}",
            base.type_name()
        ))
    }

    /// Logical operands: booleans as-is, null and undefined as false.
    fn truthy(&self, value: Option<Value>) -> Result<bool> {
        match value {
            Some(Value::Bool(v)) => Ok(v),
            None | Some(Value::Null) => Ok(false),
            Some(other) => Err(self.error(format!(
                "expected a boolean, found {}",
                other.type_name()
            ))),
        }
    }

    fn binary(&self, op: BinaryOp, lhs: Option<Value>, rhs: Option<Value>) -> Result<Value> {
        match op {
            BinaryOp::Eq => return Ok(Value::Bool(loose_eq(lhs.as_ref(), rhs.as_ref()))),
            BinaryOp::Ne => return Ok(Value::Bool(!loose_eq(lhs.as_ref(), rhs.as_ref()))),
            BinaryOp::In => return self.contains(lhs, rhs).map(Value::Bool),
            _ => {}
        }

        let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
            return Err(self.error(format!("operator `{}` applied to undefined", op.as_str())));
        };

        match op {
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let Some(ordering) = compare(&lhs, &rhs) else {
                    return Err(self.mismatch(op, &lhs, &rhs));
                };
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::Le => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }))
            }
            BinaryOp::Add => match (lhs, rhs) {
                (Value::String(mut a), Value::String(b)) => {
                    a.push_str(&b);
                    Ok(Value::String(a))
                }
                (lhs, rhs) => self.arith(op, lhs, rhs),
            },
            _ => self.arith(op, lhs, rhs),
        }
    }

    fn arith(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
        match (&lhs, &rhs) {
            (Value::I64(a), Value::I64(b)) => {
                let (a, b) = (*a, *b);
                let res = match op {
                    BinaryOp::Add => a.checked_add(b),
                    BinaryOp::Sub => a.checked_sub(b),
                    BinaryOp::Mul => a.checked_mul(b),
                    BinaryOp::Div => return Ok(Value::F64(a as f64 / b as f64)),
                    BinaryOp::Rem if b == 0 => return Err(self.error("modulo by zero")),
                    BinaryOp::Rem => a.checked_rem(b),
                    _ => return Err(self.mismatch(op, &lhs, &rhs)),
                };
                res.map(Value::I64)
                    .ok_or_else(|| self.error("integer overflow"))
            }
            _ => {
                let (Some(a), Some(b)) = (as_f64(&lhs), as_f64(&rhs)) else {
                    return Err(self.mismatch(op, &lhs, &rhs));
                };
                Ok(Value::F64(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    _ => return Err(self.mismatch(op, &lhs, &rhs)),
                }))
            }
        }
    }

    fn contains(&self, needle: Option<Value>, haystack: Option<Value>) -> Result<bool> {
        match haystack {
            None | Some(Value::Null) => Ok(false),
            Some(Value::List(items)) => Ok(items
                .iter()
                .any(|item| loose_eq(Some(item), needle.as_ref()))),
            Some(Value::Map(map)) => match needle {
                Some(Value::String(key)) => Ok(map.contains_key(&key)),
                _ => Ok(false),
            },
            Some(Value::String(s)) => match needle {
                Some(Value::String(sub)) => Ok(s.contains(&sub)),
                _ => Ok(false),
            },
            Some(other) => Err(self.error(format!(
                "operator `in` not defined on {}",
                other.type_name()
            ))),
        }
    }

    fn call(&self, name: &str, args: &[Expr]) -> Result<Option<Value>> {
        match (name, args) {
            ("len", [arg]) => {
                let len = match self.eval(arg)? {
                    None | Some(Value::Null) => 0,
                    Some(Value::String(s)) => s.chars().count(),
                    Some(Value::List(items)) => items.len(),
                    Some(Value::Map(map)) => map.len(),
                    Some(Value::Bytes(bytes)) => bytes.len(),
                    Some(other) => {
                        return Err(self.error(format!(
                            "len() not defined on {}",
                            other.type_name()
                        )))
                    }
                };
                Ok(Some(Value::I64(len as i64)))
            }
            ("len", _) => Err(self.error("len() takes exactly one argument")),
            _ => Err(self.error(format!("unknown function `{name}`"))),
        }
    }

    fn mismatch(&self, op: BinaryOp, lhs: &Value, rhs: &Value) -> Error {
        self.error(format!(
            "invalid operation: {} {} {}",
            lhs.type_name(),
            op.as_str(),
            rhs.type_name()
        ))
    }
}

fn owned<'a>(value: Value) -> Option<Cow<'a, Value>> {
    Some(Cow::Owned(value))
}

fn describe(value: Option<&Value>) -> &'static str {
    value.map(Value::type_name).unwrap_or("undefined")
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::I64(v) => Some(*v as f64),
        Value::F64(v) => Some(*v),
        _ => None,
    }
}

/// Equality where undefined equals null and integers compare with floats.
fn loose_eq(lhs: Option<&Value>, rhs: Option<&Value>) -> bool {
    let lhs = lhs.unwrap_or(&Value::Null);
    let rhs = rhs.unwrap_or(&Value::Null);

    match (lhs, rhs) {
        (Value::I64(a), Value::F64(b)) | (Value::F64(b), Value::I64(a)) => *a as f64 == *b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| loose_eq(Some(a), Some(b)))
        }
        _ => lhs == rhs,
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        _ => as_f64(lhs)?.partial_cmp(&as_f64(rhs)?),
    }
}
