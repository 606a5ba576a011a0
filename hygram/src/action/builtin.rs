//! Builtin operator semantics shared by [`Func::op`](crate::action::Func::op) and
//! [`Action::Default`](crate::action::Action::Default).
//!
//! Integer arithmetic is checked. Mixed integer/float operands are promoted to floats,
//! `plus` concatenates strings, and logical operators accept booleans as well as
//! integers (non-zero is true). `assign`, `subscript` and `function` have no builtin
//! meaning.
use std::cmp::Ordering;

use crate::action::Value;
use crate::error::{TransformError, TransformResult};
use crate::tree::{Literal, Node, Op};

fn mismatch(op: Op, operands: &[&Literal]) -> TransformError {
    TransformError::TypeMismatch {
        op: op.to_string(),
        found: operands
            .iter()
            .map(|l| format!("`{l}`"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn overflow(op: Op) -> TransformError {
    TransformError::Overflow { op: op.to_string() }
}

fn literal_of<N: Node>(op: Op, value: &Value<N>) -> TransformResult<&Literal> {
    value.as_literal().ok_or_else(|| TransformError::TypeMismatch {
        op: op.to_string(),
        found: value.describe(),
    })
}

fn literal_truth(op: Op, literal: &Literal) -> TransformResult<bool> {
    match literal {
        Literal::Bool(b) => Ok(*b),
        Literal::Int(i) => Ok(*i != 0),
        other => Err(mismatch(op, &[other])),
    }
}

/// Truth value of an operand of `op`.
pub fn truth<N: Node>(op: Op, value: &Value<N>) -> TransformResult<bool> {
    literal_truth(op, literal_of(op, value)?)
}

/// Apply the builtin semantics of `op` to already evaluated operands.
///
/// ```
/// use hygram::action::builtin::apply_op;
/// use hygram::prelude::*;
///
/// let sum: Value = apply_op(Op::Plus, &[Value::from(3), Value::from(4)]).unwrap();
/// assert_eq!(sum, Value::from(7));
/// assert!(apply_op::<Expr>(Op::Divides, &[Value::from(1), Value::from(0)]).is_err());
/// ```
pub fn apply_op<N: Node>(op: Op, args: &[Value<N>]) -> TransformResult<Value<N>> {
    let expected = match op {
        Op::Terminal => Some(1),
        _ => op.arity(),
    };
    if let Some(expected) = expected {
        if expected != args.len() {
            return Err(TransformError::ArityMismatch {
                callee: op.to_string(),
                expected,
                found: args.len(),
            });
        }
    }

    match (op, args) {
        (Op::Terminal, [value]) => Ok(value.clone()),
        (Op::Comma, [_, last]) => Ok(last.clone()),
        (Op::IfElse, [cond, then, otherwise]) => Ok(if truth(op, cond)? {
            then.clone()
        } else {
            otherwise.clone()
        }),
        (Op::Assign | Op::Subscript | Op::Function, _) => {
            Err(TransformError::NoDefault { tag: op.into() })
        }
        (_, [operand]) => unary(op, literal_of(op, operand)?).map(Value::Lit),
        (_, [lhs, rhs]) => binary(op, literal_of(op, lhs)?, literal_of(op, rhs)?).map(Value::Lit),
        _ => Err(TransformError::NoDefault { tag: op.into() }),
    }
}

fn unary(op: Op, operand: &Literal) -> TransformResult<Literal> {
    match (op, operand) {
        (Op::Negate, Literal::Int(i)) => i.checked_neg().map(Literal::Int).ok_or_else(|| overflow(op)),
        (Op::Negate, Literal::Float(x)) => Ok(Literal::Float(-x)),
        (Op::LogicalNot, _) => literal_truth(op, operand).map(|b| Literal::Bool(!b)),
        (Op::Complement, Literal::Int(i)) => Ok(Literal::Int(!i)),
        _ => Err(mismatch(op, &[operand])),
    }
}

fn binary(op: Op, lhs: &Literal, rhs: &Literal) -> TransformResult<Literal> {
    use Op::*;

    match op {
        Plus | Minus | Multiplies | Divides | Modulus => arithmetic(op, lhs, rhs),
        Less | LessEqual | Greater | GreaterEqual => {
            let ordering = compare(op, lhs, rhs)?;
            let holds = match op {
                Less => ordering.is_some_and(Ordering::is_lt),
                LessEqual => ordering.is_some_and(Ordering::is_le),
                Greater => ordering.is_some_and(Ordering::is_gt),
                _ => ordering.is_some_and(Ordering::is_ge),
            };
            Ok(Literal::Bool(holds))
        }
        EqualTo => Ok(Literal::Bool(equal(lhs, rhs))),
        NotEqualTo => Ok(Literal::Bool(!equal(lhs, rhs))),
        LogicalAnd => Ok(Literal::Bool(
            literal_truth(op, lhs)? && literal_truth(op, rhs)?,
        )),
        LogicalOr => Ok(Literal::Bool(
            literal_truth(op, lhs)? || literal_truth(op, rhs)?,
        )),
        BitwiseAnd | BitwiseOr | BitwiseXor => bitwise(op, lhs, rhs),
        ShiftLeft | ShiftRight => shift(op, lhs, rhs),
        _ => Err(TransformError::NoDefault { tag: op.into() }),
    }
}

fn arithmetic(op: Op, lhs: &Literal, rhs: &Literal) -> TransformResult<Literal> {
    match (lhs, rhs) {
        (Literal::Int(x), Literal::Int(y)) => {
            if matches!(op, Op::Divides | Op::Modulus) && *y == 0 {
                return Err(TransformError::DivisionByZero { op: op.to_string() });
            }
            let result = match op {
                Op::Plus => x.checked_add(*y),
                Op::Minus => x.checked_sub(*y),
                Op::Multiplies => x.checked_mul(*y),
                Op::Divides => x.checked_div(*y),
                _ => x.checked_rem(*y),
            };
            result.map(Literal::Int).ok_or_else(|| overflow(op))
        }
        (Literal::Str(x), Literal::Str(y)) if op == Op::Plus => {
            Ok(Literal::Str(format!("{x}{y}").into()))
        }
        _ => match (lhs.as_float(), rhs.as_float()) {
            (Some(x), Some(y)) => Ok(Literal::Float(match op {
                Op::Plus => x + y,
                Op::Minus => x - y,
                Op::Multiplies => x * y,
                Op::Divides => x / y,
                _ => x % y,
            })),
            _ => Err(mismatch(op, &[lhs, rhs])),
        },
    }
}

fn compare(op: Op, lhs: &Literal, rhs: &Literal) -> TransformResult<Option<Ordering>> {
    match (lhs, rhs) {
        (Literal::Int(x), Literal::Int(y)) => Ok(Some(x.cmp(y))),
        (Literal::Str(x), Literal::Str(y)) => Ok(Some(x.cmp(y))),
        (Literal::Bool(x), Literal::Bool(y)) => Ok(Some(x.cmp(y))),
        _ => match (lhs.as_float(), rhs.as_float()) {
            (Some(x), Some(y)) => Ok(x.partial_cmp(&y)),
            _ => Err(mismatch(op, &[lhs, rhs])),
        },
    }
}

fn equal(lhs: &Literal, rhs: &Literal) -> bool {
    match (lhs, rhs) {
        (Literal::Int(i), Literal::Float(x)) | (Literal::Float(x), Literal::Int(i)) => {
            *i as f64 == *x
        }
        _ => lhs == rhs,
    }
}

fn bitwise(op: Op, lhs: &Literal, rhs: &Literal) -> TransformResult<Literal> {
    match (op, lhs, rhs) {
        (Op::BitwiseAnd, Literal::Int(x), Literal::Int(y)) => Ok(Literal::Int(x & y)),
        (Op::BitwiseOr, Literal::Int(x), Literal::Int(y)) => Ok(Literal::Int(x | y)),
        (Op::BitwiseXor, Literal::Int(x), Literal::Int(y)) => Ok(Literal::Int(x ^ y)),
        (Op::BitwiseAnd, Literal::Bool(x), Literal::Bool(y)) => Ok(Literal::Bool(x & y)),
        (Op::BitwiseOr, Literal::Bool(x), Literal::Bool(y)) => Ok(Literal::Bool(x | y)),
        (Op::BitwiseXor, Literal::Bool(x), Literal::Bool(y)) => Ok(Literal::Bool(x ^ y)),
        _ => Err(mismatch(op, &[lhs, rhs])),
    }
}

fn shift(op: Op, lhs: &Literal, rhs: &Literal) -> TransformResult<Literal> {
    let (Literal::Int(x), Literal::Int(y)) = (lhs, rhs) else {
        return Err(mismatch(op, &[lhs, rhs]));
    };
    let amount = u32::try_from(*y).map_err(|_| overflow(op))?;
    let shifted = match op {
        Op::ShiftLeft => x.checked_shl(amount),
        _ => x.checked_shr(amount),
    };
    shifted.map(Literal::Int).ok_or_else(|| overflow(op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Expr;

    fn op(op: Op, args: &[Value<Expr>]) -> TransformResult<Value<Expr>> {
        apply_op(op, args)
    }

    #[test]
    fn integer_arithmetic_is_checked() {
        assert_eq!(op(Op::Minus, &[10.into(), 4.into()]), Ok(Value::from(6)));
        assert_eq!(op(Op::Modulus, &[10.into(), 4.into()]), Ok(Value::from(2)));
        assert!(
            op(Op::Plus, &[i64::MAX.into(), 1.into()])
                .unwrap_err()
                .is_overflow()
        );
        assert!(
            op(Op::Modulus, &[1.into(), 0.into()])
                .unwrap_err()
                .is_division_by_zero()
        );
        assert!(op(Op::Negate, &[i64::MIN.into()]).unwrap_err().is_overflow());
    }

    #[test]
    fn mixed_operands_are_promoted() {
        assert_eq!(op(Op::Plus, &[1.into(), 0.5.into()]), Ok(Value::from(1.5)));
        assert_eq!(op(Op::EqualTo, &[2.into(), 2.0.into()]), Ok(Value::from(true)));
        assert_eq!(op(Op::Less, &[1.into(), 1.5.into()]), Ok(Value::from(true)));
        // Float division follows IEEE rules.
        assert_eq!(
            op(Op::Divides, &[1.0.into(), 0.0.into()]),
            Ok(Value::from(f64::INFINITY))
        );
    }

    #[test]
    fn strings_concatenate_and_compare() {
        assert_eq!(op(Op::Plus, &["ab".into(), "cd".into()]), Ok(Value::from("abcd")));
        assert_eq!(op(Op::Greater, &["b".into(), "a".into()]), Ok(Value::from(true)));
        assert!(
            op(Op::Minus, &["b".into(), "a".into()])
                .unwrap_err()
                .is_type_mismatch()
        );
    }

    #[test]
    fn terminals_coerce_to_their_literal() {
        let args = [Value::Node(Expr::lit(3)), Value::Node(Expr::lit(4))];
        assert_eq!(op(Op::Multiplies, &args), Ok(Value::from(12)));
        assert!(
            op(Op::Plus, &[Value::Node(Expr::lit(1) + Expr::lit(2)), 1.into()])
                .unwrap_err()
                .is_type_mismatch()
        );
    }

    #[test]
    fn logic_bitwise_and_shifts() {
        assert_eq!(op(Op::LogicalAnd, &[true.into(), 0.into()]), Ok(Value::from(false)));
        assert_eq!(op(Op::LogicalNot, &[false.into()]), Ok(Value::from(true)));
        assert_eq!(op(Op::BitwiseXor, &[6.into(), 3.into()]), Ok(Value::from(5)));
        assert_eq!(op(Op::BitwiseOr, &[true.into(), false.into()]), Ok(Value::from(true)));
        assert_eq!(op(Op::Complement, &[0.into()]), Ok(Value::from(-1)));
        assert_eq!(op(Op::ShiftLeft, &[1.into(), 4.into()]), Ok(Value::from(16)));
        assert!(op(Op::ShiftRight, &[1.into(), 64.into()]).unwrap_err().is_overflow());
        assert!(op(Op::ShiftLeft, &[1.into(), (-1).into()]).unwrap_err().is_overflow());
    }

    #[test]
    fn structural_operators() {
        assert_eq!(op(Op::Comma, &[1.into(), 2.into()]), Ok(Value::from(2)));
        assert_eq!(
            op(Op::IfElse, &[false.into(), 1.into(), 2.into()]),
            Ok(Value::from(2))
        );
        assert_eq!(op(Op::Terminal, &["x".into()]), Ok(Value::from("x")));
        assert!(op(Op::Assign, &[1.into(), 2.into()]).unwrap_err().is_no_default());
        assert!(op(Op::Function, &[1.into()]).unwrap_err().is_no_default());
    }

    #[test]
    fn arity_is_checked() {
        let err = op(Op::Plus, &[1.into()]).unwrap_err();
        assert_eq!(
            err,
            TransformError::ArityMismatch {
                callee: "plus".to_string(),
                expected: 2,
                found: 1
            }
        );
    }
}
