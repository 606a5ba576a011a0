//! Free-function builders for [`Expr`].
//!
//! ```
//! use hygram::tree::build::*;
//!
//! let e = plus(lit(1), multiplies(sym("x"), lit(2)));
//! assert_eq!(e.to_string(), "(plus 1 (multiplies x 2))");
//! ```
use std::sync::Arc;

use crate::error::TransformResult;
use crate::tree::{Expr, Literal, Op, Tag};

pub fn lit(value: impl Into<Literal>) -> Expr {
    Expr::lit(value)
}

pub fn sym(name: impl Into<Arc<str>>) -> Expr {
    Expr::sym(name)
}

pub fn string(s: impl Into<Arc<str>>) -> Expr {
    Expr::lit(Literal::Str(s.into()))
}

pub fn unit() -> Expr {
    Expr::lit(Literal::Unit)
}

macro_rules! unary_builders {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(operand: impl Into<Expr>) -> Expr {
                Expr::unary(Op::$op, operand.into())
            }
        )*
    };
}

macro_rules! binary_builders {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Op::$op, lhs.into(), rhs.into())
            }
        )*
    };
}

unary_builders! {
    negate => Negate,
    logical_not => LogicalNot,
    complement => Complement,
}

binary_builders! {
    plus => Plus,
    minus => Minus,
    multiplies => Multiplies,
    divides => Divides,
    modulus => Modulus,
    less => Less,
    less_equal => LessEqual,
    greater => Greater,
    greater_equal => GreaterEqual,
    equal_to => EqualTo,
    not_equal_to => NotEqualTo,
    logical_and => LogicalAnd,
    logical_or => LogicalOr,
    bitwise_and => BitwiseAnd,
    bitwise_or => BitwiseOr,
    bitwise_xor => BitwiseXor,
    shift_left => ShiftLeft,
    shift_right => ShiftRight,
    assign => Assign,
    subscript => Subscript,
    comma => Comma,
}

pub fn if_else(
    condition: impl Into<Expr>,
    then_branch: impl Into<Expr>,
    else_branch: impl Into<Expr>,
) -> Expr {
    Expr::ternary(
        Op::IfElse,
        condition.into(),
        then_branch.into(),
        else_branch.into(),
    )
}

/// `callee(args...)`, stored as a `function` node whose first child is the callee.
pub fn function(callee: impl Into<Expr>, args: impl IntoIterator<Item = Expr>) -> Expr {
    let children = std::iter::once(callee.into()).chain(args).collect();
    Expr::composite(Tag::Op(Op::Function), children)
}

/// Node with a user-defined tag.
pub fn user(name: &str, children: Vec<Expr>) -> TransformResult<Expr> {
    Expr::nary(Tag::user(name), children)
}
