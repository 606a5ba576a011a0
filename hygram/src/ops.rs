//! Operator sugar.
//!
//! On [`Expr`], the arithmetic, bitwise and shift operators build the matching composite
//! (`a + b` is `(plus a b)`, `-a` is `(negate a)`, `!a` is `(logical_not a)`). On
//! [`Grammar`], `p & q`, `p | q` and `!p` build `And`, `Or` and `Not`, flattening nested
//! conjunctions and disjunctions.
use crate::grammar::Grammar;
use crate::tree::{Expr, Node, Op};

macro_rules! define_binary_ops_expr {
    ( $( $trait:ident :: $method:ident => $op:ident ),* $(,)? ) => {
        $(
            impl<R: Into<Expr>> std::ops::$trait<R> for Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Self::Output {
                    Expr::binary(Op::$op, self, rhs.into())
                }
            }
        )*
    };
}

macro_rules! define_unary_ops_expr {
    ( $( $trait:ident :: $method:ident => $op:ident ),* $(,)? ) => {
        $(
            impl std::ops::$trait for Expr {
                type Output = Expr;

                fn $method(self) -> Self::Output {
                    Expr::unary(Op::$op, self)
                }
            }
        )*
    };
}

define_binary_ops_expr! {
    Add::add => Plus,
    Sub::sub => Minus,
    Mul::mul => Multiplies,
    Div::div => Divides,
    Rem::rem => Modulus,
    BitAnd::bitand => BitwiseAnd,
    BitOr::bitor => BitwiseOr,
    BitXor::bitxor => BitwiseXor,
    Shl::shl => ShiftLeft,
    Shr::shr => ShiftRight,
}

define_unary_ops_expr! {
    Neg::neg => Negate,
    Not::not => LogicalNot,
}

impl<N: Node> std::ops::BitAnd for Grammar<N> {
    type Output = Grammar<N>;

    fn bitand(self, rhs: Grammar<N>) -> Self::Output {
        let mut all = match self {
            Grammar::And(all) => all,
            lhs => vec![lhs],
        };
        match rhs {
            Grammar::And(more) => all.extend(more),
            rhs => all.push(rhs),
        }
        Grammar::And(all)
    }
}

impl<N: Node> std::ops::BitOr for Grammar<N> {
    type Output = Grammar<N>;

    fn bitor(self, rhs: Grammar<N>) -> Self::Output {
        let mut alternatives = match self {
            Grammar::Or(alternatives) => alternatives,
            lhs => vec![lhs],
        };
        match rhs {
            Grammar::Or(more) => alternatives.extend(more),
            rhs => alternatives.push(rhs),
        }
        Grammar::Or(alternatives)
    }
}

impl<N: Node> std::ops::Not for Grammar<N> {
    type Output = Grammar<N>;

    fn not(self) -> Self::Output {
        Grammar::Not(Box::new(self))
    }
}
