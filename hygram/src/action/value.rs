use std::fmt;
use std::sync::Arc;

use crate::action::Func;
use crate::error::{TransformError, TransformResult};
use crate::tree::{Expr, Literal, Node};

/// Result of an action, and the type of the state and data threaded through evaluation.
#[derive(Debug, Clone)]
pub enum Value<N: Node = Expr> {
    Lit(Literal),
    Node(N),
    Func(Func<N>),
}

impl<N: Node> Value<N> {
    #[inline]
    pub fn unit() -> Self {
        Value::Lit(Literal::Unit)
    }

    pub fn lit(value: impl Into<Literal>) -> Self {
        Value::Lit(value.into())
    }

    pub fn node(node: N) -> Self {
        Value::Node(node)
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Func<N>> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Borrow the literal, looking through terminal nodes.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Lit(l) => Some(l),
            Value::Node(n) => n.value(),
            Value::Func(_) => None,
        }
    }

    pub fn to_literal(&self) -> Option<Literal> {
        self.as_literal().cloned()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_literal().and_then(Literal::as_bool)
    }

    pub fn as_int(&self) -> Option<i64> {
        self.as_literal().and_then(Literal::as_int)
    }

    /// Convert into a node. Literals become terminals; functions are rejected.
    pub fn into_node(self) -> TransformResult<N> {
        match self {
            Value::Node(n) => Ok(n),
            Value::Lit(l) => Ok(N::terminal(l)),
            Value::Func(_) => Err(TransformError::NotANode {
                found: self.describe(),
            }),
        }
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Value::Lit(l) => format!("literal `{l}`"),
            Value::Node(n) => format!("node `{}` of arity {}", n.tag(), n.arity()),
            Value::Func(f) => format!("function `{}`", f.name()),
        }
    }
}

impl<N: Node> PartialEq for Value<N> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Lit(a), Value::Lit(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a.same_structure(b),
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<N: Node> Default for Value<N> {
    fn default() -> Self {
        Value::unit()
    }
}

impl<N: Node> From<Literal> for Value<N> {
    fn from(value: Literal) -> Self {
        Value::Lit(value)
    }
}

impl<N: Node> From<Func<N>> for Value<N> {
    fn from(value: Func<N>) -> Self {
        Value::Func(value)
    }
}

macro_rules! value_from_literal {
    ($($t:ty),*) => {
        $(
            impl<N: Node> From<$t> for Value<N> {
                fn from(value: $t) -> Self {
                    Value::Lit(Literal::from(value))
                }
            }
        )*
    };
}

value_from_literal!(bool, i64, i32, f64, &str, ());

impl<N: Node> From<Arc<str>> for Value<N> {
    fn from(value: Arc<str>) -> Self {
        Value::Lit(Literal::Str(value))
    }
}

impl fmt::Display for Value<Expr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Lit(l) => write!(f, "{l}"),
            Value::Node(n) => write!(f, "{n}"),
            Value::Func(func) => write!(f, "<{}>", func.name()),
        }
    }
}
