//! Grammars: patterns over tree shapes.
//!
//! Role
//! - [`Grammar`] describes which nodes are acceptable. [`Grammar::matches`] answers the
//!   question for a node, and a grammar can also be used as an action (see
//!   [`Action::Algorithm`]) to compute a value from the nodes it accepts.
//! - [`Grammar::Switch`] holds an ordered list of [`Case`]s. The first case whose pattern
//!   accepts the node is the one that runs; declaration order is observable and never
//!   rearranged.
//!
//! Example
//! ```
//! use hygram::prelude::*;
//!
//! let e = Expr::lit(3) + Expr::lit(4);
//! let sum = Grammar::binary(Op::Plus, Grammar::terminal(), Grammar::terminal());
//! assert!(sum.matches(&e).unwrap());
//! assert!(!sum.matches(&Expr::lit(5)).unwrap());
//! assert!((!sum).matches(&Expr::lit(5)).unwrap());
//! ```
mod matching;

use crate::action::{Action, Value};
use crate::engine::Engine;
use crate::error::TransformResult;
use crate::tree::{Expr, Literal, LiteralKind, Node, Op, Signature, Tag};

/// Closed set of patterns.
#[derive(Debug, Clone)]
pub enum Grammar<N: Node = Expr> {
    /// Accepts every node.
    Wildcard,
    /// Accepts nodes whose [`Signature`] is exactly this one.
    Exact(Signature),
    /// Accepts terminals, optionally only those holding a literal of the given kind.
    Terminal(Option<LiteralKind>),
    /// Accepts terminals holding this very literal.
    Literal(Literal),
    /// Accepts nodes with this tag (any tag when `None`) and exactly one child per child
    /// pattern, each child accepted by its pattern.
    Structural {
        tag: Option<Tag>,
        children: Vec<Grammar<N>>,
    },
    /// Accepts composites with this tag (any tag when `None`) whose leading children are
    /// accepted by `prefix` and every remaining child by `rest`.
    Vararg {
        tag: Option<Tag>,
        prefix: Vec<Grammar<N>>,
        rest: Box<Grammar<N>>,
    },
    And(Vec<Grammar<N>>),
    Or(Vec<Grammar<N>>),
    Not(Box<Grammar<N>>),
    /// Select the pattern with a boolean action evaluated on the node.
    If {
        cond: Box<Action<N>>,
        then: Box<Grammar<N>>,
        otherwise: Box<Grammar<N>>,
    },
    Switch(Vec<Case<N>>),
    /// The innermost enclosing grammar.
    Recurse,
}

/// One alternative of a [`Grammar::Switch`]: a pattern and the body run when it is the
/// first to accept the node.
///
/// The body has three forms: no action runs the pattern itself as an action, a single
/// action runs that action, and several actions are a call whose first action computes
/// the function and the others its arguments.
#[derive(Debug, Clone)]
pub struct Case<N: Node = Expr> {
    pub pattern: Grammar<N>,
    pub actions: Vec<Action<N>>,
}

impl<N: Node> Case<N> {
    pub fn new(pattern: Grammar<N>, actions: impl IntoIterator<Item = Action<N>>) -> Self {
        Case {
            pattern,
            actions: actions.into_iter().collect(),
        }
    }
}

impl<N: Node> Grammar<N> {
    pub fn wildcard() -> Self {
        Grammar::Wildcard
    }

    pub fn exact(signature: Signature) -> Self {
        Grammar::Exact(signature)
    }

    /// Accepts nodes with the same signature as `node`.
    pub fn exact_of(node: &N) -> Self {
        Grammar::Exact(node.signature())
    }

    pub fn terminal() -> Self {
        Grammar::Terminal(None)
    }

    pub fn terminal_of(kind: LiteralKind) -> Self {
        Grammar::Terminal(Some(kind))
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Grammar::Literal(value.into())
    }

    pub fn node(tag: impl Into<Tag>, children: impl IntoIterator<Item = Grammar<N>>) -> Self {
        Grammar::Structural {
            tag: Some(tag.into()),
            children: children.into_iter().collect(),
        }
    }

    /// Structural pattern accepting any tag.
    pub fn any_node(children: impl IntoIterator<Item = Grammar<N>>) -> Self {
        Grammar::Structural {
            tag: None,
            children: children.into_iter().collect(),
        }
    }

    pub fn unary(op: Op, operand: Grammar<N>) -> Self {
        Grammar::node(op, [operand])
    }

    pub fn binary(op: Op, lhs: Grammar<N>, rhs: Grammar<N>) -> Self {
        Grammar::node(op, [lhs, rhs])
    }

    pub fn vararg(
        tag: Option<Tag>,
        prefix: impl IntoIterator<Item = Grammar<N>>,
        rest: Grammar<N>,
    ) -> Self {
        Grammar::Vararg {
            tag,
            prefix: prefix.into_iter().collect(),
            rest: Box::new(rest),
        }
    }

    pub fn and(all: impl IntoIterator<Item = Grammar<N>>) -> Self {
        Grammar::And(all.into_iter().collect())
    }

    pub fn or(alternatives: impl IntoIterator<Item = Grammar<N>>) -> Self {
        Grammar::Or(alternatives.into_iter().collect())
    }

    pub fn if_(cond: Action<N>, then: Grammar<N>, otherwise: Grammar<N>) -> Self {
        Grammar::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn switch(cases: impl IntoIterator<Item = Case<N>>) -> Self {
        Grammar::Switch(cases.into_iter().collect())
    }

    pub fn recurse() -> Self {
        Grammar::Recurse
    }

    /// Pair this pattern with the action run when it is selected.
    pub fn case(self, action: Action<N>) -> Case<N> {
        Case::new(self, [action])
    }

    /// Pair this pattern with a call: `fun` computes the function, `args` its arguments.
    pub fn case_call(self, fun: Action<N>, args: impl IntoIterator<Item = Action<N>>) -> Case<N> {
        Case::new(self, std::iter::once(fun).chain(args))
    }

    /// Pair this pattern with itself used as an action.
    pub fn case_self(self) -> Case<N> {
        Case::new(self, [])
    }

    /// `when(self, action)`.
    pub fn when(self, action: Action<N>) -> Action<N> {
        Action::when(self, action)
    }

    pub fn into_action(self) -> Action<N> {
        Action::algorithm(self)
    }

    /// Match with the default [`Engine`].
    pub fn matches(&self, expr: &N) -> TransformResult<bool> {
        Engine::default().matches(expr, self)
    }

    /// Index of the case (for a switch) or alternative (for an or) that would run on
    /// `expr`, using the default [`Engine`].
    pub fn select(&self, expr: &N) -> TransformResult<Option<usize>> {
        Engine::default().select(expr, self)
    }

    /// Use this grammar as an action on `expr` with unit state and data.
    pub fn eval(&self, expr: &N) -> TransformResult<Value<N>> {
        Engine::default().apply_grammar(expr, &Value::unit(), &Value::unit(), self)
    }
}
