//! Actions: computations over a node and its evaluation context.
//!
//! Role
//! - [`Action`] is the closed set of transforms understood by the evaluation engine.
//!   Actions are applied to a node together with two context values, the *state* and the
//!   *data*, which are threaded unchanged through the recursion unless an action
//!   substitutes them (pass-through descends with the current node as state, folds
//!   thread their accumulator as state).
//! - [`Func`] and [`Leaf`] are the escape hatches for user computations: a `Func` is a
//!   value invoked by [`Action::Call`], a `Leaf` is invoked directly with
//!   `(expr, state, data)`.
//!
//! Example
//! ```
//! use hygram::prelude::*;
//!
//! let e = Expr::lit(3) + Expr::lit(4);
//! let sum = Action::call(Action::op(Op::Plus), [Action::left(), Action::right()]);
//! assert_eq!(sum.eval(&e).unwrap(), Value::from(7));
//! ```
pub mod builtin;
mod eval;
mod value;

pub use value::Value;

use std::fmt;
use std::sync::Arc;

use strum::Display;

use crate::engine::Engine;
use crate::error::TransformResult;
use crate::grammar::Grammar;
use crate::tree::{Expr, Node, Op, Tag};

/// Selector for the three arguments every action receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Arg {
    This,
    State,
    Data,
}

type FuncImpl<N> = dyn Fn(&[Value<N>]) -> TransformResult<Value<N>> + Send + Sync;

/// Callable value, invoked by [`Action::Call`] with already computed arguments.
pub struct Func<N: Node = Expr> {
    name: Arc<str>,
    arity: Option<usize>,
    f: Arc<FuncImpl<N>>,
}

impl<N: Node> Func<N> {
    /// Variadic function.
    pub fn new(
        name: impl Into<Arc<str>>,
        f: impl Fn(&[Value<N>]) -> TransformResult<Value<N>> + Send + Sync + 'static,
    ) -> Self {
        Func {
            name: name.into(),
            arity: None,
            f: Arc::new(f),
        }
    }

    /// Function whose argument count is checked before every invocation.
    pub fn with_arity(
        name: impl Into<Arc<str>>,
        arity: usize,
        f: impl Fn(&[Value<N>]) -> TransformResult<Value<N>> + Send + Sync + 'static,
    ) -> Self {
        Func {
            name: name.into(),
            arity: Some(arity),
            f: Arc::new(f),
        }
    }

    /// The builtin semantics of `op` as a function (see [`builtin::apply_op`]).
    pub fn op(op: Op) -> Self {
        let arity = match op {
            Op::Terminal => Some(1),
            _ => op.arity(),
        };
        Func {
            name: Arc::from(<&'static str>::from(op)),
            arity,
            f: Arc::new(move |args: &[Value<N>]| builtin::apply_op(op, args)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    pub fn invoke(&self, args: &[Value<N>]) -> TransformResult<Value<N>> {
        if let Some(expected) = self.arity {
            if expected != args.len() {
                return Err(crate::error::TransformError::ArityMismatch {
                    callee: self.name.to_string(),
                    expected,
                    found: args.len(),
                });
            }
        }
        (self.f)(args)
    }

    /// Identity comparison: two handles on the same function.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl<N: Node> Clone for Func<N> {
    fn clone(&self) -> Self {
        Func {
            name: self.name.clone(),
            arity: self.arity,
            f: self.f.clone(),
        }
    }
}

impl<N: Node> fmt::Debug for Func<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({})", self.name)
    }
}

type LeafImpl<N> =
    dyn Fn(&N, &Value<N>, &Value<N>) -> TransformResult<Value<N>> + Send + Sync;

/// User computation plugged in as a leaf of an action tree.
pub struct Leaf<N: Node = Expr> {
    name: Arc<str>,
    f: Arc<LeafImpl<N>>,
}

impl<N: Node> Leaf<N> {
    pub fn new(
        name: impl Into<Arc<str>>,
        f: impl Fn(&N, &Value<N>, &Value<N>) -> TransformResult<Value<N>> + Send + Sync + 'static,
    ) -> Self {
        Leaf {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn invoke(&self, expr: &N, state: &Value<N>, data: &Value<N>) -> TransformResult<Value<N>> {
        (self.f)(expr, state, data)
    }
}

impl<N: Node> Clone for Leaf<N> {
    fn clone(&self) -> Self {
        Leaf {
            name: self.name.clone(),
            f: self.f.clone(),
        }
    }
}

impl<N: Node> fmt::Debug for Leaf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Leaf({})", self.name)
    }
}

/// Closed set of transforms.
#[derive(Debug, Clone)]
pub enum Action<N: Node = Expr> {
    /// Always the same value.
    Constant(Value<N>),
    /// The node itself, the state or the data.
    Arg(Arg),
    /// The i-th child of the node.
    Child(usize),
    /// The value held by a terminal.
    Value,
    /// Rebuild the node from its children, each transformed by pass-through with the
    /// current node as state. Terminals are returned as is.
    PassThrough,
    /// Evaluate the function part, then the arguments, then invoke.
    Call(Box<Action<N>>, Vec<Action<N>>),
    /// Run the inner action on a node the pattern accepts. Without an inner action the
    /// behaviour follows [`EngineConfig::when_default`](crate::config::EngineConfig).
    When(Box<Grammar<N>>, Option<Box<Action<N>>>),
    /// Use a grammar as an action; it becomes the target of `recurse` while it runs.
    Algorithm(Box<Grammar<N>>),
    Leaf(Leaf<N>),
    /// Apply `action` to a computed node, optionally replacing the state and the data.
    Invoke {
        action: Box<Action<N>>,
        expr: Box<Action<N>>,
        state: Option<Box<Action<N>>>,
        data: Option<Box<Action<N>>>,
    },
    /// Thread an accumulator through the children: it starts as `init` and every child
    /// replaces it with `step(child, accumulator, data)`.
    Fold {
        init: Box<Action<N>>,
        step: Box<Action<N>>,
        reverse: bool,
    },
    /// Build a node from computed children. A `terminal` tag takes a single literal.
    Make(Tag, Vec<Action<N>>),
    /// Builtin operator semantics. Children are evaluated with the inner action, or
    /// recursively with the builtin semantics when there is none.
    Default(Option<Box<Action<N>>>),
    /// The innermost enclosing grammar, applied as an algorithm.
    Recurse,
}

impl<N: Node> Action<N> {
    pub fn constant(value: impl Into<Value<N>>) -> Self {
        Action::Constant(value.into())
    }

    pub fn func(f: Func<N>) -> Self {
        Action::Constant(Value::Func(f))
    }

    /// Constant holding the builtin function of `op`.
    pub fn op(op: Op) -> Self {
        Action::func(Func::op(op))
    }

    pub fn this() -> Self {
        Action::Arg(Arg::This)
    }

    pub fn state() -> Self {
        Action::Arg(Arg::State)
    }

    pub fn data() -> Self {
        Action::Arg(Arg::Data)
    }

    pub fn child(index: usize) -> Self {
        Action::Child(index)
    }

    pub fn left() -> Self {
        Action::Child(0)
    }

    pub fn right() -> Self {
        Action::Child(1)
    }

    pub fn value() -> Self {
        Action::Value
    }

    pub fn pass_through() -> Self {
        Action::PassThrough
    }

    pub fn call(fun: Action<N>, args: impl IntoIterator<Item = Action<N>>) -> Self {
        Action::Call(Box::new(fun), args.into_iter().collect())
    }

    pub fn when(pattern: Grammar<N>, action: Action<N>) -> Self {
        Action::When(Box::new(pattern), Some(Box::new(action)))
    }

    pub fn when_default(pattern: Grammar<N>) -> Self {
        Action::When(Box::new(pattern), None)
    }

    pub fn algorithm(grammar: Grammar<N>) -> Self {
        Action::Algorithm(Box::new(grammar))
    }

    pub fn leaf(
        name: impl Into<Arc<str>>,
        f: impl Fn(&N, &Value<N>, &Value<N>) -> TransformResult<Value<N>> + Send + Sync + 'static,
    ) -> Self {
        Action::Leaf(Leaf::new(name, f))
    }

    /// Apply `action` to the node computed by `expr`, keeping state and data.
    pub fn invoke(action: Action<N>, expr: Action<N>) -> Self {
        Action::Invoke {
            action: Box::new(action),
            expr: Box::new(expr),
            state: None,
            data: None,
        }
    }

    /// Same as [`Action::invoke`] but replacing the state and/or the data.
    pub fn invoke_with(
        action: Action<N>,
        expr: Action<N>,
        state: Option<Action<N>>,
        data: Option<Action<N>>,
    ) -> Self {
        Action::Invoke {
            action: Box::new(action),
            expr: Box::new(expr),
            state: state.map(Box::new),
            data: data.map(Box::new),
        }
    }

    pub fn fold(init: Action<N>, step: Action<N>) -> Self {
        Action::Fold {
            init: Box::new(init),
            step: Box::new(step),
            reverse: false,
        }
    }

    pub fn reverse_fold(init: Action<N>, step: Action<N>) -> Self {
        Action::Fold {
            init: Box::new(init),
            step: Box::new(step),
            reverse: true,
        }
    }

    pub fn make(tag: impl Into<Tag>, args: impl IntoIterator<Item = Action<N>>) -> Self {
        Action::Make(tag.into(), args.into_iter().collect())
    }

    /// Builtin evaluation of the whole tree.
    pub fn evaluate() -> Self {
        Action::Default(None)
    }

    /// Builtin evaluation of this node, children evaluated by `inner`.
    pub fn evaluate_with(inner: Action<N>) -> Self {
        Action::Default(Some(Box::new(inner)))
    }

    pub fn recurse() -> Self {
        Action::Recurse
    }

    /// Apply with the default [`Engine`].
    pub fn apply(&self, expr: &N, state: &Value<N>, data: &Value<N>) -> TransformResult<Value<N>> {
        Engine::default().apply(expr, state, data, self)
    }

    /// Apply with unit state and data.
    pub fn eval(&self, expr: &N) -> TransformResult<Value<N>> {
        self.apply(expr, &Value::unit(), &Value::unit())
    }
}
