//! Shared driver of the matching and evaluation engines.
//!
//! The two engines are mutually recursive: matching an `if` pattern evaluates its
//! condition action, and evaluating a grammar used as an action first matches it. Both
//! sides receive a [`Frame`] describing the evaluation context (recursion depth and the
//! enclosing grammar targeted by `recurse`) explicitly on every call; the engine itself
//! holds nothing but its configuration, so one engine can serve any number of concurrent
//! evaluations.
use log::debug;

use crate::action::{Action, Value};
use crate::config::EngineConfig;
use crate::error::{TransformError, TransformResult};
use crate::grammar::Grammar;
use crate::tree::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Engine {
    config: EngineConfig,
}

/// Evaluation context of one step.
pub(crate) struct Frame<'g, N: Node> {
    root: Option<&'g Grammar<N>>,
    depth: usize,
}

impl<N: Node> Clone for Frame<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Node> Copy for Frame<'_, N> {}

impl<'g, N: Node> Frame<'g, N> {
    pub(crate) fn top() -> Self {
        Frame {
            root: None,
            depth: 0,
        }
    }

    pub(crate) fn with_root(self, root: &'g Grammar<N>) -> Self {
        Frame {
            root: Some(root),
            depth: self.depth,
        }
    }

    pub(crate) fn root(self) -> TransformResult<&'g Grammar<N>> {
        self.root.ok_or(TransformError::UnboundRecursion)
    }

    /// Enter one more level, failing past `limit`.
    #[inline]
    pub(crate) fn descend(self, limit: usize) -> TransformResult<Self> {
        if self.depth >= limit {
            return Err(TransformError::DepthExceeded { limit });
        }
        Ok(Frame {
            root: self.root,
            depth: self.depth + 1,
        })
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether `grammar` accepts `expr`. Shape mismatches are `Ok(false)`.
    pub fn matches<N: Node>(&self, expr: &N, grammar: &Grammar<N>) -> TransformResult<bool> {
        self.match_in(Frame::top().with_root(grammar), expr, grammar)
            .inspect_err(|e| debug!("matching `{}`/{} failed: {e}", expr.tag(), expr.arity()))
    }

    /// Index of the first case of a switch, or the first alternative of an or, accepting
    /// `expr`. Other grammars answer `Some(0)` when they accept the node.
    pub fn select<N: Node>(
        &self,
        expr: &N,
        grammar: &Grammar<N>,
    ) -> TransformResult<Option<usize>> {
        let frame = Frame::top().with_root(grammar);
        match grammar {
            Grammar::Switch(cases) => Ok(self.select_case(frame, expr, cases)?.map(|(i, _)| i)),
            Grammar::Or(alternatives) => {
                Ok(self.select_alternative(frame, expr, alternatives)?.map(|(i, _)| i))
            }
            _ => Ok(self.match_in(frame, expr, grammar)?.then_some(0)),
        }
    }

    /// Evaluate `action` on `expr` with the given state and data.
    pub fn apply<N: Node>(
        &self,
        expr: &N,
        state: &Value<N>,
        data: &Value<N>,
        action: &Action<N>,
    ) -> TransformResult<Value<N>> {
        self.apply_in(Frame::top(), expr, state, data, action)
            .inspect_err(|e| debug!("transforming `{}`/{} failed: {e}", expr.tag(), expr.arity()))
    }

    /// Evaluate `grammar` used as an action; it is the target of `recurse` meanwhile.
    pub fn apply_grammar<N: Node>(
        &self,
        expr: &N,
        state: &Value<N>,
        data: &Value<N>,
        grammar: &Grammar<N>,
    ) -> TransformResult<Value<N>> {
        self.apply_grammar_in(Frame::top().with_root(grammar), expr, state, data, grammar)
            .inspect_err(|e| debug!("transforming `{}`/{} failed: {e}", expr.tag(), expr.arity()))
    }
}

/// Whether `grammar` accepts `expr`, with the default configuration.
pub fn matches<N: Node>(expr: &N, grammar: &Grammar<N>) -> TransformResult<bool> {
    Engine::default().matches(expr, grammar)
}

/// Evaluate `action` on `expr`, with the default configuration.
pub fn apply<N: Node>(
    expr: &N,
    state: &Value<N>,
    data: &Value<N>,
    action: &Action<N>,
) -> TransformResult<Value<N>> {
    Engine::default().apply(expr, state, data, action)
}
