//! A grammar bundled with the engine that runs it.
//!
//! An [`Algorithm`] is the unit users normally hand around: a grammar whose cases carry
//! the actions to run, evaluated on whole trees. `recurse` inside the grammar refers to
//! the algorithm itself, which is how recursive grammars are written.
//!
//! Example
//! ```
//! use hygram::prelude::*;
//!
//! // Sum every terminal of a tree of additions.
//! let sum = Algorithm::new(Grammar::switch([
//!     Grammar::terminal().case(Action::value()),
//!     Grammar::binary(Op::Plus, Grammar::wildcard(), Grammar::wildcard()).case_call(
//!         Action::op(Op::Plus),
//!         [
//!             Action::invoke(Action::recurse(), Action::left()),
//!             Action::invoke(Action::recurse(), Action::right()),
//!         ],
//!     ),
//! ]));
//!
//! let e = (Expr::lit(1) + Expr::lit(2)) + Expr::lit(3);
//! assert_eq!(sum.call(&e).unwrap(), Value::from(6));
//! ```
use crate::action::{Action, Value};
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::TransformResult;
use crate::grammar::Grammar;
use crate::tree::{Expr, Node};

#[derive(Debug, Clone)]
pub struct Algorithm<N: Node = Expr> {
    grammar: Grammar<N>,
    engine: Engine,
}

impl<N: Node> Algorithm<N> {
    pub fn new(grammar: Grammar<N>) -> Self {
        Algorithm {
            grammar,
            engine: Engine::default(),
        }
    }

    pub fn with_config(grammar: Grammar<N>, config: EngineConfig) -> Self {
        Algorithm {
            grammar,
            engine: Engine::new(config),
        }
    }

    pub fn grammar(&self) -> &Grammar<N> {
        &self.grammar
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn matches(&self, expr: &N) -> TransformResult<bool> {
        self.engine.matches(expr, &self.grammar)
    }

    /// Index of the case that would run on `expr`.
    pub fn select(&self, expr: &N) -> TransformResult<Option<usize>> {
        self.engine.select(expr, &self.grammar)
    }

    pub fn apply(&self, expr: &N, state: &Value<N>, data: &Value<N>) -> TransformResult<Value<N>> {
        self.engine.apply_grammar(expr, state, data, &self.grammar)
    }

    /// Apply with unit state and data.
    pub fn call(&self, expr: &N) -> TransformResult<Value<N>> {
        self.apply(expr, &Value::unit(), &Value::unit())
    }

    /// Apply and require a node as the result.
    pub fn transform(&self, expr: &N) -> TransformResult<N> {
        self.call(expr)?.into_node()
    }

    /// The algorithm as an action, for nesting inside other actions.
    pub fn as_action(&self) -> Action<N> {
        Action::algorithm(self.grammar.clone())
    }
}

impl<N: Node> From<Grammar<N>> for Algorithm<N> {
    fn from(grammar: Grammar<N>) -> Self {
        Algorithm::new(grammar)
    }
}
