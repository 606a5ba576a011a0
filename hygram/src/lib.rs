//! Hygram: grammar matching and grammar-directed transforms over expression trees.
//!
//! A [`Grammar`](grammar::Grammar) describes which tree shapes are acceptable; an
//! [`Action`](action::Action) computes a value from a node, the *state* and the *data*
//! threaded through evaluation. Grammars whose cases carry actions are algorithms: they
//! pick the first case accepting a node and run its action, recursively if asked.
//!
//! Layout
//!  - [`tree`]: the [`Node`](tree::Node) interface required by the engines and the
//!    [`Expr`](tree::Expr) tree shipped with the crate, with builders and a parser.
//!  - [`grammar`] and [`action`]: the two closed vocabularies and their engines.
//!  - [`engine`]: the configurable driver shared by matching and evaluation.
//!  - [`algorithm`]: a grammar bundled with its engine.
//!
//! Failures never produce partial results: shape mismatches answer `false`, everything
//! else is a [`TransformError`](error::TransformError) propagated to the caller.
//!
//! Example
//! ```
//! use hygram::prelude::*;
//!
//! // Evaluate additions of terminals, leave anything else alone.
//! let calc = Algorithm::new(Grammar::switch([
//!     Grammar::terminal().case(Action::value()),
//!     Grammar::binary(Op::Plus, Grammar::recurse(), Grammar::recurse())
//!         .case(Action::evaluate_with(Action::recurse())),
//! ]));
//!
//! let e = parse("(plus 3 (plus 4 5))").unwrap();
//! assert_eq!(calc.call(&e).unwrap(), Value::from(12));
//! assert!(!calc.matches(&parse("(minus 3 4)").unwrap()).unwrap());
//! ```

/// Actions, values and the evaluation engine.
pub mod action;
/// Grammars bundled with an engine.
pub mod algorithm;
/// Engine configuration loaded from TOML.
pub mod config;
/// Driver shared by the matching and evaluation engines.
pub mod engine;
/// Error types.
pub mod error;
/// Grammars and the matching engine.
pub mod grammar;
/// Short-circuiting combinators over fallible predicates.
pub mod logic;
/// Operator sugar for trees and grammars.
pub mod ops;
/// Pretty-printing of trees, grammars and actions.
pub mod pretty;
/// Expression trees.
pub mod tree;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::action::{Action, Arg, Func, Leaf, Value};
    pub use crate::algorithm::Algorithm;
    pub use crate::config::{EngineConfig, WhenDefault};
    pub use crate::engine::{Engine, apply, matches};
    pub use crate::error::{TransformError, TransformResult};
    pub use crate::grammar::{Case, Grammar};
    pub use crate::pretty::PrettyNode;
    pub use crate::tree::parser::parse;
    pub use crate::tree::{Expr, Literal, LiteralKind, Node, Op, Signature, Tag};
}
