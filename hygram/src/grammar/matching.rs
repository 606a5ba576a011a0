//! Grammar-matching engine.
//!
//! Every rule is a pure predicate over the node; composite rules go through
//! [`crate::logic`] so children and alternatives are checked in declaration order with
//! early exit.
use log::trace;

use crate::action::{Action, Value};
use crate::engine::{Engine, Frame};
use crate::error::{TransformError, TransformResult};
use crate::grammar::{Case, Grammar};
use crate::logic;
use crate::tree::{Literal, Node, Tag};

#[inline]
fn tag_accepts<N: Node>(tag: Option<&Tag>, expr: &N) -> bool {
    tag.is_none_or(|t| t == expr.tag())
}

impl Engine {
    pub(crate) fn match_in<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        grammar: &'g Grammar<N>,
    ) -> TransformResult<bool> {
        let frame = frame.descend(self.config().max_depth)?;

        match grammar {
            Grammar::Wildcard => Ok(true),
            Grammar::Exact(signature) => Ok(signature.describes(expr)),
            Grammar::Terminal(kind) => Ok(expr
                .value()
                .is_some_and(|v| kind.is_none_or(|k| v.kind() == k))),
            Grammar::Literal(literal) => Ok(expr.value() == Some(literal)),
            Grammar::Structural { tag, children } => {
                if !tag_accepts(tag.as_ref(), expr) || expr.arity() != children.len() {
                    return Ok(false);
                }
                logic::and(children.iter().zip(expr.children()), |(g, c)| {
                    self.match_in(frame, c, g)
                })
            }
            Grammar::Vararg { tag, prefix, rest } => {
                if expr.is_terminal()
                    || !tag_accepts(tag.as_ref(), expr)
                    || expr.arity() < prefix.len()
                {
                    return Ok(false);
                }
                logic::and(expr.children().enumerate(), |(i, c)| {
                    self.match_in(frame, c, prefix.get(i).unwrap_or(&**rest))
                })
            }
            Grammar::And(all) => logic::and(all, |g| self.match_in(frame, expr, g)),
            Grammar::Or(alternatives) => {
                logic::or(alternatives, |g| self.match_in(frame, expr, g))
            }
            Grammar::Not(inner) => logic::not(self.match_in(frame, expr, inner)),
            Grammar::If {
                cond,
                then,
                otherwise,
            } => logic::if_(
                self.condition(frame, expr, cond),
                || self.match_in(frame, expr, then),
                || self.match_in(frame, expr, otherwise),
            ),
            Grammar::Switch(cases) => {
                logic::or(cases, |case| self.match_in(frame, expr, &case.pattern))
            }
            Grammar::Recurse => self.match_in(frame, expr, frame.root()?),
        }
    }

    /// Evaluate the condition of an `if` pattern. Conditions see unit state and data and
    /// must produce a boolean.
    pub(crate) fn condition<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        cond: &'g Action<N>,
    ) -> TransformResult<bool> {
        let verdict = self.apply_in(frame, expr, &Value::unit(), &Value::unit(), cond)?;
        match verdict.as_literal() {
            Some(Literal::Bool(b)) => Ok(*b),
            _ => Err(TransformError::TypeMismatch {
                op: "if".to_string(),
                found: verdict.describe(),
            }),
        }
    }

    /// First case of a switch whose pattern accepts `expr`.
    pub(crate) fn select_case<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        cases: &'g [Case<N>],
    ) -> TransformResult<Option<(usize, &'g Case<N>)>> {
        let selected = logic::first(cases, |case| self.match_in(frame, expr, &case.pattern))?;
        if let Some((index, _)) = selected {
            trace!(
                "case #{index} selected for `{}`/{}",
                expr.tag(),
                expr.arity()
            );
        }
        Ok(selected)
    }

    /// First alternative of an or accepting `expr`.
    pub(crate) fn select_alternative<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        alternatives: &'g [Grammar<N>],
    ) -> TransformResult<Option<(usize, &'g Grammar<N>)>> {
        logic::first(alternatives, |g| self.match_in(frame, expr, g))
    }
}
