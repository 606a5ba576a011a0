//! Action evaluation engine.
//!
//! [`Engine::apply_in`] interprets one [`Action`] on a node; [`Engine::apply_grammar_in`]
//! interprets a [`Grammar`] used as an action. Both thread the same [`Frame`] as the
//! matching engine, so depth accounting covers the whole mutual recursion.
use log::trace;
use smallvec::SmallVec;

use crate::action::{Action, Arg, Value, builtin};
use crate::config::WhenDefault;
use crate::engine::{Engine, Frame};
use crate::error::{TransformError, TransformResult};
use crate::grammar::{Case, Grammar};
use crate::tree::{Node, Op};

fn no_match<N: Node>(expr: &N) -> TransformError {
    TransformError::NoMatch {
        tag: expr.tag().clone(),
        arity: expr.arity(),
    }
}

fn child_of<N: Node>(expr: &N, index: usize) -> TransformResult<&N> {
    expr.child(index).ok_or_else(|| TransformError::ChildOutOfRange {
        tag: expr.tag().clone(),
        arity: expr.arity(),
        index,
    })
}

impl Engine {
    pub(crate) fn apply_in<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        state: &Value<N>,
        data: &Value<N>,
        action: &'g Action<N>,
    ) -> TransformResult<Value<N>> {
        let frame = frame.descend(self.config().max_depth)?;

        match action {
            Action::Constant(value) => Ok(value.clone()),
            Action::Arg(Arg::This) => Ok(Value::Node(expr.clone())),
            Action::Arg(Arg::State) => Ok(state.clone()),
            Action::Arg(Arg::Data) => Ok(data.clone()),
            Action::Child(index) => child_of(expr, *index).map(|c| Value::Node(c.clone())),
            Action::Value => expr
                .value()
                .map(|v| Value::Lit(v.clone()))
                .ok_or_else(|| TransformError::NotTerminal {
                    tag: expr.tag().clone(),
                    arity: expr.arity(),
                }),
            Action::PassThrough => self.pass_through(frame, expr).map(Value::Node),
            Action::Call(fun, args) => self.call_in(frame, expr, state, data, fun, args),
            Action::When(pattern, inner) => {
                if !self.match_in(frame, expr, pattern)? {
                    return Err(TransformError::WhenPrecondition {
                        tag: expr.tag().clone(),
                        arity: expr.arity(),
                    });
                }
                match inner {
                    Some(inner) => self.apply_in(frame, expr, state, data, inner),
                    None => {
                        let fallback = self.config().when_default;
                        trace!("`when` without action on `{}`: {fallback:?}", expr.tag());
                        match fallback {
                            WhenDefault::Pattern => {
                                self.apply_grammar_in(frame, expr, state, data, pattern)
                            }
                            WhenDefault::PassThrough => {
                                self.pass_through(frame, expr).map(Value::Node)
                            }
                        }
                    }
                }
            }
            Action::Algorithm(grammar) => {
                self.apply_grammar_in(frame.with_root(grammar), expr, state, data, grammar)
            }
            Action::Leaf(leaf) => leaf.invoke(expr, state, data),
            Action::Invoke {
                action,
                expr: target,
                state: new_state,
                data: new_data,
            } => {
                let target = self.apply_in(frame, expr, state, data, target)?.into_node()?;
                let new_state = new_state
                    .as_deref()
                    .map(|a| self.apply_in(frame, expr, state, data, a))
                    .transpose()?;
                let new_data = new_data
                    .as_deref()
                    .map(|a| self.apply_in(frame, expr, state, data, a))
                    .transpose()?;
                self.apply_in(
                    frame,
                    &target,
                    new_state.as_ref().unwrap_or(state),
                    new_data.as_ref().unwrap_or(data),
                    action,
                )
            }
            Action::Fold {
                init,
                step,
                reverse,
            } => {
                let init = self.apply_in(frame, expr, state, data, init)?;
                let mut children: SmallVec<&N, 4> = expr.children().collect();
                if *reverse {
                    children.reverse();
                }
                children.into_iter().try_fold(init, |acc, child| {
                    self.apply_in(frame, child, &acc, data, step)
                })
            }
            Action::Make(tag, args) => {
                let values = args
                    .iter()
                    .map(|a| self.apply_in(frame, expr, state, data, a))
                    .collect::<TransformResult<Vec<_>>>()?;

                if tag.is_terminal() {
                    return match values.as_slice() {
                        [value] => value
                            .to_literal()
                            .map(|l| Value::Node(N::terminal(l)))
                            .ok_or_else(|| TransformError::TypeMismatch {
                                op: Op::Terminal.to_string(),
                                found: value.describe(),
                            }),
                        _ => Err(TransformError::ArityMismatch {
                            callee: tag.to_string(),
                            expected: 1,
                            found: values.len(),
                        }),
                    };
                }

                let children = values
                    .into_iter()
                    .map(Value::into_node)
                    .collect::<TransformResult<Vec<_>>>()?;
                N::make(tag.clone(), children).map(Value::Node)
            }
            Action::Default(inner) => {
                self.evaluate_default(frame, expr, state, data, inner.as_deref())
            }
            Action::Recurse => {
                let root = frame.root()?;
                self.apply_grammar_in(frame, expr, state, data, root)
            }
        }
    }

    /// Evaluate `grammar` used as an action on `expr`.
    pub(crate) fn apply_grammar_in<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        state: &Value<N>,
        data: &Value<N>,
        grammar: &'g Grammar<N>,
    ) -> TransformResult<Value<N>> {
        let frame = frame.descend(self.config().max_depth)?;

        match grammar {
            Grammar::Switch(cases) => match self.select_case(frame, expr, cases)? {
                Some((_, case)) => self.apply_case(frame, expr, state, data, case),
                None => Err(no_match(expr)),
            },
            Grammar::Or(alternatives) => {
                match self.select_alternative(frame, expr, alternatives)? {
                    Some((_, alternative)) => {
                        self.apply_grammar_in(frame, expr, state, data, alternative)
                    }
                    None => Err(no_match(expr)),
                }
            }
            Grammar::And(all) => {
                self.ensure_match(frame, expr, grammar)?;
                match all.last() {
                    Some(last) => self.apply_grammar_in(frame, expr, state, data, last),
                    None => Ok(Value::Node(expr.clone())),
                }
            }
            Grammar::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = if self.condition(frame, expr, cond)? {
                    then
                } else {
                    otherwise
                };
                self.apply_grammar_in(frame, expr, state, data, branch)
            }
            Grammar::Structural { children, .. } => {
                self.ensure_match(frame, expr, grammar)?;
                self.rebuild_with(frame, expr, data, children.iter())
            }
            Grammar::Vararg { prefix, rest, .. } => {
                self.ensure_match(frame, expr, grammar)?;
                let grammars = prefix.iter().chain(std::iter::repeat(&**rest));
                self.rebuild_with(frame, expr, data, grammars)
            }
            Grammar::Recurse => {
                let root = frame.root()?;
                self.apply_grammar_in(frame, expr, state, data, root)
            }
            Grammar::Wildcard
            | Grammar::Exact(_)
            | Grammar::Terminal(_)
            | Grammar::Literal(_)
            | Grammar::Not(_) => {
                self.ensure_match(frame, expr, grammar)?;
                Ok(Value::Node(expr.clone()))
            }
        }
    }

    fn ensure_match<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        grammar: &'g Grammar<N>,
    ) -> TransformResult<()> {
        if self.match_in(frame, expr, grammar)? {
            Ok(())
        } else {
            Err(no_match(expr))
        }
    }

    fn apply_case<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        state: &Value<N>,
        data: &Value<N>,
        case: &'g Case<N>,
    ) -> TransformResult<Value<N>> {
        match case.actions.as_slice() {
            [] => self.apply_grammar_in(frame, expr, state, data, &case.pattern),
            [action] => self.apply_in(frame, expr, state, data, action),
            [fun, args @ ..] => self.call_in(frame, expr, state, data, fun, args),
        }
    }

    fn call_in<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        state: &Value<N>,
        data: &Value<N>,
        fun: &'g Action<N>,
        args: &'g [Action<N>],
    ) -> TransformResult<Value<N>> {
        let func = match self.apply_in(frame, expr, state, data, fun)? {
            Value::Func(func) => func,
            other => {
                return Err(TransformError::NotCallable {
                    found: other.describe(),
                });
            }
        };
        let args = args
            .iter()
            .map(|a| self.apply_in(frame, expr, state, data, a))
            .collect::<TransformResult<SmallVec<Value<N>, 4>>>()?;
        trace!("calling `{}` with {} argument(s)", func.name(), args.len());
        func.invoke(&args)
    }

    /// Rebuild `expr` under the same tag, every child replaced by the node computed by
    /// pass-through. Terminals are returned as is.
    fn pass_through<N: Node>(&self, frame: Frame<'_, N>, expr: &N) -> TransformResult<N> {
        if expr.is_terminal() {
            return Ok(expr.clone());
        }
        let frame = frame.descend(self.config().max_depth)?;
        let children = expr
            .children()
            .map(|c| self.pass_through(frame, c))
            .collect::<TransformResult<Vec<_>>>()?;
        N::make(expr.tag().clone(), children)
    }

    /// Rebuild `expr`, the i-th child transformed by the i-th grammar with the current node
    /// as state.
    fn rebuild_with<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        data: &Value<N>,
        grammars: impl Iterator<Item = &'g Grammar<N>>,
    ) -> TransformResult<Value<N>> {
        if expr.is_terminal() {
            return Ok(Value::Node(expr.clone()));
        }
        let parent = Value::Node(expr.clone());
        let children = expr
            .children()
            .zip(grammars)
            .map(|(c, g)| {
                self.apply_grammar_in(frame, c, &parent, data, g)
                    .and_then(Value::into_node)
            })
            .collect::<TransformResult<Vec<_>>>()?;
        trace!("rebuilding `{}`/{}", expr.tag(), expr.arity());
        N::make(expr.tag().clone(), children).map(Value::Node)
    }

    /// Builtin semantics of the node, children evaluated by `inner` or, without one, by
    /// the builtin semantics again.
    fn evaluate_default<'g, N: Node>(
        &self,
        frame: Frame<'g, N>,
        expr: &N,
        state: &Value<N>,
        data: &Value<N>,
        inner: Option<&'g Action<N>>,
    ) -> TransformResult<Value<N>> {
        let frame = frame.descend(self.config().max_depth)?;

        if let Some(value) = expr.value() {
            return Ok(Value::Lit(value.clone()));
        }
        let op = expr.tag().as_op().ok_or_else(|| TransformError::NoDefault {
            tag: expr.tag().clone(),
        })?;

        let eval = |child: &N| match inner {
            Some(inner) => self.apply_in(frame, child, state, data, inner),
            None => self.evaluate_default(frame, child, state, data, None),
        };

        match op {
            Op::LogicalAnd | Op::LogicalOr => {
                let lhs = builtin::truth(op, &eval(child_of(expr, 0)?)?)?;
                // `and` stops on false, `or` on true.
                if lhs == (op == Op::LogicalOr) {
                    return Ok(Value::from(lhs));
                }
                let rhs = builtin::truth(op, &eval(child_of(expr, 1)?)?)?;
                Ok(Value::from(rhs))
            }
            Op::IfElse => {
                let branch = if builtin::truth(op, &eval(child_of(expr, 0)?)?)? {
                    1
                } else {
                    2
                };
                eval(child_of(expr, branch)?)
            }
            _ => {
                let args = expr
                    .children()
                    .map(eval)
                    .collect::<TransformResult<SmallVec<Value<N>, 3>>>()?;
                builtin::apply_op(op, &args)
            }
        }
    }
}
