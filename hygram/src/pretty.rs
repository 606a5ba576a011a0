//! RcDoc-based pretty-printer with termcolor annotations.
//!
//! Role
//! - Convert trees, grammars and actions into annotated s-expression documents suitable
//!   for width-aware rendering.
//! - Provide colored output for terminals (TTY-aware) and plain strings for logs/tests.
//!   `Display` on [`Expr`], [`Grammar`] and [`Action`] renders the plain form at width 80,
//!   which the tree parser reads back.
//!
//! Performance
//! - Building the doc is O(n) in the size of the printed object; rendering respects line
//!   widths with linear-time layout in the size of the resulting document.
use std::fmt;
use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::action::{Action, Value};
use crate::grammar::{Case, Grammar};
use crate::tree::{Expr, Literal, Node, Tag};

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct,
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Keyword,  // grammar and action heads
    Operator, // builtin tags
    Ident,    // user tags, symbols, functions
    Literal,
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    _ => Color::Magenta,
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Keyword => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Ident => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Literal => {
                s.set_fg(Some(Color::Magenta));
            }
        }
        s
    }
}

type Doc = RcDoc<'static, Style>;

fn styled(style: Style, s: impl fmt::Display) -> Doc {
    RcDoc::as_string(s).annotate(style)
}

fn kw(s: &'static str) -> Doc {
    styled(Style::Keyword, s)
}

#[inline]
fn lparen(depth: u8) -> Doc {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> Doc {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

/// `(head item...)`, items on one line when they fit, otherwise one per line.
fn sexpr(head: Doc, items: impl IntoIterator<Item = Doc>, depth: u8) -> Doc {
    let items: Vec<Doc> = items.into_iter().collect();
    let body = if items.is_empty() {
        head
    } else {
        head.append(
            RcDoc::line()
                .append(RcDoc::intersperse(items, RcDoc::line()))
                .nest(2),
        )
    };
    lparen(depth).append(body).append(rparen(depth)).group()
}

fn literal_doc(literal: &Literal) -> Doc {
    match literal {
        Literal::Sym(_) => styled(Style::Ident, literal),
        _ => styled(Style::Literal, literal),
    }
}

fn tag_doc(tag: &Tag) -> Doc {
    match tag {
        Tag::Op(_) => styled(Style::Operator, tag),
        Tag::User(_) => styled(Style::Ident, tag),
    }
}

fn node_doc<N: Node>(node: &N, depth: u8) -> Doc {
    match node.value() {
        Some(literal) => literal_doc(literal),
        None => sexpr(
            tag_doc(node.tag()),
            node.children().map(|c| node_doc(c, depth.wrapping_add(1))),
            depth,
        ),
    }
}

fn value_doc<N: Node>(value: &Value<N>, depth: u8) -> Doc {
    match value {
        Value::Lit(literal) => literal_doc(literal),
        Value::Node(node) => sexpr(kw("quote"), [node_doc(node, depth.wrapping_add(1))], depth),
        Value::Func(func) => styled(Style::Ident, format_args!("<{}>", func.name())),
    }
}

fn grammar_doc<N: Node>(grammar: &Grammar<N>, depth: u8) -> Doc {
    let inner = depth.wrapping_add(1);

    match grammar {
        Grammar::Wildcard => styled(Style::Punct, "_"),
        Grammar::Exact(signature) => sexpr(kw("exact"), [styled(Style::Literal, signature)], depth),
        Grammar::Terminal(None) => sexpr(kw("terminal"), [], depth),
        Grammar::Terminal(Some(kind)) => sexpr(kw("terminal"), [styled(Style::Literal, kind)], depth),
        Grammar::Literal(literal) => sexpr(kw("literal"), [literal_doc(literal)], depth),
        Grammar::Structural { tag, children } => {
            let head = match tag {
                Some(tag) => tag_doc(tag),
                None => styled(Style::Punct, "*"),
            };
            sexpr(head, grammars_doc(children, inner), depth)
        }
        Grammar::Vararg { tag, prefix, rest } => {
            let head = match tag {
                Some(tag) => tag_doc(tag),
                None => styled(Style::Punct, "*"),
            };
            let rest = sexpr(kw("rest"), [grammar_doc(rest, inner.wrapping_add(1))], inner);
            sexpr(
                kw("vararg"),
                std::iter::once(head).chain(grammars_doc(prefix, inner)).chain([rest]),
                depth,
            )
        }
        Grammar::And(grammars) => sexpr(kw("and"), grammars_doc(grammars, inner), depth),
        Grammar::Or(grammars) => sexpr(kw("or"), grammars_doc(grammars, inner), depth),
        Grammar::Not(g) => sexpr(kw("not"), [grammar_doc(g, inner)], depth),
        Grammar::If {
            cond,
            then,
            otherwise,
        } => sexpr(
            kw("if"),
            [
                action_doc(cond, inner),
                grammar_doc(then, inner),
                grammar_doc(otherwise, inner),
            ],
            depth,
        ),
        Grammar::Switch(cases) => {
            sexpr(kw("switch"), cases.iter().map(|c| case_doc(c, inner)), depth)
        }
        Grammar::Recurse => kw("recurse"),
    }
}

fn grammars_doc<N: Node>(grammars: &[Grammar<N>], depth: u8) -> Vec<Doc> {
    grammars.iter().map(|g| grammar_doc(g, depth)).collect()
}

fn case_doc<N: Node>(case: &Case<N>, depth: u8) -> Doc {
    let inner = depth.wrapping_add(1);
    sexpr(
        kw("case"),
        std::iter::once(grammar_doc(&case.pattern, inner))
            .chain(case.actions.iter().map(|a| action_doc(a, inner))),
        depth,
    )
}

fn action_doc<N: Node>(action: &Action<N>, depth: u8) -> Doc {
    let inner = depth.wrapping_add(1);

    match action {
        Action::Constant(value) => value_doc(value, depth),
        Action::Arg(arg) => styled(Style::Keyword, arg),
        Action::Child(index) => sexpr(kw("child"), [styled(Style::Literal, index)], depth),
        Action::Value => kw("value"),
        Action::PassThrough => kw("pass_through"),
        Action::Call(fun, args) => sexpr(
            kw("call"),
            std::iter::once(action_doc(fun, inner))
                .chain(args.iter().map(|a| action_doc(a, inner))),
            depth,
        ),
        Action::When(pattern, action) => sexpr(
            kw("when"),
            std::iter::once(grammar_doc(pattern, inner))
                .chain(action.iter().map(|a| action_doc(a, inner))),
            depth,
        ),
        Action::Algorithm(grammar) => {
            sexpr(kw("algorithm"), [grammar_doc(grammar, inner)], depth)
        }
        Action::Leaf(leaf) => sexpr(kw("leaf"), [styled(Style::Ident, leaf.name())], depth),
        Action::Invoke {
            action,
            expr,
            state,
            data,
        } => {
            let deeper = inner.wrapping_add(1);
            let state = state
                .iter()
                .map(|s| sexpr(kw("state"), [action_doc(s, deeper)], inner));
            let data = data
                .iter()
                .map(|d| sexpr(kw("data"), [action_doc(d, deeper)], inner));
            sexpr(
                kw("invoke"),
                [action_doc(action, inner), action_doc(expr, inner)]
                    .into_iter()
                    .chain(state)
                    .chain(data),
                depth,
            )
        }
        Action::Fold {
            init,
            step,
            reverse,
        } => sexpr(
            kw(if *reverse { "reverse_fold" } else { "fold" }),
            [action_doc(init, inner), action_doc(step, inner)],
            depth,
        ),
        Action::Make(tag, args) => sexpr(
            kw("make"),
            std::iter::once(tag_doc(tag)).chain(args.iter().map(|a| action_doc(a, inner))),
            depth,
        ),
        Action::Default(None) => kw("evaluate"),
        Action::Default(Some(a)) => sexpr(kw("evaluate"), [action_doc(a, inner)], depth),
        Action::Recurse => kw("recurse"),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'_, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<W: WriteColor + Write> pretty::Render for ColorWriter<'_, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Render a document to a `termcolor::WriteColor` with width-aware layout.
fn render_to<W: WriteColor + Write>(doc: &Doc, width: usize, out: &mut W) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

fn print_colored(doc: &Doc, width: usize) -> io::Result<()> {
    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stdout = stdout.lock();
    render_to(doc, width, &mut stdout)?;
    writeln!(stdout)
}

fn to_plain_string(doc: &Doc, width: usize) -> String {
    let mut buf = String::new();
    let _ = doc.render_fmt(width, &mut buf);
    buf
}

/// Width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for any [`Node`].
pub trait PrettyNode {
    /// Build an RcDoc representation of this node with style annotations.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render this node with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Print this node to stdout with colors (TTY-aware), at auto-detected width.
    fn pretty_print(&self) -> io::Result<()>;

    /// Format this node into a plain string (no colors).
    fn pretty_string(&self) -> String;
}

impl<T: Node> PrettyNode for T {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        node_doc(self, 0)
    }

    #[inline]
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    #[inline]
    fn pretty_print(&self) -> io::Result<()> {
        print_colored(&self.pretty_doc(), terminal_width())
    }

    #[inline]
    fn pretty_string(&self) -> String {
        to_plain_string(&self.pretty_doc(), 80)
    }
}

macro_rules! impl_pretty_inherent {
    ($t:ident, $to_doc:ident) => {
        impl<N: Node> $t<N> {
            pub fn pretty_doc(&self) -> RcDoc<'static, Style> {
                $to_doc(self, 0)
            }

            pub fn pretty_render_to<W: WriteColor + Write>(
                &self,
                width: usize,
                out: &mut W,
            ) -> io::Result<()> {
                render_to(&self.pretty_doc(), width, out)
            }

            pub fn pretty_print(&self) -> io::Result<()> {
                print_colored(&self.pretty_doc(), terminal_width())
            }

            pub fn pretty_string(&self) -> String {
                to_plain_string(&self.pretty_doc(), 80)
            }
        }

        impl<N: Node> fmt::Display for $t<N> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut w = FmtWrite::new(f);
                self.pretty_doc().render_raw(80, &mut w)
            }
        }
    };
}

impl_pretty_inherent!(Grammar, grammar_doc);
impl_pretty_inherent!(Action, action_doc);

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = FmtWrite::new(f);
        self.pretty_doc().render_raw(80, &mut w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Op;

    #[test]
    fn trees_print_as_sexpr() {
        let e = Expr::binary(
            Op::Plus,
            Expr::lit(3),
            Expr::unary(Op::Negate, Expr::lit(1.5)),
        );
        assert_eq!(e.to_string(), "(plus 3 (negate 1.5))");
        assert_eq!(Expr::lit("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Expr::sym("x").pretty_string(), "x");
    }

    #[test]
    fn long_trees_break_lines() {
        let mut e = Expr::lit(0);
        for i in 1..40 {
            e = Expr::binary(Op::Plus, e, Expr::lit(i));
        }
        let printed = to_plain_string(&e.pretty_doc(), 40);
        assert!(printed.lines().count() > 1);
        assert!(printed.starts_with("(plus"));
    }

    #[test]
    fn grammars_and_actions_print() {
        let g: Grammar = Grammar::switch([
            Grammar::terminal().case(Action::value()),
            Grammar::binary(Op::Plus, Grammar::wildcard(), Grammar::recurse())
                .case(Action::pass_through()),
        ]);
        assert_eq!(
            g.to_string(),
            "(switch (case (terminal) value) (case (plus _ recurse) pass_through))"
        );

        let a: Action = Action::call(Action::op(Op::Plus), [Action::left(), Action::child(1)]);
        assert_eq!(a.to_string(), "(call <plus> (child 0) (child 1))");
        assert_eq!(Action::<Expr>::evaluate().to_string(), "evaluate");
    }

    #[test]
    fn colored_rendering_emits_escape_codes() {
        let e = Expr::lit(1) + Expr::lit(2);
        let mut out = termcolor::Ansi::new(Vec::new());
        e.pretty_render_to(80, &mut out).unwrap();
        let bytes = out.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("plus"));
    }
}
