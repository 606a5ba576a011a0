//! Parser for the s-expression syntax printed by [`crate::pretty`], using chumsky.
//!
//! Role
//! - Turn human-readable trees into [`Expr`] values, mainly for tests, examples and
//!   debugging sessions.
//! - Round-trips with the pretty printer: printing then parsing yields a structurally
//!   equal tree.
//!
//! Syntax
//! - Integers `42`, `-7`; floats `1.5`, `-0.25`, `1e20`, `2.5e-7` (a `.` or an exponent
//!   is mandatory), `inf`, `-inf` and `nan`.
//! - Booleans `true` and `false`, unit `()`.
//! - Strings `"text"` with `\"` and `\\` escapes.
//! - Any other identifier is a symbol terminal (`x`, `arg_0`). Other symbols are written
//!   between bars, `|a b|`, with `\|` and `\\` escapes.
//! - Composites `(tag child...)` with at least one child. Builtin tag names (`plus`,
//!   `if_else`, ...) map to [`Op`](crate::tree::Op), other names become user tags.
//! - `;` starts a comment running to the end of the line.
use chumsky::prelude::*;

use crate::tree::{Expr, Literal, Node, Tag};

type ParserError<'src> = extra::Err<Rich<'src, char>>;

fn padding<'src>() -> impl Parser<'src, &'src str, (), ParserError<'src>> + Clone {
    let comment = just(';')
        .then(any().and_is(just('\n').not()).repeated())
        .ignored();

    any()
        .filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(comment)
        .repeated()
        .ignored()
}

fn number<'src>() -> impl Parser<'src, &'src str, Literal, ParserError<'src>> + Clone {
    just('-')
        .or_not()
        .then(text::digits(10))
        .then(just('.').then(text::digits(10)).or_not())
        .then(
            one_of("eE")
                .then(one_of("+-").or_not())
                .then(text::digits(10))
                .or_not(),
        )
        .to_slice()
        .try_map(|s: &str, span| {
            if s.contains(['.', 'e', 'E']) {
                s.parse::<f64>()
                    .map(Literal::Float)
                    .map_err(|e| Rich::custom(span, format!("invalid float literal '{s}': {e}")))
            } else {
                s.parse::<i64>().map(Literal::Int).map_err(|e| {
                    Rich::custom(span, format!("invalid integer literal '{s}': {e}"))
                })
            }
        })
        .labelled("number")
}

fn string<'src>() -> impl Parser<'src, &'src str, Literal, ParserError<'src>> + Clone {
    let escape = just('\\').ignore_then(one_of("\\\""));

    just('"')
        .ignore_then(
            none_of("\\\"")
                .or(escape)
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
        .map(|s| Literal::Str(s.into()))
        .labelled("string")
}

fn negative_infinity<'src>() -> impl Parser<'src, &'src str, Literal, ParserError<'src>> + Clone
{
    just("-inf").to(Literal::Float(f64::NEG_INFINITY))
}

fn word<'src>() -> impl Parser<'src, &'src str, Literal, ParserError<'src>> + Clone {
    text::ascii::ident()
        .map(|s: &str| match s {
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            "inf" => Literal::Float(f64::INFINITY),
            "nan" => Literal::Float(f64::NAN),
            _ => Literal::Sym(s.into()),
        })
        .labelled("symbol")
}

fn quoted_symbol<'src>() -> impl Parser<'src, &'src str, Literal, ParserError<'src>> + Clone {
    let escape = just('\\').ignore_then(one_of("\\|"));

    just('|')
        .ignore_then(none_of("\\|").or(escape).repeated().collect::<String>())
        .then_ignore(just('|'))
        .map(|s| Literal::Sym(s.into()))
        .labelled("quoted symbol")
}

fn expr_parser<'src>() -> impl Parser<'src, &'src str, Expr, ParserError<'src>> + Clone {
    recursive(|node| {
        let unit = just('(')
            .then(padding())
            .then(just(')'))
            .to(Literal::Unit)
            .labelled("unit");

        let terminal = choice((
            negative_infinity(),
            number(),
            string(),
            word(),
            quoted_symbol(),
            unit,
        )).map(Expr::terminal);

        let composite = text::ascii::ident()
            .then(
                node.padded_by(padding())
                    .repeated()
                    .at_least(1)
                    .collect::<Vec<Expr>>(),
            )
            .delimited_by(just('(').then(padding()), just(')'))
            .try_map(|(name, children): (&str, Vec<Expr>), span| {
                Expr::make(Tag::from_name(name), children)
                    .map_err(|e| Rich::custom(span, e.to_string()))
            })
            .labelled("composite");

        terminal.or(composite)
    })
}

/// Parse a printed tree into an [`Expr`].
///
/// Returns `Err(Vec<String>)` with human-readable diagnostics on failure.
///
/// Example
/// ```
/// use hygram::tree::{Node, Op, Tag, parser::parse};
///
/// let e = parse("(plus 3 (negate 4)) ; comment").unwrap();
/// assert_eq!(e.tag(), &Tag::Op(Op::Plus));
/// assert_eq!(e.to_string(), "(plus 3 (negate 4))");
/// ```
pub fn parse(src: &str) -> Result<Expr, Vec<String>> {
    let (expr, errors) = padding()
        .ignore_then(expr_parser())
        .then_ignore(padding())
        .then_ignore(end())
        .parse(src)
        .into_output_errors();

    if !errors.is_empty() {
        return Err(errors
            .into_iter()
            .map(|e| format!("parse error: {e}"))
            .collect());
    }

    expr.ok_or_else(|| vec!["parse error: no expression produced".to_string()])
}
