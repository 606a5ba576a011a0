//! Expression trees: the node interface consumed by the engines and a concrete tree.
//!
//! Role
//! - [`Node`] is the only capability the matching and evaluation engines require from a
//!   tree: inspect the tag, the arity, the children or the held value, and rebuild a node
//!   from a tag and children.
//! - [`Expr`] is the tree shipped with this crate. Nodes are immutable and share their
//!   children through an `Arc`, so cloning a subtree is O(1).
//!
//! Every node carries a [`Tag`]. Terminals (arity 0) always carry [`Op::Terminal`] and a
//! [`Literal`]; composites carry one or more children.
//!
//! Example
//! ```
//! use hygram::tree::{Expr, Node, Op, Tag};
//!
//! let e = Expr::lit(3) + Expr::lit(4);
//! assert_eq!(e.tag(), &Tag::Op(Op::Plus));
//! assert_eq!(e.arity(), 2);
//! assert_eq!(e.to_string(), "(plus 3 4)");
//! ```
pub mod build;
pub mod parser;

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use strum::{Display, EnumDiscriminants, EnumIter, EnumString, IntoStaticStr};

use crate::error::{TransformError, TransformResult};

/// Builtin node kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Op {
    // Leaf
    Terminal,

    // Unary
    Negate,
    LogicalNot,
    Complement,

    // Binary
    Plus,
    Minus,
    Multiplies,
    Divides,
    Modulus,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    EqualTo,
    NotEqualTo,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    Assign,
    Subscript,
    Comma,

    // Ternary
    IfElse,

    // Variadic
    Function,
}

impl Op {
    /// Fixed number of children of a node with this tag, `None` for variadic tags.
    pub fn arity(self) -> Option<usize> {
        use Op::*;

        match self {
            Terminal => Some(0),
            Negate | LogicalNot | Complement => Some(1),
            Plus | Minus | Multiplies | Divides | Modulus | Less | LessEqual | Greater
            | GreaterEqual | EqualTo | NotEqualTo | LogicalAnd | LogicalOr | BitwiseAnd
            | BitwiseOr | BitwiseXor | ShiftLeft | ShiftRight | Assign | Subscript | Comma => {
                Some(2)
            }
            IfElse => Some(3),
            Function => None,
        }
    }
}

/// Node discriminator: a builtin [`Op`] or a user extension identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Op(Op),
    User(Arc<str>),
}

static TERMINAL_TAG: Tag = Tag::Op(Op::Terminal);

impl Tag {
    pub fn user(name: impl Into<Arc<str>>) -> Self {
        Tag::User(name.into())
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Tag::Op(Op::Terminal))
    }

    #[inline]
    pub fn as_op(&self) -> Option<Op> {
        match self {
            Tag::Op(op) => Some(*op),
            Tag::User(_) => None,
        }
    }

    /// Parse a tag name: builtin names map to [`Tag::Op`], anything else is a user tag.
    pub fn from_name(name: &str) -> Self {
        name.parse::<Op>()
            .map(Tag::Op)
            .unwrap_or_else(|_| Tag::user(name))
    }
}

impl From<Op> for Tag {
    fn from(op: Op) -> Self {
        Tag::Op(op)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Op(op) => write!(f, "{op}"),
            Tag::User(name) => f.write_str(name),
        }
    }
}

/// Value held by a terminal node.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(LiteralKind), derive(Hash, EnumIter, Display))]
pub enum Literal {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// Named placeholder such as a variable.
    Sym(Arc<str>),
}

impl Literal {
    #[inline]
    pub fn kind(&self) -> LiteralKind {
        LiteralKind::from(self)
    }

    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Literal::Str(s.into())
    }

    pub fn sym(s: impl Into<Arc<str>>) -> Self {
        Literal::Sym(s.into())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Literal::Float(x) => Some(*x),
            Literal::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value as i64)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.into())
    }
}

impl From<()> for Literal {
    fn from(_: ()) -> Self {
        Literal::Unit
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Unit => f.write_str("()"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) if x.is_nan() => f.write_str("nan"),
            Literal::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
            }
            // Debug keeps the fractional part (`3.0`) or an exponent (`1e20`).
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Literal::Sym(s) if is_plain_symbol(s) => f.write_str(s),
            Literal::Sym(s) => {
                f.write_str("|")?;
                for c in s.chars() {
                    match c {
                        '|' => f.write_str("\\|")?,
                        '\\' => f.write_str("\\\\")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("|")
            }
        }
    }
}

/// Words the parser reads as literals rather than symbols.
pub const RESERVED_WORDS: [&str; 4] = ["true", "false", "inf", "nan"];

/// Whether a symbol prints bare: an ASCII identifier that is not a reserved word.
/// Other symbols print between `|` bars.
pub fn is_plain_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    head_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_WORDS.contains(&s)
}

/// Capabilities the engines need from an expression tree.
///
/// Implementors must keep `arity()` and the number of reachable children in agreement,
/// and `value()` must be `Some` exactly for arity-0 nodes. Nodes are owned handles
/// (`'static`) since actions may capture them in functions and constants.
pub trait Node: Clone + fmt::Debug + 'static {
    fn tag(&self) -> &Tag;

    fn arity(&self) -> usize;

    fn child(&self, index: usize) -> Option<&Self>;

    /// Held value of a terminal, `None` for composites.
    fn value(&self) -> Option<&Literal>;

    /// Build a terminal holding `value`.
    fn terminal(value: Literal) -> Self;

    /// Build a composite node. Fails when the tree representation cannot hold the shape.
    fn make(tag: Tag, children: Vec<Self>) -> TransformResult<Self>;

    #[inline]
    fn is_terminal(&self) -> bool {
        self.arity() == 0
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        (0..self.arity()).filter_map(move |i| self.child(i))
    }

    fn signature(&self) -> Signature {
        Signature::of(self)
    }

    /// Structural equality: same tags, same held values and pairwise equal children.
    fn same_structure(&self, other: &Self) -> bool {
        let mut stack: SmallVec<(&Self, &Self), 12> = SmallVec::new();
        stack.push((self, other));

        while let Some((a, b)) = stack.pop() {
            if a.tag() != b.tag() || a.arity() != b.arity() || a.value() != b.value() {
                return false;
            }
            for (ac, bc) in a.children().zip(b.children()) {
                stack.push((ac, bc));
            }
        }

        true
    }
}

/// Type-like description of a node: its tag, the kind of its held value and the
/// signatures of its children. Held values do not take part, so `3` and `4` share
/// one signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    tag: Tag,
    kind: Option<LiteralKind>,
    children: Vec<Signature>,
}

impl Signature {
    pub fn of<N: Node>(node: &N) -> Self {
        Signature {
            tag: node.tag().clone(),
            kind: node.value().map(Literal::kind),
            children: node.children().map(Signature::of).collect(),
        }
    }

    pub fn terminal(kind: LiteralKind) -> Self {
        Signature {
            tag: TERMINAL_TAG.clone(),
            kind: Some(kind),
            children: Vec::new(),
        }
    }

    pub fn node(tag: impl Into<Tag>, children: Vec<Signature>) -> Self {
        Signature {
            tag: tag.into(),
            kind: None,
            children,
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn kind(&self) -> Option<LiteralKind> {
        self.kind
    }

    pub fn children(&self) -> &[Signature] {
        &self.children
    }

    /// Whether `node` has exactly this signature, without allocating.
    pub fn describes<N: Node>(&self, node: &N) -> bool {
        self.tag == *node.tag()
            && self.kind == node.value().map(Literal::kind)
            && self.children.len() == node.arity()
            && self
                .children
                .iter()
                .zip(node.children())
                .all(|(s, c)| s.describes(c))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{kind}"),
            None => {
                write!(f, "({}", self.tag)?;
                for child in &self.children {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug)]
enum ExprKind {
    Terminal(Literal),
    Composite {
        tag: Tag,
        children: SmallVec<Expr, 3>,
    },
}

/// Immutable expression tree shipped with this crate.
///
/// Equality semantics
/// - [`Expr`] compares by structure. Two nodes sharing the same allocation short-circuit
///   to `true`; otherwise tags, held values and children are compared.
#[derive(Clone)]
pub struct Expr(Arc<ExprKind>);

impl Expr {
    pub fn lit(value: impl Into<Literal>) -> Self {
        Expr::terminal(value.into())
    }

    pub fn sym(name: impl Into<Arc<str>>) -> Self {
        Expr::terminal(Literal::Sym(name.into()))
    }

    pub fn unary(op: Op, operand: Expr) -> Self {
        debug_assert_eq!(op.arity(), Some(1), "`{op}` is not a unary tag");
        Expr::composite(Tag::Op(op), [operand].into_iter().collect())
    }

    pub fn binary(op: Op, lhs: Expr, rhs: Expr) -> Self {
        debug_assert_eq!(op.arity(), Some(2), "`{op}` is not a binary tag");
        Expr::composite(Tag::Op(op), [lhs, rhs].into_iter().collect())
    }

    pub fn ternary(op: Op, first: Expr, second: Expr, third: Expr) -> Self {
        debug_assert_eq!(op.arity(), Some(3), "`{op}` is not a ternary tag");
        Expr::composite(Tag::Op(op), [first, second, third].into_iter().collect())
    }

    /// Build a composite with any tag, validating the shape.
    pub fn nary(tag: impl Into<Tag>, children: Vec<Expr>) -> TransformResult<Self> {
        <Expr as Node>::make(tag.into(), children)
    }

    fn composite(tag: Tag, children: SmallVec<Expr, 3>) -> Self {
        Expr(Arc::new(ExprKind::Composite { tag, children }))
    }

    /// Whether both handles point to the very same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of nodes in this tree.
    pub fn size(&self) -> usize {
        1 + self.children().map(Expr::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children().map(Expr::depth).max().unwrap_or(0)
    }
}

impl Node for Expr {
    #[inline]
    fn tag(&self) -> &Tag {
        match &*self.0 {
            ExprKind::Terminal(_) => &TERMINAL_TAG,
            ExprKind::Composite { tag, .. } => tag,
        }
    }

    #[inline]
    fn arity(&self) -> usize {
        match &*self.0 {
            ExprKind::Terminal(_) => 0,
            ExprKind::Composite { children, .. } => children.len(),
        }
    }

    #[inline]
    fn child(&self, index: usize) -> Option<&Self> {
        match &*self.0 {
            ExprKind::Terminal(_) => None,
            ExprKind::Composite { children, .. } => children.get(index),
        }
    }

    #[inline]
    fn value(&self) -> Option<&Literal> {
        match &*self.0 {
            ExprKind::Terminal(value) => Some(value),
            ExprKind::Composite { .. } => None,
        }
    }

    fn terminal(value: Literal) -> Self {
        Expr(Arc::new(ExprKind::Terminal(value)))
    }

    fn make(tag: Tag, children: Vec<Self>) -> TransformResult<Self> {
        if tag.is_terminal() {
            return Err(TransformError::InvalidNode {
                tag,
                reason: "terminals hold a value, not children".to_string(),
            });
        }
        if children.is_empty() {
            return Err(TransformError::InvalidNode {
                tag,
                reason: "composite nodes need at least one child".to_string(),
            });
        }
        if let Some(expected) = tag.as_op().and_then(Op::arity) {
            if expected != children.len() {
                return Err(TransformError::InvalidNode {
                    reason: format!("expected {expected} children, got {}", children.len()),
                    tag,
                });
            }
        }
        Ok(Expr::composite(tag, children.into_iter().collect()))
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.same_structure(other)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}

impl From<Literal> for Expr {
    fn from(value: Literal) -> Self {
        Expr::terminal(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::lit(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::lit(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::lit(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::lit(value)
    }
}
