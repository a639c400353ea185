//! Expression nodes.
//!
//! [`SqlBlock`] is the operation node. It starts out holding a single
//! operand; the first operator applied to it fills it in place, every later
//! operator wraps it as the left operand of a new block. Chains such as
//! `x + 4 + 2 + 1` therefore nest to the left and, since equal ranks are
//! never parenthesized, render flat.
//!
//! Builder methods take `self` by value. A block that should appear in two
//! trees has to be cloned explicitly; the clones share rendered text but no
//! state, so combining one never changes the other.

use std::borrow::Cow;
use std::iter;
use std::sync::Arc;

use crate::component::{impl_display, single, Component, Fragment, Fragments};
use crate::error::UnsafeError;
use crate::precedence::{Fixity, Operator};
use crate::safety::{check_column, check_word};
use crate::value::{SqlValue, ToSqlValue};

/// An owned child of an expression node.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A value bound as a parameter.
    Param(SqlValue),
    /// A nested operation.
    Block(Box<SqlBlock>),
    /// Any other component (identifiers, functions, containers, ...).
    Component(Arc<dyn Component>),
}

impl Operand {
    /// Wraps an arbitrary component.
    #[must_use]
    pub fn component(component: impl Component + 'static) -> Self {
        Self::Component(Arc::new(component))
    }

    /// The fragment standing for this operand.
    #[must_use]
    pub fn fragment(&self) -> Fragment<'_> {
        match self {
            Self::Param(value) => Fragment::Param(value),
            Self::Block(block) => Fragment::Node(block.as_ref()),
            Self::Component(component) => Fragment::Node(component.as_ref()),
        }
    }

    /// Rank of the operand's top-level operator.
    #[must_use]
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Self::Param(_) => None,
            Self::Block(block) => block.precedence(),
            Self::Component(component) => component.precedence(),
        }
    }

    /// `true` when the rendered operand starts with a unary minus.
    fn leads_with_neg(&self) -> bool {
        let Self::Block(block) = self else {
            return false;
        };
        match &block.op {
            None => block.v1.leads_with_neg(),
            Some(Operator::Neg) => true,
            Some(op) => match op.fixity() {
                Fixity::Infix | Fixity::Postfix => {
                    !needs_parens(&block.v1, op.precedence()) && block.v1.leads_with_neg()
                }
                Fixity::Prefix | Fixity::Wrap => false,
            },
        }
    }

    /// Turns the operand into a block, unwrapping nested blocks.
    #[must_use]
    pub fn into_block(self) -> SqlBlock {
        match self {
            Self::Block(block) => *block,
            other => SqlBlock {
                v1: other,
                op: None,
                v2: None,
            },
        }
    }
}

impl<T: ToSqlValue> From<T> for Operand {
    fn from(value: T) -> Self {
        Self::Param(value.to_sql_value())
    }
}

impl From<SqlBlock> for Operand {
    fn from(block: SqlBlock) -> Self {
        Self::Block(Box::new(block))
    }
}

impl From<Arc<dyn Component>> for Operand {
    fn from(component: Arc<dyn Component>) -> Self {
        Self::Component(component)
    }
}

macro_rules! operand_from_component {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(component: $ty) -> Self {
                    Self::component(component)
                }
            }
        )+
    };
}
pub(crate) use operand_from_component;

operand_from_component!(Var, RawDangerous, Empty, Func);

/// A binary, prefix, postfix or wrapping operation.
#[derive(Debug, Clone)]
pub struct SqlBlock {
    v1: Operand,
    op: Option<Operator>,
    v2: Option<Operand>,
}

impl SqlBlock {
    /// Creates an unfilled block around a value or component.
    #[must_use]
    pub fn new(value: impl Into<Operand>) -> Self {
        value.into().into_block()
    }

    /// Applies a caller-supplied operator, typically a [`RawDangerous`]
    /// token, with `rhs` as the right operand.
    #[must_use]
    pub fn operate(self, op: impl Into<Operator>, rhs: impl Into<Operand>) -> Self {
        self.apply(op.into(), Some(rhs.into()))
    }

    /// Returns the operator, if the block has been filled.
    #[must_use]
    pub const fn operator(&self) -> Option<&Operator> {
        self.op.as_ref()
    }

    /// Fill-or-wrap.
    pub(crate) fn apply(self, op: Operator, rhs: Option<Operand>) -> Self {
        if self.op.is_none() {
            Self {
                v1: self.v1,
                op: Some(op),
                v2: rhs,
            }
        } else {
            Self {
                v1: Operand::Block(Box::new(self)),
                op: Some(op),
                v2: rhs,
            }
        }
    }

    /// `not(self)`, unwrapping instead when `self` is already a negation.
    pub(crate) fn negate(self) -> Self {
        if matches!(self.op, Some(Operator::Not)) {
            return self.v1.into_block();
        }
        self.apply(Operator::Not, None)
    }
}

fn needs_parens(operand: &Operand, outer: u8) -> bool {
    operand.precedence().is_some_and(|inner| outer > inner)
}

/// Pushes `operand`, parenthesized when `outer` binds tighter or `force` is set.
fn push_operand<'a>(out: &mut Vec<Fragment<'a>>, operand: &'a Operand, outer: u8, force: bool) {
    if force || needs_parens(operand, outer) {
        out.push(Fragment::text("("));
        out.push(operand.fragment());
        out.push(Fragment::text(")"));
    } else {
        out.push(operand.fragment());
    }
}

impl Component for SqlBlock {
    fn render(&self) -> Fragments<'_> {
        let Some(op) = &self.op else {
            return single(self.v1.fragment());
        };
        let rank = op.precedence();
        let token = Fragment::Text(Cow::Borrowed(op.token()));
        let mut out = Vec::with_capacity(7);
        match op.fixity() {
            Fixity::Wrap => {
                out.push(token);
                out.push(Fragment::text("("));
                out.push(self.v1.fragment());
                out.push(Fragment::text(")"));
            }
            Fixity::Prefix => {
                // `--` would start a line comment.
                let force = matches!(op, Operator::Neg) && self.v1.leads_with_neg();
                out.push(token);
                push_operand(&mut out, &self.v1, rank, force);
            }
            Fixity::Postfix => {
                push_operand(&mut out, &self.v1, rank, false);
                out.push(token);
            }
            Fixity::Infix => {
                push_operand(&mut out, &self.v1, rank, false);
                out.push(token);
                if let Some(v2) = &self.v2 {
                    push_operand(&mut out, v2, rank, false);
                }
            }
        }
        Box::new(out.into_iter())
    }

    fn precedence(&self) -> Option<u8> {
        match &self.op {
            None => self.v1.precedence(),
            Some(op) if op.fixity() == Fixity::Wrap => None,
            Some(op) => Some(op.precedence()),
        }
    }
}

/// Operator builders available on every expression node.
///
/// Each method converts the receiver into a [`SqlBlock`] and applies the
/// operator following the fill-or-wrap rule.
#[allow(clippy::should_implement_trait)]
pub trait SqlExpr: Sized {
    /// Converts the node into a block.
    fn into_block(self) -> SqlBlock;

    /// `self = rhs`
    fn eq(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Eq, Some(rhs.into()))
    }

    /// `self != rhs`
    fn ne(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Ne, Some(rhs.into()))
    }

    /// `self < rhs`
    fn lt(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Lt, Some(rhs.into()))
    }

    /// `self <= rhs`
    fn le(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Le, Some(rhs.into()))
    }

    /// `self > rhs`
    fn gt(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Gt, Some(rhs.into()))
    }

    /// `self >= rhs`
    fn ge(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Ge, Some(rhs.into()))
    }

    /// `self + rhs`
    fn add(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Add, Some(rhs.into()))
    }

    /// `self - rhs`
    fn sub(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Sub, Some(rhs.into()))
    }

    /// `self * rhs`
    fn mul(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Mul, Some(rhs.into()))
    }

    /// `self / rhs`
    fn div(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Div, Some(rhs.into()))
    }

    /// `self % rhs`
    fn modulo(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Mod, Some(rhs.into()))
    }

    /// `self ^ rhs`
    fn pow(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Pow, Some(rhs.into()))
    }

    /// `self @> rhs`
    fn contains(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Contains, Some(rhs.into()))
    }

    /// `self <@ rhs`
    fn contained_by(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::ContainedBy, Some(rhs.into()))
    }

    /// `self && rhs`
    fn overlap(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Overlap, Some(rhs.into()))
    }

    /// `self LIKE rhs`
    fn like(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Like, Some(rhs.into()))
    }

    /// `self ILIKE rhs`
    fn ilike(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Ilike, Some(rhs.into()))
    }

    /// `self || rhs`
    fn cat(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Cat, Some(rhs.into()))
    }

    /// `self in rhs`
    fn in_(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::In, Some(rhs.into()))
    }

    /// `self from rhs`, for `substring`/`extract` arguments.
    fn from_(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::From, Some(rhs.into()))
    }

    /// `self for rhs`, for `substring` arguments.
    fn for_(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::For, Some(rhs.into()))
    }

    /// `self AT TIME ZONE rhs`
    fn at_time_zone(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::AtTimeZone, Some(rhs.into()))
    }

    /// `self @@ rhs`
    fn matches(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Matches, Some(rhs.into()))
    }

    /// `self is rhs`
    fn is(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Is, Some(rhs.into()))
    }

    /// `self is not rhs`
    fn is_not(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::IsNot, Some(rhs.into()))
    }

    /// `self AND rhs`
    fn and(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::And, Some(rhs.into()))
    }

    /// `self OR rhs`
    fn or(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Or, Some(rhs.into()))
    }

    /// `self, rhs`
    fn comma(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::Comma, Some(rhs.into()))
    }

    /// `self ON rhs`, for join conditions.
    fn on(self, rhs: impl Into<Operand>) -> SqlBlock {
        self.into_block().apply(Operator::On, Some(rhs.into()))
    }

    /// `self::type_name`
    ///
    /// # Errors
    ///
    /// Returns [`UnsafeError`] if `type_name` is not a plain word.
    fn cast(self, type_name: &str) -> Result<SqlBlock, UnsafeError> {
        let ty = Var::word(type_name)?;
        Ok(self.into_block().apply(Operator::Cast, Some(ty.into())))
    }

    /// `self AS alias`
    ///
    /// # Errors
    ///
    /// Returns [`UnsafeError`] if `alias` is not a plain word.
    fn as_(self, alias: &str) -> Result<SqlBlock, UnsafeError> {
        let alias = Var::word(alias)?;
        Ok(self.into_block().apply(Operator::As, Some(alias.into())))
    }

    /// `self ASC`
    fn asc(self) -> SqlBlock {
        self.into_block().apply(Operator::Asc, None)
    }

    /// `self DESC`
    fn desc(self) -> SqlBlock {
        self.into_block().apply(Operator::Desc, None)
    }

    /// `-self`
    fn neg(self) -> SqlBlock {
        self.into_block().apply(Operator::Neg, None)
    }

    /// `|/ self`
    fn sqrt(self) -> SqlBlock {
        self.into_block().apply(Operator::Sqrt, None)
    }

    /// `@ self`
    fn abs(self) -> SqlBlock {
        self.into_block().apply(Operator::Abs, None)
    }

    /// `self!`
    fn factorial(self) -> SqlBlock {
        self.into_block().apply(Operator::Factorial, None)
    }

    /// `not(self)`. Negating a negation returns the inner expression.
    fn not(self) -> SqlBlock {
        self.into_block().negate()
    }
}

impl SqlExpr for SqlBlock {
    fn into_block(self) -> SqlBlock {
        self
    }
}

/// A validated identifier: a column, table, type or `*`.
#[derive(Debug, Clone)]
pub struct Var {
    name: String,
}

impl Var {
    /// Creates a column reference: a word, `*` or `table.*`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsafeError`] if `name` contains anything but word
    /// characters and `.`, apart from a lone or trailing `*`.
    pub fn new(name: impl Into<String>) -> Result<Self, UnsafeError> {
        let name = name.into();
        check_column(&name)?;
        Ok(Self { name })
    }

    /// Creates a table, type or alias name, where `*` is not allowed.
    pub(crate) fn word(name: impl Into<String>) -> Result<Self, UnsafeError> {
        let name = name.into();
        check_word(&name)?;
        Ok(Self { name })
    }

    /// `*`, all columns.
    #[must_use]
    pub fn star() -> Self {
        Self {
            name: String::from("*"),
        }
    }

    /// The identifier text.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Component for Var {
    fn render(&self) -> Fragments<'_> {
        single(Fragment::text(&self.name))
    }
}

/// Trusted SQL text inserted verbatim, bypassing the identifier check.
///
/// Never build one from user input.
#[derive(Debug, Clone)]
pub struct RawDangerous {
    text: String,
}

impl RawDangerous {
    /// Wraps trusted text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub(crate) fn into_inner(self) -> String {
        self.text
    }
}

impl Component for RawDangerous {
    fn render(&self) -> Fragments<'_> {
        single(Fragment::text(&self.text))
    }
}

/// Renders nothing; `Empty.and(x)` renders ` AND x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl Component for Empty {
    fn render(&self) -> Fragments<'_> {
        Box::new(iter::empty())
    }
}

/// A function call, `name(arg, arg, ...)`.
#[derive(Debug, Clone)]
pub struct Func {
    name: Cow<'static, str>,
    args: Vec<Operand>,
}

impl Func {
    /// Creates a call to a caller-named function.
    ///
    /// # Errors
    ///
    /// Returns [`UnsafeError`] if `name` is not a plain word.
    pub fn new<I, T>(name: &str, args: I) -> Result<Self, UnsafeError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        check_word(name)?;
        Ok(Self {
            name: Cow::Owned(String::from(name)),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates a call to one of the built-in functions.
    pub(crate) fn builtin(name: &'static str, args: Vec<Operand>) -> Self {
        Self {
            name: Cow::Borrowed(name),
            args,
        }
    }

    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Component for Func {
    fn render(&self) -> Fragments<'_> {
        let args = crate::component::join(
            self.args.iter().map(|arg| iter::once(arg.fragment())),
            ", ",
        );
        Box::new(
            iter::once(Fragment::text(&self.name))
                .chain(iter::once(Fragment::text("(")))
                .chain(args)
                .chain(iter::once(Fragment::text(")"))),
        )
    }
}

macro_rules! sql_expr_via_component {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl SqlExpr for $ty {
                fn into_block(self) -> SqlBlock {
                    SqlBlock::new(self)
                }
            }
        )+
    };
}

sql_expr_via_component!(Var, RawDangerous, Empty, Func);

impl_display!(SqlBlock, Var, RawDangerous, Empty, Func);

/// Wraps any value or component in an unfilled block.
///
/// Plain values become parameters: `val(1).gt(2)` renders `$1 > $2`.
#[must_use]
pub fn val(value: impl Into<Operand>) -> SqlBlock {
    SqlBlock::new(value)
}

/// Creates a block around a validated identifier.
///
/// # Errors
///
/// Returns [`UnsafeError`] if `name` is not a plain word.
pub fn var(name: &str) -> Result<SqlBlock, UnsafeError> {
    Ok(SqlBlock::new(Var::new(name)?))
}
