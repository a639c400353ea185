//! Statement clauses (`SELECT ...`, `FROM ...`, `WHERE ...`).
//!
//! A [`Clause`] is a keyword followed by a body. Clauses combine with `+`
//! into [`Clauses`], rendered one per line:
//!
//! ```
//! use oxide_sqlblock::clauses::{from, join};
//!
//! let q = from(["a"])? + join("b", None)? + join("c", None)?;
//! assert_eq!(q.to_string(), "FROM a\nJOIN b\nJOIN c");
//! # Ok::<(), oxide_sqlblock::ComponentError>(())
//! ```

use std::iter;
use std::ops::Add;

use crate::component::{impl_display, join as join_fragments, Component, Fragment, Fragments};
use crate::containers::JoinComponent;
use crate::error::Result;
use crate::expr::{operand_from_component, Func, Operand, RawDangerous, SqlBlock, SqlExpr, Var};
use crate::funcs::comma_sep;

/// An item of a comma separated clause: a bare name, checked as an
/// identifier, or any expression.
#[derive(Debug, Clone)]
pub enum Field {
    /// Identifier, validated when the clause is built.
    Name(String),
    /// Expression used as is.
    Expr(Operand),
}

impl Field {
    fn into_operand(self) -> Result<Operand> {
        match self {
            Self::Name(name) => Ok(Var::new(name)?.into()),
            Self::Expr(operand) => Ok(operand),
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::Name(String::from(name))
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Operand> for Field {
    fn from(operand: Operand) -> Self {
        Self::Expr(operand)
    }
}

macro_rules! field_from_expr {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(expr: $ty) -> Self {
                    Self::Expr(expr.into())
                }
            }
        )+
    };
}

field_from_expr!(SqlBlock, Var, Func, RawDangerous, JoinComponent);

/// A keyword followed by its body.
#[derive(Debug, Clone)]
pub struct Clause {
    keyword: &'static str,
    body: Operand,
}

impl Clause {
    fn new(keyword: &'static str, body: impl Into<Operand>) -> Self {
        Self {
            keyword,
            body: body.into(),
        }
    }

    fn comma(keyword: &'static str, fields: impl IntoIterator<Item = impl Into<Field>>) -> Result<Self> {
        let operands = fields
            .into_iter()
            .map(|field| Into::<Field>::into(field).into_operand())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(keyword, comma_sep(operands)?))
    }

    fn join(keyword: &'static str, table: &str, on: Option<SqlBlock>) -> Result<Self> {
        let table = Var::word(table)?;
        let body = match on {
            Some(condition) => table.on(condition),
            None => SqlBlock::new(table),
        };
        Ok(Self::new(keyword, body))
    }

    /// The clause keyword, e.g. `ORDER BY`.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        self.keyword
    }
}

impl Component for Clause {
    fn render(&self) -> Fragments<'_> {
        Box::new(
            [
                Fragment::text(self.keyword),
                Fragment::text(" "),
                self.body.fragment(),
            ]
            .into_iter(),
        )
    }
}

/// Clauses rendered newline separated.
#[derive(Debug, Clone, Default)]
pub struct Clauses {
    clauses: Vec<Clause>,
}

impl Clauses {
    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// `true` without clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Component for Clauses {
    fn render(&self) -> Fragments<'_> {
        Box::new(join_fragments(
            self.clauses
                .iter()
                .map(|clause| iter::once(Fragment::Node(clause as &dyn Component))),
            "\n",
        ))
    }
}

impl Add for Clause {
    type Output = Clauses;

    fn add(self, rhs: Self) -> Clauses {
        Clauses {
            clauses: vec![self, rhs],
        }
    }
}

impl Add<Clause> for Clauses {
    type Output = Self;

    fn add(mut self, rhs: Clause) -> Self {
        self.clauses.push(rhs);
        self
    }
}

impl FromIterator<Clause> for Clauses {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

operand_from_component!(Clause, Clauses);

impl_display!(Clause, Clauses);

/// `SELECT a, b`
///
/// # Errors
///
/// Returns [`crate::ComponentError::Unsafe`] for an invalid name and
/// [`crate::ComponentError::Empty`] without fields.
pub fn select(fields: impl IntoIterator<Item = impl Into<Field>>) -> Result<Clause> {
    Clause::comma("SELECT", fields)
}

/// `FROM a, b`
///
/// # Errors
///
/// Same as [`select`].
pub fn from(tables: impl IntoIterator<Item = impl Into<Field>>) -> Result<Clause> {
    Clause::comma("FROM", tables)
}

/// `GROUP BY a, b`
///
/// # Errors
///
/// Same as [`select`].
pub fn group_by(fields: impl IntoIterator<Item = impl Into<Field>>) -> Result<Clause> {
    Clause::comma("GROUP BY", fields)
}

/// `ORDER BY a, b DESC`
///
/// # Errors
///
/// Same as [`select`].
pub fn order_by(fields: impl IntoIterator<Item = impl Into<Field>>) -> Result<Clause> {
    Clause::comma("ORDER BY", fields)
}

/// `JOIN table [ON condition]`
///
/// # Errors
///
/// Returns [`crate::ComponentError::Unsafe`] for an invalid table name.
pub fn join(table: &str, on: Option<SqlBlock>) -> Result<Clause> {
    Clause::join("JOIN", table, on)
}

/// `LEFT JOIN table [ON condition]`
///
/// # Errors
///
/// Same as [`join`].
pub fn left_join(table: &str, on: Option<SqlBlock>) -> Result<Clause> {
    Clause::join("LEFT JOIN", table, on)
}

/// `RIGHT JOIN table [ON condition]`
///
/// # Errors
///
/// Same as [`join`].
pub fn right_join(table: &str, on: Option<SqlBlock>) -> Result<Clause> {
    Clause::join("RIGHT JOIN", table, on)
}

/// `FULL JOIN table [ON condition]`
///
/// # Errors
///
/// Same as [`join`].
pub fn full_join(table: &str, on: Option<SqlBlock>) -> Result<Clause> {
    Clause::join("FULL JOIN", table, on)
}

/// `CROSS JOIN table`
///
/// # Errors
///
/// Same as [`join`].
pub fn cross_join(table: &str) -> Result<Clause> {
    Clause::join("CROSS JOIN", table, None)
}

/// `WHERE condition`
#[must_use]
pub fn where_(condition: impl Into<Operand>) -> Clause {
    Clause::new("WHERE", condition)
}

/// `HAVING condition`
#[must_use]
pub fn having(condition: impl Into<Operand>) -> Clause {
    Clause::new("HAVING", condition)
}

/// `LIMIT n`, `n` bound as a parameter unless it is an expression.
#[must_use]
pub fn limit(n: impl Into<Operand>) -> Clause {
    Clause::new("LIMIT", n)
}

/// `OFFSET n`
#[must_use]
pub fn offset(n: impl Into<Operand>) -> Clause {
    Clause::new("OFFSET", n)
}
