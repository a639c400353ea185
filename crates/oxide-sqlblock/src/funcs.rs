//! Function helpers.
//!
//! Calls to fixed built-in names (`upper`, `COUNT`, ...) skip the
//! identifier check; use [`Func::new`] for caller-named functions.

use crate::error::{ComponentError, Result, UnsafeError};
use crate::expr::{Func, Operand, SqlBlock, SqlExpr, Var};

fn fold(
    items: impl IntoIterator<Item = impl Into<Operand>>,
    mut step: impl FnMut(SqlBlock, Operand) -> SqlBlock,
) -> Result<SqlBlock> {
    let mut items = items.into_iter().map(Into::<Operand>::into);
    let first = items.next().ok_or(ComponentError::Empty)?;
    Ok(items.fold(first.into_block(), |acc, item| step(acc, item)))
}

/// `a AND b AND c`
///
/// # Errors
///
/// Returns [`ComponentError::Empty`] when `items` is empty.
pub fn and_all(items: impl IntoIterator<Item = impl Into<Operand>>) -> Result<SqlBlock> {
    fold(items, |acc, item| acc.and(item))
}

/// `a OR b OR c`
///
/// # Errors
///
/// Returns [`ComponentError::Empty`] when `items` is empty.
pub fn or_all(items: impl IntoIterator<Item = impl Into<Operand>>) -> Result<SqlBlock> {
    fold(items, |acc, item| acc.or(item))
}

/// `a, b, c`
///
/// # Errors
///
/// Returns [`ComponentError::Empty`] when `items` is empty.
pub fn comma_sep(items: impl IntoIterator<Item = impl Into<Operand>>) -> Result<SqlBlock> {
    fold(items, |acc, item| acc.comma(item))
}

/// `not(x)`, or `x` when `x` is already negated.
#[must_use]
pub fn not(x: impl Into<Operand>) -> SqlBlock {
    SqlBlock::new(x).not()
}

/// `x::type_name`
///
/// # Errors
///
/// Returns [`UnsafeError`] if `type_name` is not a plain word.
pub fn cast(x: impl Into<Operand>, type_name: &str) -> std::result::Result<SqlBlock, UnsafeError> {
    SqlBlock::new(x).cast(type_name)
}

/// `upper(s)`
#[must_use]
pub fn upper(s: impl Into<Operand>) -> Func {
    Func::builtin("upper", vec![s.into()])
}

/// `lower(s)`
#[must_use]
pub fn lower(s: impl Into<Operand>) -> Func {
    Func::builtin("lower", vec![s.into()])
}

/// `length(s)`
#[must_use]
pub fn length(s: impl Into<Operand>) -> Func {
    Func::builtin("length", vec![s.into()])
}

/// `left(s, n)`
#[must_use]
pub fn left(s: impl Into<Operand>, n: impl Into<Operand>) -> Func {
    Func::builtin("left", vec![s.into(), n.into()])
}

/// `right(s, n)`
#[must_use]
pub fn right(s: impl Into<Operand>, n: impl Into<Operand>) -> Func {
    Func::builtin("right", vec![s.into(), n.into()])
}

/// `|/ n`
#[must_use]
pub fn sqrt(n: impl Into<Operand>) -> SqlBlock {
    SqlBlock::new(n).sqrt()
}

/// `@ n`
#[must_use]
pub fn abs(n: impl Into<Operand>) -> SqlBlock {
    SqlBlock::new(n).abs()
}

/// `n!`
#[must_use]
pub fn factorial(n: impl Into<Operand>) -> SqlBlock {
    SqlBlock::new(n).factorial()
}

/// `position(substring in string)`
#[must_use]
pub fn position(substring: impl Into<Operand>, string: impl Into<Operand>) -> Func {
    let arg = SqlBlock::new(substring).in_(string);
    Func::builtin("position", vec![arg.into()])
}

/// `substring(string from pattern)`, or
/// `substring(string from pattern for count)` when `for_` is given.
#[must_use]
pub fn substring(
    string: impl Into<Operand>,
    pattern: impl Into<Operand>,
    for_: Option<Operand>,
) -> Func {
    let mut arg = SqlBlock::new(string).from_(pattern);
    if let Some(count) = for_ {
        arg = arg.for_(count);
    }
    Func::builtin("substring", vec![arg.into()])
}

/// `extract(field from source)`; build the argument with
/// [`SqlExpr::from_`].
#[must_use]
pub fn extract(expr: impl Into<Operand>) -> Func {
    Func::builtin("extract", vec![expr.into()])
}

/// `COUNT(expr)`
#[must_use]
pub fn count(expr: impl Into<Operand>) -> Func {
    Func::builtin("COUNT", vec![expr.into()])
}

/// `COUNT(*)`
#[must_use]
pub fn count_all() -> Func {
    count(Var::star())
}

/// `any(array)`, typically as `x = any($1)`.
#[must_use]
pub fn any(array: impl Into<Operand>) -> Func {
    Func::builtin("any", vec![array.into()])
}

/// `now()`
#[must_use]
pub fn now() -> Func {
    Func::builtin("now", Vec::new())
}

/// `to_tsvector(text)`
#[must_use]
pub fn to_tsvector(text: impl Into<Operand>) -> Func {
    Func::builtin("to_tsvector", vec![text.into()])
}

/// `to_tsquery(text)`
#[must_use]
pub fn to_tsquery(text: impl Into<Operand>) -> Func {
    Func::builtin("to_tsquery", vec![text.into()])
}

/// `coalesce(a, b, ...)`
#[must_use]
pub fn coalesce(items: impl IntoIterator<Item = impl Into<Operand>>) -> Func {
    Func::builtin("coalesce", items.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{val, var};

    #[test]
    fn test_folds() {
        assert_eq!(and_all(["a", "b", "c"]).unwrap().to_string(), "'a' AND 'b' AND 'c'");
        let grouped = and_all([
            Operand::from("a"),
            var("c").unwrap().or(var("d").unwrap()).into(),
        ])
        .unwrap();
        assert_eq!(grouped.to_string(), "'a' AND (c OR d)");
        assert!(matches!(
            or_all(Vec::<i32>::new()),
            Err(ComponentError::Empty)
        ));
    }

    #[test]
    fn test_single_item_fold_is_unfilled() {
        let block = comma_sep([1]).unwrap();
        assert!(block.operator().is_none());
        assert_eq!(block.to_string(), "1");
    }

    #[test]
    fn test_not_cancels() {
        let once = not(val(1).modulo(2));
        assert_eq!(once.to_string(), "not(1 % 2)");
        assert_eq!(not(once).to_string(), "1 % 2");
    }

    #[test]
    fn test_builtin_calls() {
        assert_eq!(count_all().to_string(), "COUNT(*)");
        assert_eq!(now().to_string(), "now()");
        assert_eq!(position("a", "b").to_string(), "position('a' in 'b')");
        assert_eq!(substring("a", "b", None).to_string(), "substring('a' from 'b')");
        assert_eq!(
            substring("x", 2, Some(3.into())).to_string(),
            "substring('x' from 2 for 3)"
        );
        assert_eq!(coalesce([Operand::from(var("a").unwrap()), 0.into()]).to_string(), "coalesce(a, 0)");
    }

    #[test]
    fn test_cast_checks_type_name() {
        assert_eq!(cast(1, "int").unwrap().to_string(), "1::int");
        assert!(cast(1, "int; drop").is_err());
    }
}
