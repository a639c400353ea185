//! Structural containers: value tuples, multi-row value lists, assignment
//! lists and joined lists.
//!
//! Containers are self-delimiting, so they carry no precedence. All shape
//! checks happen at construction.

use std::borrow::Cow;
use std::collections::HashSet;
use std::iter;

use crate::component::{impl_display, join, Component, Fragment, Fragments, View};
use crate::error::{ComponentError, Result, UnsafeError};
use crate::expr::{operand_from_component, Operand, SqlExpr, Var};
use crate::safety::check_words;

/// Checks names and rejects duplicates.
fn checked_names(names: Vec<String>) -> Result<Vec<String>> {
    check_words(names.iter().map(String::as_str))?;
    let duplicate = {
        let mut seen = HashSet::with_capacity(names.len());
        names.iter().find(|name| !seen.insert(name.as_str())).cloned()
    };
    match duplicate {
        Some(name) => Err(ComponentError::DuplicateName(name)),
        None => Ok(names),
    }
}

fn named_parts<I, K, T>(pairs: I) -> Result<(Vec<String>, Vec<Operand>)>
where
    I: IntoIterator<Item = (K, T)>,
    K: Into<String>,
    T: Into<Operand>,
{
    let (names, values): (Vec<String>, Vec<Operand>) = pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .unzip();
    if names.is_empty() {
        return Err(ComponentError::Empty);
    }
    Ok((checked_names(names)?, values))
}

/// `name = value, name = value, ...`
fn assignments<'a>(names: &'a [String], values: &'a [Operand]) -> Fragments<'a> {
    Box::new(join(
        names.iter().zip(values).map(|(name, value)| {
            [
                Fragment::text(name),
                Fragment::text(" = "),
                value.fragment(),
            ]
        }),
        ", ",
    ))
}

/// A tuple of values, `($1, $2, ...)`.
///
/// Built either from positional values ([`Values::new`]) or from named
/// values ([`Values::named`]); named tuples also offer the `names` view
/// (`a, b`) and the `set` view (`a = $1, b = $2`).
#[derive(Debug, Clone)]
pub struct Values {
    names: Option<Vec<String>>,
    values: Vec<Operand>,
}

impl Values {
    /// Creates a positional tuple.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Empty`] when `values` is empty.
    pub fn new<I, T>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        let values: Vec<Operand> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ComponentError::Empty);
        }
        Ok(Self {
            names: None,
            values,
        })
    }

    /// Creates a named tuple.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Empty`] when `pairs` is empty,
    /// [`ComponentError::Unsafe`] when a name fails the identifier check and
    /// [`ComponentError::DuplicateName`] when a name repeats.
    pub fn named<I, K, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Operand>,
    {
        let (names, values) = named_parts(pairs)?;
        Ok(Self {
            names: Some(names),
            values,
        })
    }

    /// The names, for named tuples.
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// The values.
    #[must_use]
    pub fn values(&self) -> &[Operand] {
        &self.values
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; empty tuples cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn render_names(&self) -> Result<Fragments<'_>> {
        let names = self.names.as_ref().ok_or(ComponentError::NamesUnavailable)?;
        Ok(Box::new(join(
            names.iter().map(|name| iter::once(Fragment::text(name))),
            ", ",
        )))
    }

    fn render_set(&self) -> Result<Fragments<'_>> {
        let names = self.names.as_ref().ok_or(ComponentError::NamesUnavailable)?;
        Ok(assignments(names, &self.values))
    }
}

impl Component for Values {
    fn render(&self) -> Fragments<'_> {
        let values = join(self.values.iter().map(|v| iter::once(v.fragment())), ", ");
        Box::new(
            iter::once(Fragment::text("("))
                .chain(values)
                .chain(iter::once(Fragment::text(")"))),
        )
    }

    fn render_view(&self, view: View) -> Option<Result<Fragments<'_>, ComponentError>> {
        match view {
            View::Names => Some(self.render_names()),
            View::Set => Some(self.render_set()),
        }
    }
}

/// Several rows of values, `($1, $2), ($3, $4)`, for multi-row INSERTs.
#[derive(Debug, Clone)]
pub struct MultipleValues {
    rows: Vec<Values>,
}

impl MultipleValues {
    /// Creates a row list.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Empty`] without rows,
    /// [`ComponentError::RowNamesMismatch`] when rows are not all named with
    /// the same names in the same order (or all unnamed) and
    /// [`ComponentError::RowLengthMismatch`] when row lengths differ.
    pub fn new(rows: impl IntoIterator<Item = Values>) -> Result<Self> {
        let rows: Vec<Values> = rows.into_iter().collect();
        let first = rows.first().ok_or(ComponentError::Empty)?;
        for row in &rows[1..] {
            if row.names != first.names {
                return Err(ComponentError::RowNamesMismatch {
                    expected: first.names.clone(),
                    found: row.names.clone(),
                });
            }
            if row.len() != first.len() {
                return Err(ComponentError::RowLengthMismatch {
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    /// The rows.
    #[must_use]
    pub fn rows(&self) -> &[Values] {
        &self.rows
    }
}

impl Component for MultipleValues {
    fn render(&self) -> Fragments<'_> {
        Box::new(join(
            self.rows
                .iter()
                .map(|row| iter::once(Fragment::Node(row as &dyn Component))),
            ", ",
        ))
    }

    fn render_view(&self, view: View) -> Option<Result<Fragments<'_>, ComponentError>> {
        match view {
            View::Names => self.rows.first().map(Values::render_names),
            View::Set => None,
        }
    }
}

/// An assignment list, `a = $1, b = $2`, for UPDATE statements.
#[derive(Debug, Clone)]
pub struct SetValues {
    names: Vec<String>,
    values: Vec<Operand>,
}

impl SetValues {
    /// Creates an assignment list.
    ///
    /// # Errors
    ///
    /// Same as [`Values::named`].
    pub fn new<I, K, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Operand>,
    {
        let (names, values) = named_parts(pairs)?;
        Ok(Self { names, values })
    }
}

impl Component for SetValues {
    fn render(&self) -> Fragments<'_> {
        assignments(&self.names, &self.values)
    }
}

/// Items joined by a separator, `", "` unless configured otherwise.
#[derive(Debug, Clone)]
pub struct JoinComponent {
    items: Vec<Operand>,
    separator: Cow<'static, str>,
}

impl JoinComponent {
    /// Joins `items` with `", "`.
    #[must_use]
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            separator: Cow::Borrowed(", "),
        }
    }

    /// Replaces the separator. The separator is trusted text.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<Cow<'static, str>>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Component for JoinComponent {
    fn render(&self) -> Fragments<'_> {
        Box::new(join(
            self.items.iter().map(|item| iter::once(item.fragment())),
            &self.separator,
        ))
    }
}

/// A comma separated list of identifiers, `foo, bar`.
///
/// # Errors
///
/// Returns [`UnsafeError`] for the first name failing the identifier check.
pub fn select_fields<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> std::result::Result<JoinComponent, UnsafeError> {
    let vars = names
        .into_iter()
        .map(Var::new)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(JoinComponent::new(vars))
}

/// A comma separated list of aliased columns, `foo AS x, bar AS y`.
///
/// Takes `(alias, column)` pairs.
///
/// # Errors
///
/// Returns [`UnsafeError`] when an alias or a column fails the identifier
/// check.
pub fn select_aliased<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> std::result::Result<JoinComponent, UnsafeError> {
    let items = pairs
        .into_iter()
        .map(|(alias, column)| Var::new(column)?.as_(alias))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(JoinComponent::new(items))
}

operand_from_component!(Values, MultipleValues, SetValues, JoinComponent);

impl_display!(Values, MultipleValues, SetValues, JoinComponent);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::write_inline;

    fn view(component: &dyn Component, view: View) -> String {
        let mut out = String::new();
        write_inline(component.render_view(view).unwrap().unwrap(), &mut out);
        out
    }

    #[test]
    fn test_values_render() {
        let v = Values::new([1, 2, 3]).unwrap();
        assert_eq!(v.to_string(), "(1, 2, 3)");
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_named_values_views() {
        let v = Values::named([("foo", 1), ("bar", 2)]).unwrap();
        assert_eq!(v.to_string(), "(1, 2)");
        assert_eq!(view(&v, View::Names), "foo, bar");
        assert_eq!(view(&v, View::Set), "foo = 1, bar = 2");
    }

    #[test]
    fn test_positional_values_have_no_names() {
        let v = Values::new([1, 2]).unwrap();
        assert!(matches!(
            v.render_view(View::Names),
            Some(Err(ComponentError::NamesUnavailable))
        ));
        assert!(matches!(
            v.render_view(View::Set),
            Some(Err(ComponentError::NamesUnavailable))
        ));
    }

    #[test]
    fn test_values_construction_errors() {
        assert!(matches!(
            Values::new(Vec::<i32>::new()),
            Err(ComponentError::Empty)
        ));
        assert!(matches!(
            Values::named([(";foobar", "xx")]),
            Err(ComponentError::Unsafe(_))
        ));
        assert!(matches!(
            Values::named([("a", 1), ("a", 2)]),
            Err(ComponentError::DuplicateName(name)) if name == "a"
        ));
    }

    #[test]
    fn test_multiple_values() {
        let rows = MultipleValues::new([
            Values::new([3, 2, 1]).unwrap(),
            Values::new([1, 2, 3]).unwrap(),
        ])
        .unwrap();
        assert_eq!(rows.to_string(), "(3, 2, 1), (1, 2, 3)");
        assert!(rows.render_view(View::Set).is_none());
    }

    #[test]
    fn test_multiple_values_names_view() {
        let rows = MultipleValues::new([
            Values::named([("a", 1), ("b", 2)]).unwrap(),
            Values::named([("a", 3), ("b", 4)]).unwrap(),
        ])
        .unwrap();
        assert_eq!(view(&rows, View::Names), "a, b");
    }

    #[test]
    fn test_multiple_values_row_mismatches() {
        let named = || Values::named([("a", 1), ("b", 2)]).unwrap();

        let err = MultipleValues::new([named(), Values::new([1, 2]).unwrap()]).unwrap_err();
        assert!(matches!(
            err,
            ComponentError::RowNamesMismatch { expected: Some(_), found: None }
        ));

        let swapped = Values::named([("b", 1), ("a", 2)]).unwrap();
        let err = MultipleValues::new([named(), swapped]).unwrap_err();
        assert!(matches!(
            err,
            ComponentError::RowNamesMismatch { found: Some(ref names), .. } if names == &["b", "a"]
        ));

        let err = MultipleValues::new([Values::new([1, 2]).unwrap(), Values::new([3]).unwrap()])
            .unwrap_err();
        assert!(matches!(
            err,
            ComponentError::RowLengthMismatch { expected: 2, found: 1 }
        ));

        assert!(matches!(
            MultipleValues::new(Vec::new()),
            Err(ComponentError::Empty)
        ));
        assert!(MultipleValues::new([named(), named()]).is_ok());
    }

    #[test]
    fn test_set_values() {
        let set = SetValues::new([("foo", 123)]).unwrap();
        assert_eq!(set.to_string(), "foo = 123");
        assert!(SetValues::new([("x y", 1)]).is_err());
    }

    #[test]
    fn test_join_component_separator() {
        let joined = JoinComponent::new([1, 2]).with_separator(" | ");
        assert_eq!(joined.to_string(), "1 | 2");
    }

    #[test]
    fn test_select_helpers() {
        assert_eq!(select_fields(["foo", "bar"]).unwrap().to_string(), "foo, bar");
        assert_eq!(
            select_aliased([("x", "foo"), ("y", "bar")]).unwrap().to_string(),
            "foo AS x, bar AS y"
        );
        assert!(select_fields(["foo", "bar;"]).is_err());
        assert!(select_aliased([("x;", "foo")]).is_err());
    }
}
