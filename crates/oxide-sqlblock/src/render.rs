//! The template renderer.
//!
//! Placeholders in a template are resolved against a [`Context`], flattened
//! depth first, and replaced by literal SQL text and positional parameters
//! (`$1`, `$2`, ...). Parameters are deduplicated by origin: the context
//! variable, the view and the fragment index path leading to the value.
//! Referencing the same variable twice reuses its placeholders, two
//! variables holding equal values do not share any.
//!
//! ```
//! use oxide_sqlblock::{render, Context, Values};
//!
//! let ctx = Context::new()
//!     .with("a", Values::new([1, 2])?)
//!     .with("b", 7);
//! let (sql, params) = render("x in :a and y = :b and z in :a", &ctx)?;
//! assert_eq!(sql, "x in ($1, $2) and y = $3 and z in ($1, $2)");
//! assert_eq!(params.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::component::{single, Component, Fragment, Fragments, View};
use crate::error::{BuildError, PatternError};
use crate::expr::Operand;
use crate::value::SqlValue;

/// Default placeholder pattern: `:name`, where `::name` (a cast) is left
/// untouched.
pub const DEFAULT_PATTERN: &str = r"(?P<skip>:)?:(?P<key>[a-z][a-z0-9_]*)";

/// Default separator between a variable and a view name, `:values__names`.
pub const DEFAULT_SEPARATOR: &str = "__";

static DEFAULT_RENDERER: LazyLock<Renderer> = LazyLock::new(Renderer::default);

/// Values available to a template, by name.
///
/// A name is present when it has been inserted, whatever its value: `0`,
/// `false` and `""` all bind as parameters.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, Operand>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a value, returning the one it replaces.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Operand>) -> Option<Operand> {
        self.values.insert(name.into(), value.into())
    }

    /// Looks a value up.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Operand> {
        self.values.get(name)
    }

    /// `true` if `name` has been inserted.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` without values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Operand>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        context.extend(iter);
        context
    }
}

impl<K: Into<String>, V: Into<Operand>> Extend<(K, V)> for Context {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Where a parameter came from.
#[derive(Debug, PartialEq, Eq, Hash)]
struct Origin<'t> {
    var: &'t str,
    view: Option<View>,
    path: Vec<usize>,
}

/// Positional parameter allocation.
#[derive(Debug, Default)]
struct Binder<'t> {
    slots: HashMap<Origin<'t>, usize>,
    params: Vec<SqlValue>,
}

impl<'t> Binder<'t> {
    /// Returns the 1-based position for `origin`, allocating it on first
    /// sight.
    fn bind(&mut self, origin: Origin<'t>, value: &SqlValue) -> usize {
        if let Some(&slot) = self.slots.get(&origin) {
            return slot;
        }
        self.params.push(value.clone());
        let slot = self.params.len();
        self.slots.insert(origin, slot);
        slot
    }
}

/// Depth-first walk over the fragments of one placeholder.
struct Walk<'t, 'b> {
    var: &'t str,
    view: Option<View>,
    path: Vec<usize>,
    binder: &'b mut Binder<'t>,
}

impl Walk<'_, '_> {
    fn flatten(&mut self, fragments: Fragments<'_>, out: &mut String) {
        for (index, fragment) in fragments.enumerate() {
            self.path.push(index);
            match fragment {
                Fragment::Text(text) => out.push_str(&text),
                Fragment::Node(node) => self.flatten(node.render(), out),
                Fragment::Param(value) => {
                    let origin = Origin {
                        var: self.var,
                        view: self.view,
                        path: self.path.clone(),
                    };
                    let slot = self.binder.bind(origin, value);
                    out.push('$');
                    out.push_str(&slot.to_string());
                }
            }
            self.path.pop();
        }
    }
}

/// Substitutes placeholders in SQL templates.
///
/// The pattern must have a `key` capture group (or, failing that, a first
/// capture group) holding the placeholder name, optionally followed by the
/// view separator and a view name. A match where the optional `skip` group
/// participates is copied verbatim.
///
/// ```
/// use oxide_sqlblock::{Context, Renderer, Values};
///
/// let renderer = Renderer::new(r"\{\{ ?(?P<key>[\w.]+) ?\}\}", ".")?;
/// let ctx = Context::new().with("x", Values::named([("foo", 1), ("bar", 2)])?);
/// let (sql, _) = renderer.render("insert into t ({{ x.names }}) values {{ x }}", &ctx)?;
/// assert_eq!(sql, "insert into t (foo, bar) values ($1, $2)");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    regex: Regex,
    separator: String,
}

impl Default for Renderer {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PATTERN).expect("default placeholder pattern is valid"),
            separator: String::from(DEFAULT_SEPARATOR),
        }
    }
}

impl Renderer {
    /// Creates a renderer with a custom placeholder pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Regex`] for an invalid pattern and
    /// [`PatternError::MissingKeyGroup`] when it has no capture group.
    pub fn new(pattern: &str, separator: impl Into<String>) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern)?;
        let has_key = regex.capture_names().flatten().any(|name| name == "key");
        if !has_key && regex.captures_len() < 2 {
            return Err(PatternError::MissingKeyGroup);
        }
        Ok(Self {
            regex,
            separator: separator.into(),
        })
    }

    /// Renders `template`, returning the query text and its parameters in
    /// placeholder order.
    ///
    /// Nothing is returned on failure; a template is either fully rendered
    /// or rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] naming the offending variable when a
    /// placeholder is missing from `context`, asks for a view its value does
    /// not provide, or the view cannot be produced.
    pub fn render(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<(String, Vec<SqlValue>), BuildError> {
        let mut out = String::with_capacity(template.len());
        let mut binder = Binder::default();
        let mut last = 0;

        for caps in self.regex.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&template[last..whole.start()]);
            last = whole.end();

            let key = caps.name("key").or_else(|| caps.get(1));
            let Some(key) = key.filter(|_| caps.name("skip").is_none()) else {
                out.push_str(whole.as_str());
                continue;
            };
            let (var, view) = self.split_key(key.as_str());
            substitute(var, view, context, &mut binder, &mut out)?;
        }
        out.push_str(&template[last..]);

        debug!(params = binder.params.len(), "rendered template");
        Ok((out, binder.params))
    }

    fn split_key<'t>(&self, key: &'t str) -> (&'t str, Option<&'t str>) {
        if self.separator.is_empty() {
            return (key, None);
        }
        match key.split_once(self.separator.as_str()) {
            Some((var, view)) => (var, Some(view)),
            None => (key, None),
        }
    }
}

/// Resolves one placeholder, appending its text to `out`.
fn substitute<'t>(
    var: &'t str,
    view_name: Option<&'t str>,
    context: &Context,
    binder: &mut Binder<'t>,
    out: &mut String,
) -> Result<(), BuildError> {
    let value = context
        .get(var)
        .ok_or_else(|| BuildError::MissingVariable(String::from(var)))?;
    trace!(var, view = ?view_name, "resolving placeholder");

    let Some(view_name) = view_name else {
        let mut walk = Walk {
            var,
            view: None,
            path: Vec::new(),
            binder,
        };
        walk.flatten(single(value.fragment()), out);
        return Ok(());
    };

    let missing = || BuildError::MissingView {
        var: String::from(var),
        view: String::from(view_name),
    };
    let view = View::from_name(view_name).ok_or_else(missing)?;
    let component: &dyn Component = match value {
        Operand::Param(_) => return Err(missing()),
        Operand::Block(block) => block.as_ref(),
        Operand::Component(component) => component.as_ref(),
    };
    let fragments = component
        .render_view(view)
        .ok_or_else(missing)?
        .map_err(|source| BuildError::Component {
            var: String::from(var),
            source,
        })?;

    let mut walk = Walk {
        var,
        view: Some(view),
        path: Vec::new(),
        binder,
    };
    walk.flatten(fragments, out);
    Ok(())
}

/// Renders `template` with the default renderer (`:name`, `:name__view`).
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render(template: &str, context: &Context) -> Result<(String, Vec<SqlValue>), BuildError> {
    DEFAULT_RENDERER.render(template, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binder_dedups_by_origin() {
        let mut binder = Binder::default();
        let value = SqlValue::Int(1);
        let origin = |var| Origin {
            var,
            view: None,
            path: vec![0],
        };
        assert_eq!(binder.bind(origin("a"), &value), 1);
        assert_eq!(binder.bind(origin("b"), &value), 2);
        assert_eq!(binder.bind(origin("a"), &value), 1);
        assert_eq!(binder.params, vec![SqlValue::Int(1), SqlValue::Int(1)]);
    }

    #[test]
    fn test_cast_is_not_a_placeholder() {
        let ctx = Context::new().with("a", 1);
        let (sql, params) = render("select :a::int, '1'::text", &ctx).unwrap();
        assert_eq!(sql, "select $1::int, '1'::text");
        assert_eq!(params, vec![SqlValue::Int(1)]);
    }

    #[test]
    fn test_numeric_names_are_ignored() {
        let ctx = Context::new().with("v1000", 2);
        let (sql, params) = render("numeric: :1000 :v1000", &ctx).unwrap();
        assert_eq!(sql, "numeric: :1000 $1");
        assert_eq!(params, vec![SqlValue::Int(2)]);
    }

    #[test]
    fn test_pattern_needs_a_group() {
        assert!(matches!(
            Renderer::new(r"\{\{ \w+ \}\}", "."),
            Err(PatternError::MissingKeyGroup)
        ));
        assert!(matches!(Renderer::new(r"(", "."), Err(PatternError::Regex(_))));
        assert!(Renderer::new(r"\{\{ ?([\w.]+) ?\}\}", ".").is_ok());
    }

    #[test]
    fn test_context_presence_is_membership() {
        let ctx: Context = [("zero", 0), ("one", 1)].into_iter().collect();
        assert!(ctx.contains("zero"));
        assert!(!ctx.contains("two"));
        assert_eq!(ctx.len(), 2);
    }
}
