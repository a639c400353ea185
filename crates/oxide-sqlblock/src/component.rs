//! The rendering contract shared by every node.
//!
//! A [`Component`] produces a lazy, single-pass sequence of [`Fragment`]s:
//! trusted text, nested components, or values to bind as parameters. The
//! renderer walks these sequences depth first; nothing is flattened before
//! that walk.

use std::borrow::Cow;
use std::fmt;
use std::iter;

use crate::error::ComponentError;
use crate::value::SqlValue;

/// One unit yielded by [`Component::render`].
#[derive(Debug, Clone)]
pub enum Fragment<'a> {
    /// Trusted SQL text, inserted verbatim.
    Text(Cow<'a, str>),
    /// A nested component, rendered recursively.
    Node(&'a dyn Component),
    /// A value bound as a positional parameter.
    Param(&'a SqlValue),
}

impl<'a> Fragment<'a> {
    /// Borrowed trusted text.
    #[must_use]
    pub const fn text(s: &'a str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }
}

/// A lazy, finite fragment sequence.
pub type Fragments<'a> = Box<dyn Iterator<Item = Fragment<'a>> + 'a>;

/// Alternate renderings a component may expose, selected in templates with
/// the view separator (`:values__names`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Comma separated names, e.g. an INSERT column list.
    Names,
    /// `name = value` assignments, e.g. an UPDATE SET list.
    Set,
}

impl View {
    /// Looks a view up by its template name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "names" => Some(Self::Names),
            "set" => Some(Self::Set),
            _ => None,
        }
    }

    /// The template name of the view.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Names => "names",
            Self::Set => "set",
        }
    }
}

/// A node of an SQL expression tree.
pub trait Component: fmt::Debug + Send + Sync {
    /// Produces the default rendering.
    fn render(&self) -> Fragments<'_>;

    /// Produces an alternate rendering.
    ///
    /// Returns `None` when the component has no such view at all and
    /// `Some(Err(_))` when it has the view but cannot produce it for its
    /// current contents.
    fn render_view(&self, view: View) -> Option<Result<Fragments<'_>, ComponentError>> {
        let _ = view;
        None
    }

    /// Rank of the top-level operator, if any.
    ///
    /// Self-delimiting components (function calls, containers, identifiers)
    /// return `None` and are never parenthesized.
    fn precedence(&self) -> Option<u8> {
        None
    }
}

/// Boxes a single fragment as a sequence.
pub(crate) fn single(fragment: Fragment<'_>) -> Fragments<'_> {
    Box::new(iter::once(fragment))
}

/// Interleaves groups of fragments with `sep`.
pub(crate) fn join<'a, I, G>(groups: I, sep: &'a str) -> impl Iterator<Item = Fragment<'a>> + 'a
where
    I: IntoIterator<Item = G>,
    I::IntoIter: 'a,
    G: IntoIterator<Item = Fragment<'a>>,
    G::IntoIter: 'a,
{
    groups.into_iter().enumerate().flat_map(move |(i, group)| {
        let sep = (i > 0).then(|| Fragment::text(sep));
        sep.into_iter().chain(group)
    })
}

/// Renders fragments with parameters inlined as escaped literals.
///
/// This is the diagnostic form used by `Display`; it is not safe to
/// execute and the renderer never uses it.
pub fn write_inline(fragments: Fragments<'_>, out: &mut String) {
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => out.push_str(&text),
            Fragment::Node(node) => write_inline(node.render(), out),
            Fragment::Param(value) => out.push_str(&value.to_sql_inline()),
        }
    }
}

macro_rules! impl_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    let mut out = String::new();
                    $crate::component::write_inline($crate::component::Component::render(self), &mut out);
                    f.write_str(&out)
                }
            }
        )+
    };
}
pub(crate) use impl_display;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pair(SqlValue, SqlValue);

    impl Component for Pair {
        fn render(&self) -> Fragments<'_> {
            let items = [Fragment::Param(&self.0), Fragment::Param(&self.1)];
            Box::new(join(items.into_iter().map(iter::once), " | "))
        }
    }

    #[test]
    fn test_join_interleaves_separator() {
        let pair = Pair(SqlValue::Int(1), SqlValue::Text(String::from("a")));
        let mut out = String::new();
        write_inline(pair.render(), &mut out);
        assert_eq!(out, "1 | 'a'");
    }

    #[test]
    fn test_view_names() {
        assert_eq!(View::from_name("names"), Some(View::Names));
        assert_eq!(View::from_name("set"), Some(View::Set));
        assert_eq!(View::from_name("missing"), None);
        assert_eq!(View::Names.name(), "names");
    }

    #[test]
    fn test_default_component_has_no_views() {
        let pair = Pair(SqlValue::Null, SqlValue::Null);
        assert!(pair.render_view(View::Names).is_none());
        assert!(pair.precedence().is_none());
    }
}
