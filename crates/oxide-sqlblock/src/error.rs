//! Error types for building and rendering SQL blocks.

use thiserror::Error;

/// Raised when text destined to be spliced verbatim into SQL contains
/// anything other than word characters, `.` or `*`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsafe identifier {value:?}: only word characters, '.' and '*' are allowed")]
pub struct UnsafeError {
    value: String,
}

impl UnsafeError {
    pub(crate) fn new(value: &str) -> Self {
        Self {
            value: String::from(value),
        }
    }

    /// The rejected text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Errors raised while constructing components.
///
/// These are caller-logic errors: they surface when a tree is built, never
/// while it is rendered (with the exception of views a component cannot
/// provide, see [`ComponentError::NamesUnavailable`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// A name failed the identifier check.
    #[error(transparent)]
    Unsafe(#[from] UnsafeError),

    /// A container was built without any values.
    #[error("at least one value is required")]
    Empty,

    /// The same name was given twice in a named container.
    #[error("duplicate name \"{0}\"")]
    DuplicateName(String),

    /// Rows of a multi-row value list use different names.
    #[error("names of different rows do not match: {found:?} != {expected:?}")]
    RowNamesMismatch {
        /// Names of the first row.
        expected: Option<Vec<String>>,
        /// Names of the offending row.
        found: Option<Vec<String>>,
    },

    /// Rows of a multi-row value list have different lengths.
    #[error("row lengths don't match: {found} != {expected}")]
    RowLengthMismatch {
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// The `names` (or `set`) view was requested on positional values.
    #[error("\"names\" are not available for nameless values")]
    NamesUnavailable,
}

/// Errors raised by the template renderer.
///
/// Every variant names the context variable that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The template references a name missing from the context.
    #[error("variable \"{0}\" not found in context")]
    MissingVariable(String),

    /// The template asks for a view the value does not provide.
    #[error("\"{var}\": extra renderer \"{view}\" not found")]
    MissingView {
        /// The context variable.
        var: String,
        /// The requested view.
        view: String,
    },

    /// A component failed while producing its fragments.
    #[error("\"{var}\": {source}")]
    Component {
        /// The context variable.
        var: String,
        /// The underlying component error.
        source: ComponentError,
    },
}

impl BuildError {
    /// Returns the context variable this error is about.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::MissingVariable(var)
            | Self::MissingView { var, .. }
            | Self::Component { var, .. } => var,
        }
    }
}

/// Errors raised when a custom placeholder pattern is rejected.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern is not a valid regular expression.
    #[error("invalid placeholder pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The pattern has neither a `key` group nor a first capture group.
    #[error("placeholder pattern needs a `key` capture group")]
    MissingKeyGroup,
}

/// Result type alias for component construction.
pub type Result<T, E = ComponentError> = std::result::Result<T, E>;
