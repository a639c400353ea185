//! # oxide-sqlblock
//!
//! Composable SQL expression blocks and a parameter-safe template renderer.
//!
//! This crate provides:
//! - An expression tree with operator builders and precedence-aware
//!   parenthesization
//! - Structural containers for value tuples, multi-row inserts, assignment
//!   lists and joined lists
//! - A template renderer turning `:name` placeholders into PostgreSQL
//!   positional parameters (`$1`, `$2`, ...)
//!
//! ## Building expressions
//!
//! ```rust
//! use oxide_sqlblock::{var, SqlExpr};
//!
//! let cond = var("foo")?.gt(2).and(var("bar")?.like("x%"));
//! assert_eq!(cond.to_string(), "foo > 2 AND bar LIKE 'x%'");
//! # Ok::<(), oxide_sqlblock::UnsafeError>(())
//! ```
//!
//! `Display` inlines values for diagnostics only. Queries are produced by the
//! renderer, which always binds values as parameters.
//!
//! ## Rendering templates
//!
//! ```rust
//! use oxide_sqlblock::{render, var, Context, SqlExpr, SqlValue};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let ctx = Context::new().with("where", var("name")?.eq(user_input));
//! let (sql, params) = render("SELECT id FROM users WHERE :where", &ctx)?;
//!
//! assert_eq!(sql, "SELECT id FROM users WHERE name = $1");
//! assert_eq!(params, vec![SqlValue::Text(user_input.to_string())]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Injection safety
//!
//! Identifiers, function names, cast types and aliases pass a word check
//! when they are built and fail with [`UnsafeError`] otherwise. Values never
//! reach query text. [`RawDangerous`] is the only way around the check.

pub mod clauses;
pub mod component;
pub mod containers;
pub mod error;
pub mod expr;
pub mod funcs;
pub mod precedence;
pub mod render;
pub mod safety;
pub mod value;

pub use component::{Component, Fragment, Fragments, View};
pub use containers::{select_aliased, select_fields, JoinComponent, MultipleValues, SetValues, Values};
pub use error::{BuildError, ComponentError, PatternError, Result, UnsafeError};
pub use expr::{val, var, Empty, Func, Operand, RawDangerous, SqlBlock, SqlExpr, Var};
pub use precedence::{Fixity, Operator};
pub use render::{render, Context, Renderer};
pub use value::{SqlValue, ToSqlValue};

/// Commonly used items.
pub mod prelude {
    pub use crate::clauses::{self, Clause, Clauses, Field};
    pub use crate::funcs;
    pub use crate::{
        render, select_aliased, select_fields, val, var, Context, Empty, Func, JoinComponent,
        MultipleValues, Operand, RawDangerous, Renderer, SetValues, SqlBlock, SqlExpr, SqlValue,
        Values, Var,
    };
}
