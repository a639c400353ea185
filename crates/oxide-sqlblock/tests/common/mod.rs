#![allow(dead_code)]

use oxide_sqlblock::{render, Context, Operand, SqlValue, ToSqlValue};

/// Renders `value` through the template `:v`.
pub fn render_v(value: impl Into<Operand>) -> (String, Vec<SqlValue>) {
    let ctx = Context::new().with("v", value);
    render(":v", &ctx).unwrap_or_else(|e| panic!("Failed to render: {e}"))
}

/// Query text of `value` rendered through `:v`.
pub fn query_v(value: impl Into<Operand>) -> String {
    render_v(value).0
}

/// Renders `template`, panicking on error.
pub fn render_ok(template: &str, ctx: &Context) -> (String, Vec<SqlValue>) {
    render(template, ctx).unwrap_or_else(|e| panic!("Failed to render: {template}\nError: {e}"))
}

pub fn params<T: ToSqlValue>(values: impl IntoIterator<Item = T>) -> Vec<SqlValue> {
    values.into_iter().map(ToSqlValue::to_sql_value).collect()
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}
