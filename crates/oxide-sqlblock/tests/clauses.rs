//! Tests for statement clauses rendered through templates.

mod common;
use common::*;

use oxide_sqlblock::clauses::{self, Field};
use oxide_sqlblock::{render, select_aliased, var, Context, SqlExpr, SqlValue, Var};

#[test]
fn select_names() {
    assert_eq!(query_v(clauses::select(["foo", "bar"]).unwrap()), "SELECT foo, bar");
}

#[test]
fn select_aliased_fields() {
    let fields = select_aliased([("x", "foo"), ("y", "bar")]).unwrap();
    assert_eq!(
        query_v(clauses::select([fields]).unwrap()),
        "SELECT foo AS x, bar AS y"
    );
}

#[test]
fn from_tables() {
    assert_eq!(query_v(clauses::from(["foobar"]).unwrap()), "FROM foobar");
    assert_eq!(query_v(clauses::from(["foo", "bar"]).unwrap()), "FROM foo, bar");
    let tables: [Field; 2] = ["foo".into(), Var::new("bar").unwrap().into()];
    assert_eq!(query_v(clauses::from(tables).unwrap()), "FROM foo, bar");
}

#[test]
fn joins() {
    let on = var("x.id").unwrap().eq(var("y.id").unwrap());
    assert_eq!(
        query_v(clauses::join("foobar", Some(on)).unwrap()),
        "JOIN foobar ON x.id = y.id"
    );
    assert_eq!(query_v(clauses::cross_join("xxx").unwrap()), "CROSS JOIN xxx");
    assert_eq!(query_v(clauses::left_join("b", None).unwrap()), "LEFT JOIN b");
    assert_eq!(query_v(clauses::right_join("b", None).unwrap()), "RIGHT JOIN b");
    assert_eq!(query_v(clauses::full_join("b", None).unwrap()), "FULL JOIN b");
}

#[test]
fn combined_clauses() {
    let q = clauses::from(["a"]).unwrap()
        + clauses::join("b", None).unwrap()
        + clauses::join("c", None).unwrap();
    assert_eq!(query_v(q), "FROM a\nJOIN b\nJOIN c");
}

#[test]
fn order_by() {
    let fields: [Field; 2] = ["apple".into(), var("pear").unwrap().desc().into()];
    assert_eq!(
        query_v(clauses::order_by(fields).unwrap()),
        "ORDER BY apple, pear DESC"
    );
}

#[test]
fn limit_and_offset_are_bound() {
    let (sql, args) = render_v(clauses::limit(20));
    assert_eq!(sql, "LIMIT $1");
    assert_eq!(args, params([20]));
    let (sql, args) = render_v(clauses::limit(20) + clauses::offset(40));
    assert_eq!(sql, "LIMIT $1\nOFFSET $2");
    assert_eq!(args, params([20, 40]));
}

#[test]
fn where_clause() {
    let cond = var("x").unwrap().eq(4).and(var("y").unwrap().like("xxx"));
    let (sql, args) = render_v(clauses::where_(cond));
    assert_eq!(sql, "WHERE x = $1 AND y LIKE $2");
    assert_eq!(args, vec![SqlValue::Int(4), text("xxx")]);
}

#[test]
fn group_by_having() {
    let q = clauses::group_by(["owner"]).unwrap()
        + clauses::having(oxide_sqlblock::funcs::count_all().gt(1));
    let (sql, args) = render_v(q);
    assert_eq!(sql, "GROUP BY owner\nHAVING COUNT(*) > $1");
    assert_eq!(args, params([1]));
}

#[test]
fn full_statement() {
    let ctx = Context::new()
        .with("select", clauses::select(["id", "name"]).unwrap())
        .with(
            "filter",
            clauses::where_(var("age").unwrap().ge(18).and(var("country").unwrap().eq("NZ"))),
        )
        .with("limit", clauses::limit(10));
    let (sql, args) = render(":select FROM users :filter :limit", &ctx).unwrap();
    assert_eq!(
        sql,
        "SELECT id, name FROM users WHERE age >= $1 AND country = $2 LIMIT $3"
    );
    assert_eq!(args, vec![SqlValue::Int(18), text("NZ"), SqlValue::Int(10)]);
}

#[test]
fn unsafe_names_are_rejected() {
    assert!(clauses::from(["users; drop table users"]).is_err());
    assert!(clauses::join("a b", None).is_err());
}
