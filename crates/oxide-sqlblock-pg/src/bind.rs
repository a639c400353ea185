//! Binding rendered parameters to sqlx queries.

use chrono::NaiveDateTime;
use oxide_sqlblock::SqlValue;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgTypeInfo};
use sqlx::query::Query;
use sqlx::{Encode, Postgres, Type};

use crate::error::{PgError, Result};

/// A raw PostgreSQL query with positional arguments.
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// OID of the PostgreSQL `unknown` pseudo-type.
const UNKNOWN_OID: u32 = 705;

/// A NULL sent as `unknown`, so the server infers its type from where the
/// placeholder is used (`INSERT`, comparisons, casts).
///
/// A context-free placeholder such as `SELECT $1` then needs an explicit
/// cast, `:v::int`.
#[derive(Debug, Clone, Copy)]
struct UntypedNull;

impl Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(UNKNOWN_OID))
    }
}

impl Encode<'_, Postgres> for UntypedNull {
    fn encode_by_ref(
        &self,
        _buf: &mut PgArgumentBuffer,
    ) -> std::result::Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }
}

/// A parameter in a shape sqlx can encode for PostgreSQL.
#[derive(Debug, Clone, PartialEq)]
enum PgParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(NaiveDateTime),
    BoolArray(Vec<Option<bool>>),
    IntArray(Vec<Option<i64>>),
    FloatArray(Vec<Option<f64>>),
    TextArray(Vec<Option<String>>),
    TimestampArray(Vec<Option<NaiveDateTime>>),
}

/// Element type of an array, decided by its first non-null item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Bool,
    Int,
    Float,
    Text,
    Timestamp,
}

impl ElementKind {
    fn of(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Bool(_) => Some(Self::Bool),
            SqlValue::Int(_) => Some(Self::Int),
            SqlValue::Float(_) => Some(Self::Float),
            SqlValue::Text(_) => Some(Self::Text),
            SqlValue::Timestamp(_) => Some(Self::Timestamp),
            SqlValue::Null | SqlValue::Blob(_) | SqlValue::Array(_) => None,
        }
    }
}

/// Collects the items of an array that all match `pick`, nulls included.
fn collect_items<T>(
    items: Vec<SqlValue>,
    position: usize,
    pick: impl Fn(SqlValue) -> Option<T>,
) -> Result<Vec<Option<T>>> {
    items
        .into_iter()
        .map(|item| match item {
            SqlValue::Null => Ok(None),
            other => pick(other).map(Some).ok_or(PgError::UnsupportedArray {
                position,
                reason: "elements must all have the same type",
            }),
        })
        .collect()
}

fn classify_array(items: Vec<SqlValue>, position: usize) -> Result<PgParam> {
    if items.iter().any(|item| matches!(item, SqlValue::Array(_))) {
        return Err(PgError::UnsupportedArray {
            position,
            reason: "nested arrays are not supported",
        });
    }
    if items.iter().any(|item| matches!(item, SqlValue::Blob(_))) {
        return Err(PgError::UnsupportedArray {
            position,
            reason: "arrays of blobs are not supported",
        });
    }
    let kind = items
        .iter()
        .find_map(ElementKind::of)
        .ok_or(PgError::UnsupportedArray {
            position,
            reason: "element type cannot be inferred from an empty or all-null array",
        })?;

    Ok(match kind {
        ElementKind::Bool => PgParam::BoolArray(collect_items(items, position, |v| match v {
            SqlValue::Bool(b) => Some(b),
            _ => None,
        })?),
        ElementKind::Int => PgParam::IntArray(collect_items(items, position, |v| match v {
            SqlValue::Int(i) => Some(i),
            _ => None,
        })?),
        ElementKind::Float => PgParam::FloatArray(collect_items(items, position, |v| match v {
            SqlValue::Float(f) => Some(f),
            _ => None,
        })?),
        ElementKind::Text => PgParam::TextArray(collect_items(items, position, |v| match v {
            SqlValue::Text(s) => Some(s),
            _ => None,
        })?),
        ElementKind::Timestamp => {
            PgParam::TimestampArray(collect_items(items, position, |v| match v {
                SqlValue::Timestamp(ts) => Some(ts),
                _ => None,
            })?)
        }
    })
}

fn classify(value: SqlValue, position: usize) -> Result<PgParam> {
    Ok(match value {
        SqlValue::Null => PgParam::Null,
        SqlValue::Bool(b) => PgParam::Bool(b),
        SqlValue::Int(i) => PgParam::Int(i),
        SqlValue::Float(f) => PgParam::Float(f),
        SqlValue::Text(s) => PgParam::Text(s),
        SqlValue::Blob(b) => PgParam::Blob(b),
        SqlValue::Timestamp(ts) => PgParam::Timestamp(ts),
        SqlValue::Array(items) => classify_array(items, position)?,
    })
}

fn bind_param(query: PgQuery<'_>, param: PgParam) -> PgQuery<'_> {
    match param {
        PgParam::Null => query.bind(UntypedNull),
        PgParam::Bool(b) => query.bind(b),
        PgParam::Int(i) => query.bind(i),
        PgParam::Float(f) => query.bind(f),
        PgParam::Text(s) => query.bind(s),
        PgParam::Blob(b) => query.bind(b),
        PgParam::Timestamp(ts) => query.bind(ts),
        PgParam::BoolArray(items) => query.bind(items),
        PgParam::IntArray(items) => query.bind(items),
        PgParam::FloatArray(items) => query.bind(items),
        PgParam::TextArray(items) => query.bind(items),
        PgParam::TimestampArray(items) => query.bind(items),
    }
}

/// Binds rendered parameters to `query`, in order.
///
/// Every parameter is checked before anything is bound.
///
/// # Errors
///
/// Returns [`PgError::UnsupportedArray`] for an array that is empty, all
/// null, nested, or mixes element types.
pub fn bind_params(query: PgQuery<'_>, params: Vec<SqlValue>) -> Result<PgQuery<'_>> {
    let params = params
        .into_iter()
        .enumerate()
        .map(|(index, value)| classify(value, index + 1))
        .collect::<Result<Vec<_>>>()?;
    Ok(params.into_iter().fold(query, bind_param))
}
