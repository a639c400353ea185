//! Parameter values.
//!
//! A [`SqlValue`] is always bound as a positional parameter by the renderer.
//! It is never spliced into query text, whatever it contains.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A value bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary value, bound as `bytea`.
    Blob(Vec<u8>),
    /// Timestamp without time zone.
    Timestamp(NaiveDateTime),
    /// Array bound as a single parameter, e.g. `a = any($1)`.
    Array(Vec<SqlValue>),
}

impl SqlValue {
    /// Builds an [`SqlValue::Array`] from any iterable of convertible values.
    #[must_use]
    pub fn array<T: ToSqlValue>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(ToSqlValue::to_sql_value).collect())
    }

    /// `true` for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Formats the value as an escaped SQL literal.
    ///
    /// Only the `Display` form of components uses this; rendered queries
    /// bind every value as a parameter.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Blob(bytes) => {
                let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("'\\x{hex}'")
            }
            Self::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            Self::Array(items) => {
                let inner: Vec<String> = items.iter().map(Self::to_sql_inline).collect();
                format!("ARRAY[{}]", inner.join(", "))
            }
        }
    }
}

/// Conversion into a parameter value.
pub trait ToSqlValue {
    /// Converts `self` into a [`SqlValue`].
    fn to_sql_value(self) -> SqlValue;
}

macro_rules! to_sql_value {
    ($($ty:ty => |$v:ident| $body:expr),+ $(,)?) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    let $v = self;
                    $body
                }
            }
        )+
    };
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

to_sql_value! {
    bool => |v| SqlValue::Bool(v),
    i64 => |v| SqlValue::Int(v),
    i32 => |v| SqlValue::Int(i64::from(v)),
    i16 => |v| SqlValue::Int(i64::from(v)),
    u32 => |v| SqlValue::Int(i64::from(v)),
    u16 => |v| SqlValue::Int(i64::from(v)),
    f64 => |v| SqlValue::Float(v),
    f32 => |v| SqlValue::Float(f64::from(v)),
    String => |v| SqlValue::Text(v),
    &str => |v| SqlValue::Text(v.to_owned()),
    &String => |v| SqlValue::Text(v.clone()),
    Vec<u8> => |v| SqlValue::Blob(v),
    &[u8] => |v| SqlValue::Blob(v.to_vec()),
    NaiveDateTime => |v| SqlValue::Timestamp(v),
    NaiveDate => |v| SqlValue::Timestamp(v.and_time(NaiveTime::MIN)),
    DateTime<Utc> => |v| SqlValue::Timestamp(v.naive_utc()),
    Vec<i64> => |v| SqlValue::array(v),
    Vec<i32> => |v| SqlValue::array(v),
    Vec<f64> => |v| SqlValue::array(v),
    Vec<bool> => |v| SqlValue::array(v),
    Vec<String> => |v| SqlValue::array(v),
    Vec<&str> => |v| SqlValue::array(v),
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl<T: ToSqlValue, const N: usize> ToSqlValue for [T; N] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::array(self)
    }
}
