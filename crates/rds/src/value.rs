//! Tagged literal model for SQL column values.
//!
//! Statements in this crate are rendered as literal SQL text, so every
//! value carried in a column map is one of a closed set of variants with a
//! single pure mapping to its literal form. Quoting doubles embedded
//! single quotes and nothing more.

use chrono::{DateTime, Utc};

/// Format used for timestamp literals and stringified times.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A column value destined for a literal-rendered SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Timestamp(DateTime<Utc>),
    Integer(i64),
    Float(f64),
    Null,
}

impl SqlValue {
    /// Render the literal form of this value.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::Timestamp(t) => {
                format!("TIMESTAMP '{}'", t.format(TIMESTAMP_FORMAT))
            }
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Null => "NULL".to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(t: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(t)
    }
}

impl From<i32> for SqlValue {
    fn from(i: i32) -> Self {
        SqlValue::Integer(i as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Integer(i)
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Float(f)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn text_literal_is_quoted() {
        assert_eq!(SqlValue::from("daily_load").to_literal(), "'daily_load'");
    }

    #[test]
    fn text_literal_doubles_single_quotes() {
        assert_eq!(
            SqlValue::from("can't parse").to_literal(),
            "'can''t parse'"
        );
    }

    #[test]
    fn timestamp_literal() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 15).unwrap();
        assert_eq!(
            SqlValue::from(t).to_literal(),
            "TIMESTAMP '2024-03-01 09:30:15.000000'"
        );
    }

    #[test]
    fn numeric_literals_pass_through() {
        assert_eq!(SqlValue::from(42).to_literal(), "42");
        assert_eq!(SqlValue::from(-7i64).to_literal(), "-7");
        assert_eq!(SqlValue::from(2.5).to_literal(), "2.5");
    }

    #[test]
    fn null_literal() {
        assert_eq!(SqlValue::Null.to_literal(), "NULL");
        assert!(SqlValue::Null.is_null());
    }

    #[test]
    fn option_maps_to_null() {
        let absent: Option<&str> = None;
        assert_eq!(SqlValue::from(absent), SqlValue::Null);
        assert_eq!(
            SqlValue::from(Some("present")),
            SqlValue::Text("present".to_string())
        );
    }
}
