//! Converting MySQL rows into JSON objects.
//!
//! Temporal values are rendered as ISO-8601 strings and `DECIMAL` as its
//! exact text, so nothing is lost to floating point.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Map, Number, Value};
use sqlx::{Column, Row, TypeInfo, ValueRef, mysql::MySqlRow};

/// JSON rendering chosen for a column, keyed off the MySQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Null,
    Bool,
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    Text,
    Json,
    Date,
    DateTime,
    Time,
    Bytes,
}

impl ColumnKind {
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        let (base, unsigned) = name
            .strip_suffix(" UNSIGNED")
            .map_or((name, false), |base| (base, true));
        match base {
            "NULL" => Self::Null,
            "BOOLEAN" => Self::Bool,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" if unsigned => Self::Unsigned,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => Self::Signed,
            "YEAR" => Self::Unsigned,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DECIMAL" => Self::Decimal,
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => Self::Text,
            "JSON" => Self::Json,
            "DATE" => Self::Date,
            "DATETIME" | "TIMESTAMP" => Self::DateTime,
            "TIME" => Self::Time,
            _ => Self::Bytes,
        }
    }
}

/// Renders one row as an object keyed by column name.
///
/// # Errors
/// Returns the driver's error if a value cannot be decoded as its column type.
pub fn to_json(row: &MySqlRow) -> Result<Value, sqlx::Error> {
    let mut object = Map::new();
    for column in row.columns() {
        let kind = ColumnKind::from_type_name(column.type_info().name());
        object.insert(column.name().to_string(), value_at(row, column.ordinal(), kind)?);
    }
    Ok(Value::Object(object))
}

fn value_at(row: &MySqlRow, index: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    // Integer decoding reads whatever width the column has, so unchecked
    // access is safe once the kind is known.
    let value = match kind {
        ColumnKind::Null => Value::Null,
        ColumnKind::Bool => Value::Bool(row.try_get_unchecked(index)?),
        ColumnKind::Signed => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        ColumnKind::Unsigned => Value::from(row.try_get_unchecked::<u64, _>(index)?),
        ColumnKind::Float => float(f64::from(row.try_get_unchecked::<f32, _>(index)?)),
        ColumnKind::Double => float(row.try_get_unchecked::<f64, _>(index)?),
        ColumnKind::Decimal | ColumnKind::Text => Value::String(row.try_get_unchecked(index)?),
        ColumnKind::Json => row.try_get_unchecked::<Value, _>(index)?,
        ColumnKind::Date => Value::String(iso_date(row.try_get_unchecked(index)?)),
        ColumnKind::DateTime => Value::String(iso_datetime(row.try_get_unchecked(index)?)),
        ColumnKind::Time => Value::String(iso_time(row.try_get_unchecked(index)?)),
        ColumnKind::Bytes => {
            let bytes: Vec<u8> = row.try_get_unchecked(index)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
    };
    Ok(value)
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn iso_datetime(datetime: NaiveDateTime) -> String {
    if datetime.nanosecond() == 0 {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn iso_time(time: NaiveTime) -> String {
    if time.nanosecond() == 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M:%S%.6f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_signedness_follows_the_type_name() {
        assert_eq!(ColumnKind::from_type_name("INT"), ColumnKind::Signed);
        assert_eq!(ColumnKind::from_type_name("BIGINT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(ColumnKind::from_type_name("BOOLEAN"), ColumnKind::Bool);
        assert_eq!(ColumnKind::from_type_name("YEAR"), ColumnKind::Unsigned);
    }

    #[test]
    fn temporal_and_exact_types_are_recognized() {
        assert_eq!(ColumnKind::from_type_name("DATE"), ColumnKind::Date);
        assert_eq!(ColumnKind::from_type_name("TIMESTAMP"), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from_type_name("TIME"), ColumnKind::Time);
        assert_eq!(ColumnKind::from_type_name("DECIMAL"), ColumnKind::Decimal);
        assert_eq!(ColumnKind::from_type_name("ENUM"), ColumnKind::Text);
        assert_eq!(ColumnKind::from_type_name("GEOMETRY"), ColumnKind::Bytes);
    }

    #[test]
    fn dates_render_as_iso_8601() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(iso_date(date), "2024-03-01");

        let at = date.and_hms_opt(9, 15, 0).unwrap();
        assert_eq!(iso_datetime(at), "2024-03-01T09:15:00");
        let precise = date.and_hms_micro_opt(9, 15, 0, 250_000).unwrap();
        assert_eq!(iso_datetime(precise), "2024-03-01T09:15:00.250000");

        assert_eq!(iso_time(NaiveTime::from_hms_opt(17, 5, 9).unwrap()), "17:05:09");
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(float(f64::NAN), Value::Null);
        assert_eq!(float(1.5), Value::from(1.5));
    }
}
