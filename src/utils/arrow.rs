//! Utilities for working with Arrow arrays.
//!
//! Safe extraction of typed values from record batch columns, with clear
//! errors when a column is missing or has an unexpected type.

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Float64Array, Int32Array, StringArray,
    TimestampMicrosecondArray,
};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{Error, Result};

/// Get the column index by name from a record batch
pub fn get_column_index(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch.schema().index_of(column_name).map_err(|_| {
        Error::ColumnNotFound {
            column: column_name.to_string(),
        }
        .into()
    })
}

/// Downcast a column to a specific array type with a clear error message
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| {
            Error::InvalidDataType {
                column: column_name.to_string(),
                expected: expected_type_name.to_string(),
            }
            .into()
        })
}

/// Get a column and downcast it to a string array
pub fn string_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a StringArray> {
    let idx = get_column_index(batch, column_name)?;
    downcast_array::<StringArray>(batch.column(idx), column_name, "Utf8")
}

/// Get a column and downcast it to a 32-bit date array
pub fn date32_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a Date32Array> {
    let idx = get_column_index(batch, column_name)?;
    downcast_array::<Date32Array>(batch.column(idx), column_name, "Date32")
}

/// Get a column and downcast it to a 64-bit float array
pub fn float64_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a Float64Array> {
    let idx = get_column_index(batch, column_name)?;
    downcast_array::<Float64Array>(batch.column(idx), column_name, "Float64")
}

/// Get a column and downcast it to a 32-bit integer array
pub fn int32_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a Int32Array> {
    let idx = get_column_index(batch, column_name)?;
    downcast_array::<Int32Array>(batch.column(idx), column_name, "Int32")
}

/// Get a column and downcast it to a boolean array
pub fn boolean_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a BooleanArray> {
    let idx = get_column_index(batch, column_name)?;
    downcast_array::<BooleanArray>(batch.column(idx), column_name, "Boolean")
}

/// Get a column and downcast it to a microsecond timestamp array
pub fn timestamp_column<'a>(
    batch: &'a RecordBatch,
    column_name: &str,
) -> Result<&'a TimestampMicrosecondArray> {
    let idx = get_column_index(batch, column_name)?;
    downcast_array::<TimestampMicrosecondArray>(
        batch.column(idx),
        column_name,
        "Timestamp(Microsecond)",
    )
}

/// Extract an optional owned string from a string array
#[must_use]
pub fn string_value(array: &StringArray, row: usize) -> Option<String> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row).to_string())
    }
}

/// Extract an optional date from a 32-bit date array
#[must_use]
pub fn date32_value(array: &Date32Array, row: usize) -> Option<NaiveDate> {
    if array.is_null(row) {
        None
    } else {
        Some(date_from_days(array.value(row)))
    }
}

/// Extract an optional naive timestamp from a microsecond timestamp array
#[must_use]
pub fn timestamp_value(array: &TimestampMicrosecondArray, row: usize) -> Option<NaiveDateTime> {
    if array.is_null(row) {
        None
    } else {
        DateTime::from_timestamp_micros(array.value(row)).map(|dt| dt.naive_utc())
    }
}

/// Extract an optional float from a 64-bit float array
#[must_use]
pub fn float64_value(array: &Float64Array, row: usize) -> Option<f64> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

/// Extract an optional integer from a 32-bit integer array
#[must_use]
pub fn int32_value(array: &Int32Array, row: usize) -> Option<i32> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

/// Convert a Date32 day count (days since the Unix epoch) to a date
#[must_use]
pub fn date_from_days(days: i32) -> NaiveDate {
    unix_epoch() + TimeDelta::days(i64::from(days))
}

/// Convert a date to a Date32 day count
#[must_use]
pub fn days_from_date(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

/// Convert a naive timestamp to epoch microseconds
#[must_use]
pub fn micros_from_datetime(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_micros()
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date32_round_trip() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(date_from_days(days_from_date(date)), date);
        assert_eq!(days_from_date(unix_epoch()), 0);
    }

    #[test]
    fn test_pre_epoch_dates() {
        let date = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
        assert_eq!(days_from_date(date), -1);
        assert_eq!(date_from_days(-1), date);
    }

    #[test]
    fn test_missing_column_error() {
        use arrow::datatypes::{DataType, Field, Schema};
        use std::sync::Arc;

        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec!["x"])) as ArrayRef],
        )
        .unwrap();

        assert!(get_column_index(&batch, "a").is_ok());
        assert!(get_column_index(&batch, "missing").is_err());
    }
}
