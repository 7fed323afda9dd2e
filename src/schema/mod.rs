//! Arrow schema definitions for the source tables.
//!
//! One function per table, returning the schema the analyses expect.
//! Parquet inputs are projected against these schemas when loaded.

use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use std::sync::Arc;

/// Timestamp type used across event and transaction tables
fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, None)
}

/// Get the Arrow schema for the `customers` table
#[must_use]
pub fn customers_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("signup_date", DataType::Date32, true),
        Field::new("acquisition_channel", DataType::Utf8, true),
        Field::new("income_bracket", DataType::Utf8, true),
        Field::new("credit_score", DataType::Int32, true),
        Field::new("country", DataType::Utf8, true),
    ]))
}

/// Get the Arrow schema for the `orders` table
#[must_use]
pub fn orders_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("order_date", DataType::Date32, true),
        Field::new("status", DataType::Utf8, true),
        Field::new("total_amount", DataType::Float64, true),
    ]))
}

/// Get the Arrow schema for the `order_items` table
#[must_use]
pub fn order_items_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Utf8, false),
        Field::new("product_id", DataType::Utf8, false),
        Field::new("quantity", DataType::Int32, true),
        Field::new("unit_price", DataType::Float64, true),
    ]))
}

/// Get the Arrow schema for the `products` table
#[must_use]
pub fn products_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("product_id", DataType::Utf8, false),
        Field::new("product_name", DataType::Utf8, true),
        Field::new("category", DataType::Utf8, true),
        Field::new("price", DataType::Float64, true),
    ]))
}

/// Get the Arrow schema for the `financial_transactions` table
#[must_use]
pub fn financial_transactions_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("transaction_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("amount", DataType::Float64, true),
        Field::new("timestamp", timestamp_type(), true),
        Field::new("txn_type", DataType::Utf8, true),
        Field::new("status", DataType::Utf8, true),
        Field::new("merchant_category", DataType::Utf8, true),
        Field::new("device_type", DataType::Utf8, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("is_fraud", DataType::Boolean, true),
    ]))
}

/// Get the Arrow schema for the `accounts` table
#[must_use]
pub fn accounts_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("account_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("account_type", DataType::Utf8, true),
        Field::new("opened_date", DataType::Date32, true),
        Field::new("balance", DataType::Float64, true),
    ]))
}

/// Get the Arrow schema for the `page_events` clickstream table
#[must_use]
pub fn page_events_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("session_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, true),
        Field::new("page_url", DataType::Utf8, true),
        Field::new("event_type", DataType::Utf8, true),
        Field::new("timestamp", timestamp_type(), true),
    ]))
}

/// Get the Arrow schema for the raw `patient_records` table
///
/// Everything except the identifier is free text. Dates, gender codes and
/// addresses are normalized by the cleaning analysis, not at load time.
#[must_use]
pub fn patient_records_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("patient_id", DataType::Utf8, false),
        Field::new("first_name", DataType::Utf8, true),
        Field::new("last_name", DataType::Utf8, true),
        Field::new("date_of_birth", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("admission_date", DataType::Utf8, true),
        Field::new("phone", DataType::Utf8, true),
        Field::new("address", DataType::Utf8, true),
        Field::new("diagnosis", DataType::Utf8, true),
    ]))
}
