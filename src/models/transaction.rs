//! Financial transaction model

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::utils::arrow::{
    boolean_column, float64_column, float64_value, string_column, string_value, timestamp_column,
    timestamp_value,
};

/// A row of the `financial_transactions` table
#[derive(Debug, Clone)]
pub struct FinancialTransaction {
    /// Unique transaction identifier
    pub transaction_id: String,
    /// Customer the transaction belongs to
    pub customer_id: String,
    /// Transaction amount; non-negative except for refunds
    pub amount: Option<f64>,
    /// When the transaction happened
    pub timestamp: Option<NaiveDateTime>,
    /// Transaction type (purchase, refund, transfer, ...)
    pub txn_type: Option<String>,
    /// Processing status (completed, pending, failed)
    pub status: Option<String>,
    /// Merchant category code label
    pub merchant_category: Option<String>,
    /// Device the transaction originated from
    pub device_type: Option<String>,
    /// Free-text location
    pub location: Option<String>,
    /// Confirmed-fraud flag from the source system
    pub is_fraud: bool,
}

impl FinancialTransaction {
    /// Extract all transactions from a record batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let txn_ids = string_column(batch, "transaction_id")?;
        let customer_ids = string_column(batch, "customer_id")?;
        let amounts = float64_column(batch, "amount")?;
        let timestamps = timestamp_column(batch, "timestamp")?;
        let types = string_column(batch, "txn_type")?;
        let statuses = string_column(batch, "status")?;
        let merchants = string_column(batch, "merchant_category")?;
        let devices = string_column(batch, "device_type")?;
        let locations = string_column(batch, "location")?;
        let fraud_flags = boolean_column(batch, "is_fraud")?;

        let mut transactions = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            transactions.push(Self {
                transaction_id: txn_ids.value(row).to_string(),
                customer_id: customer_ids.value(row).to_string(),
                amount: float64_value(amounts, row),
                timestamp: timestamp_value(timestamps, row),
                txn_type: string_value(types, row),
                status: string_value(statuses, row),
                merchant_category: string_value(merchants, row),
                device_type: string_value(devices, row),
                location: string_value(locations, row),
                is_fraud: !fraud_flags.is_null(row) && fraud_flags.value(row),
            });
        }
        Ok(transactions)
    }

    /// Whether this transaction is a refund
    #[must_use]
    pub fn is_refund(&self) -> bool {
        self.txn_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("refund"))
    }

    /// Whether this transaction completed successfully
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("completed"))
    }
}
