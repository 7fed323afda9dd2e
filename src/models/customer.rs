//! Customer entity model

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

use crate::error::Result;
use crate::utils::arrow::{
    date32_column, date32_value, int32_column, int32_value, string_column, string_value,
};

/// A row of the `customers` table
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer identifier
    pub customer_id: String,
    /// Customer name
    pub name: Option<String>,
    /// Date the customer signed up
    pub signup_date: Option<NaiveDate>,
    /// Marketing channel the customer was acquired through
    pub acquisition_channel: Option<String>,
    /// Self-reported income bracket
    pub income_bracket: Option<String>,
    /// Credit score at signup
    pub credit_score: Option<i32>,
    /// Country of residence
    pub country: Option<String>,
}

impl Customer {
    /// Extract all customers from a record batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let ids = string_column(batch, "customer_id")?;
        let names = string_column(batch, "name")?;
        let signup_dates = date32_column(batch, "signup_date")?;
        let channels = string_column(batch, "acquisition_channel")?;
        let brackets = string_column(batch, "income_bracket")?;
        let scores = int32_column(batch, "credit_score")?;
        let countries = string_column(batch, "country")?;

        let mut customers = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            customers.push(Self {
                customer_id: ids.value(row).to_string(),
                name: string_value(names, row),
                signup_date: date32_value(signup_dates, row),
                acquisition_channel: string_value(channels, row),
                income_bracket: string_value(brackets, row),
                credit_score: int32_value(scores, row),
                country: string_value(countries, row),
            });
        }
        Ok(customers)
    }

    /// Signup cohort as a `YYYY-MM` label, if the signup date is known
    #[must_use]
    pub fn signup_cohort(&self) -> Option<String> {
        self.signup_date.map(|d| d.format("%Y-%m").to_string())
    }
}
