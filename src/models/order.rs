//! Order and order line models

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

use crate::error::Result;
use crate::utils::arrow::{
    date32_column, date32_value, float64_column, float64_value, int32_column, int32_value,
    string_column, string_value,
};

/// A row of the `orders` table (order header)
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order identifier
    pub order_id: String,
    /// Customer who placed the order
    pub customer_id: String,
    /// Date the order was placed
    pub order_date: Option<NaiveDate>,
    /// Order status (completed, cancelled, ...)
    pub status: Option<String>,
    /// Order total
    pub total_amount: Option<f64>,
}

impl Order {
    /// Extract all orders from a record batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let order_ids = string_column(batch, "order_id")?;
        let customer_ids = string_column(batch, "customer_id")?;
        let dates = date32_column(batch, "order_date")?;
        let statuses = string_column(batch, "status")?;
        let totals = float64_column(batch, "total_amount")?;

        let mut orders = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            orders.push(Self {
                order_id: order_ids.value(row).to_string(),
                customer_id: customer_ids.value(row).to_string(),
                order_date: date32_value(dates, row),
                status: string_value(statuses, row),
                total_amount: float64_value(totals, row),
            });
        }
        Ok(orders)
    }
}

/// A row of the `order_items` table (order line)
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Order this line belongs to
    pub order_id: String,
    /// Product on the line
    pub product_id: String,
    /// Quantity ordered
    pub quantity: Option<i32>,
    /// Unit price at order time
    pub unit_price: Option<f64>,
}

impl OrderItem {
    /// Extract all order lines from a record batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let order_ids = string_column(batch, "order_id")?;
        let product_ids = string_column(batch, "product_id")?;
        let quantities = int32_column(batch, "quantity")?;
        let prices = float64_column(batch, "unit_price")?;

        let mut items = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            items.push(Self {
                order_id: order_ids.value(row).to_string(),
                product_id: product_ids.value(row).to_string(),
                quantity: int32_value(quantities, row),
                unit_price: float64_value(prices, row),
            });
        }
        Ok(items)
    }
}
