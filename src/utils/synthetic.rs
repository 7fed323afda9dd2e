//! Synthetic dataset generation
//!
//! Builds a small, seedable in-memory dataset covering all eight source
//! tables. The demo binary runs the full analysis suite against it, and
//! integration tests use it where a hand-written fixture would be noise.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, Int32Array, StringArray,
    TimestampMicrosecondArray,
};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::schema;
use crate::utils::arrow::{days_from_date, micros_from_datetime};

/// Knobs for dataset size and reproducibility
#[derive(Debug, Clone, Copy)]
pub struct SyntheticOptions {
    /// RNG seed; equal seeds produce equal datasets
    pub seed: u64,
    /// Number of customers
    pub customers: usize,
    /// Number of browsing sessions
    pub sessions: usize,
    /// Number of raw patient rows (before duplicates are injected)
    pub patients: usize,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            customers: 200,
            sessions: 500,
            patients: 60,
        }
    }
}

/// One record batch per source table
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// `customers` table
    pub customers: RecordBatch,
    /// `orders` table
    pub orders: RecordBatch,
    /// `order_items` table
    pub order_items: RecordBatch,
    /// `products` table
    pub products: RecordBatch,
    /// `financial_transactions` table
    pub financial_transactions: RecordBatch,
    /// `accounts` table
    pub accounts: RecordBatch,
    /// `page_events` table
    pub page_events: RecordBatch,
    /// `patient_records` table
    pub patient_records: RecordBatch,
}

const CHANNELS: [&str; 4] = ["organic", "paid_search", "referral", "social"];
const COUNTRIES: [&str; 4] = ["US", "GB", "DE", "DK"];
const INCOME_BRACKETS: [&str; 3] = ["low", "middle", "high"];
const DEVICE_TYPES: [&str; 3] = ["mobile", "desktop", "tablet"];
const MERCHANT_CATEGORIES: [&str; 4] = ["grocery", "electronics", "travel", "dining"];
const PRODUCTS: [(&str, &str); 10] = [
    ("p01", "espresso beans"),
    ("p02", "filter paper"),
    ("p03", "grinder"),
    ("p04", "kettle"),
    ("p05", "mug"),
    ("p06", "scale"),
    ("p07", "french press"),
    ("p08", "decaf beans"),
    ("p09", "milk frother"),
    ("p10", "cleaning tabs"),
];
const PRODUCT_CATEGORIES: [&str; 10] = [
    "coffee", "accessories", "equipment", "equipment", "accessories", "equipment", "equipment",
    "coffee", "equipment", "accessories",
];

fn day(rng: &mut StdRng, start: NaiveDate, span_days: i64) -> NaiveDate {
    start + TimeDelta::days(rng.random_range(0..span_days))
}

/// Generate the full dataset
pub fn generate(options: &SyntheticOptions) -> Result<SyntheticDataset> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let signup_start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();

    // customers + accounts
    let mut customer_ids = Vec::with_capacity(options.customers);
    let mut signup_dates = Vec::with_capacity(options.customers);
    for i in 0..options.customers {
        customer_ids.push(format!("c{i:04}"));
        signup_dates.push(day(&mut rng, signup_start, 600));
    }

    let customers = RecordBatch::try_new(
        schema::customers_schema(),
        vec![
            Arc::new(StringArray::from(
                customer_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(
                customer_ids
                    .iter()
                    .map(|id| Some(format!("Customer {id}")))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Date32Array::from(
                signup_dates
                    .iter()
                    .map(|d| Some(days_from_date(*d)))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                (0..options.customers)
                    .map(|_| Some(CHANNELS[rng.random_range(0..CHANNELS.len())]))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                (0..options.customers)
                    .map(|_| Some(INCOME_BRACKETS[rng.random_range(0..INCOME_BRACKETS.len())]))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Int32Array::from(
                (0..options.customers)
                    .map(|_| Some(rng.random_range(450..850)))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                (0..options.customers)
                    .map(|_| Some(COUNTRIES[rng.random_range(0..COUNTRIES.len())]))
                    .collect::<Vec<_>>(),
            )),
        ],
    )?;

    let accounts = RecordBatch::try_new(
        schema::accounts_schema(),
        vec![
            Arc::new(StringArray::from(
                customer_ids
                    .iter()
                    .map(|id| format!("a-{id}"))
                    .collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(
                customer_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                (0..options.customers)
                    .map(|_| Some(if rng.random_bool(0.7) { "checking" } else { "savings" }))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Date32Array::from(
                signup_dates
                    .iter()
                    .map(|d| Some(days_from_date(*d)))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                (0..options.customers)
                    .map(|_| Some((rng.random_range(0..500_000) as f64) / 100.0))
                    .collect::<Vec<_>>(),
            )),
        ],
    )?;

    // orders + order_items
    let mut order_ids = Vec::new();
    let mut order_customers = Vec::new();
    let mut order_dates = Vec::new();
    let mut order_statuses = Vec::new();
    let mut order_totals = Vec::new();
    let mut item_order_ids = Vec::new();
    let mut item_product_ids = Vec::new();
    let mut item_quantities = Vec::new();
    let mut item_prices = Vec::new();

    for (i, customer_id) in customer_ids.iter().enumerate() {
        let order_count = rng.random_range(0..8);
        for o in 0..order_count {
            let order_id = format!("o-{customer_id}-{o}");
            let order_date = day(&mut rng, signup_dates[i], 400);
            let mut total = 0.0;
            let line_count = rng.random_range(1..4);
            for _ in 0..line_count {
                let product = rng.random_range(0..PRODUCTS.len());
                let quantity = rng.random_range(1..4);
                let unit_price = (rng.random_range(500..15_000) as f64) / 100.0;
                total += unit_price * f64::from(quantity);
                item_order_ids.push(order_id.clone());
                item_product_ids.push(PRODUCTS[product].0.to_string());
                item_quantities.push(Some(quantity));
                item_prices.push(Some(unit_price));
            }
            order_ids.push(order_id);
            order_customers.push(customer_id.clone());
            order_dates.push(Some(days_from_date(order_date)));
            order_statuses.push(Some(if rng.random_bool(0.9) {
                "completed"
            } else {
                "cancelled"
            }));
            order_totals.push(Some(total));
        }
    }

    let orders = RecordBatch::try_new(
        schema::orders_schema(),
        vec![
            Arc::new(StringArray::from(
                order_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(
                order_customers.iter().map(String::as_str).collect::<Vec<_>>(),
            )),
            Arc::new(Date32Array::from(order_dates)),
            Arc::new(StringArray::from(order_statuses)),
            Arc::new(Float64Array::from(order_totals)),
        ],
    )?;

    let order_items = RecordBatch::try_new(
        schema::order_items_schema(),
        vec![
            Arc::new(StringArray::from(
                item_order_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(
                item_product_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            )),
            Arc::new(Int32Array::from(item_quantities)),
            Arc::new(Float64Array::from(item_prices)),
        ],
    )?;

    let products = RecordBatch::try_new(
        schema::products_schema(),
        vec![
            Arc::new(StringArray::from(
                PRODUCTS.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(
                PRODUCTS.iter().map(|(_, name)| Some(*name)).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                PRODUCT_CATEGORIES.iter().map(|c| Some(*c)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                (0..PRODUCTS.len())
                    .map(|_| Some((rng.random_range(500..20_000) as f64) / 100.0))
                    .collect::<Vec<_>>(),
            )),
        ],
    )?;

    // financial transactions: each customer has a personal spending level,
    // with rare large outliers that double as fraud candidates
    let mut txn_ids = Vec::new();
    let mut txn_customers = Vec::new();
    let mut txn_amounts = Vec::new();
    let mut txn_timestamps = Vec::new();
    let mut txn_types = Vec::new();
    let mut txn_statuses = Vec::new();
    let mut txn_merchants = Vec::new();
    let mut txn_devices = Vec::new();
    let mut txn_locations = Vec::new();
    let mut txn_fraud = Vec::new();

    for (i, customer_id) in customer_ids.iter().enumerate() {
        let base_spend = (rng.random_range(1_000..20_000) as f64) / 100.0;
        let txn_count = rng.random_range(0..12);
        for t in 0..txn_count {
            let outlier = rng.random_bool(0.02);
            let amount = if outlier {
                base_spend * rng.random_range(15..40) as f64
            } else {
                base_spend * (0.5 + rng.random::<f64>())
            };
            let date = day(&mut rng, signup_dates[i], 500);
            let timestamp = date.and_hms_opt(rng.random_range(0..24), rng.random_range(0..60), 0);
            txn_ids.push(format!("t-{customer_id}-{t}"));
            txn_customers.push(customer_id.clone());
            txn_amounts.push(Some(amount));
            txn_timestamps.push(timestamp.map(micros_from_datetime));
            txn_types.push(Some(if rng.random_bool(0.05) { "refund" } else { "purchase" }));
            txn_statuses.push(Some(if rng.random_bool(0.95) { "completed" } else { "pending" }));
            txn_merchants.push(Some(
                MERCHANT_CATEGORIES[rng.random_range(0..MERCHANT_CATEGORIES.len())],
            ));
            txn_devices.push(Some(DEVICE_TYPES[rng.random_range(0..DEVICE_TYPES.len())]));
            txn_locations.push(Some(COUNTRIES[rng.random_range(0..COUNTRIES.len())]));
            txn_fraud.push(Some(outlier && rng.random_bool(0.5)));
        }
    }

    let financial_transactions = RecordBatch::try_new(
        schema::financial_transactions_schema(),
        vec![
            Arc::new(StringArray::from(
                txn_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(
                txn_customers.iter().map(String::as_str).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(txn_amounts)),
            Arc::new(TimestampMicrosecondArray::from(txn_timestamps)),
            Arc::new(StringArray::from(txn_types)),
            Arc::new(StringArray::from(txn_statuses)),
            Arc::new(StringArray::from(txn_merchants)),
            Arc::new(StringArray::from(txn_devices)),
            Arc::new(StringArray::from(txn_locations)),
            Arc::new(BooleanArray::from(txn_fraud)),
        ],
    )?;

    // page events: sessions walk the funnel with drop-off at each step
    let mut event_sessions = Vec::new();
    let mut event_customers = Vec::new();
    let mut event_urls = Vec::new();
    let mut event_types = Vec::new();
    let mut event_timestamps = Vec::new();

    let funnel_steps: [(&str, &str); 5] = [
        ("/", "page_view"),
        ("/product/1", "page_view"),
        ("/cart", "add_to_cart"),
        ("/checkout", "checkout"),
        ("/confirmation", "purchase"),
    ];
    let session_start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    for s in 0..options.sessions {
        let session_id = format!("s{s:05}");
        let customer = if rng.random_bool(0.6) {
            Some(customer_ids[rng.random_range(0..customer_ids.len())].clone())
        } else {
            None
        };
        let date = day(&mut rng, session_start, 90);
        let mut minute = 0u32;
        for (step, (url, event_type)) in funnel_steps.iter().enumerate() {
            event_sessions.push(session_id.clone());
            event_customers.push(customer.clone());
            event_urls.push(Some((*url).to_string()));
            event_types.push(Some((*event_type).to_string()));
            event_timestamps.push(
                date.and_hms_opt(12, minute, 0)
                    .map(micros_from_datetime),
            );
            minute += 1;
            // Progressive drop-off keeps the funnel shape realistic
            if step < funnel_steps.len() - 1 && rng.random_bool(0.4) {
                break;
            }
        }
    }

    let page_events = RecordBatch::try_new(
        schema::page_events_schema(),
        vec![
            Arc::new(StringArray::from(
                event_sessions.iter().map(String::as_str).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(
                event_customers
                    .iter()
                    .map(|c| c.as_deref())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(event_urls)),
            Arc::new(StringArray::from(event_types)),
            Arc::new(TimestampMicrosecondArray::from(event_timestamps)),
        ],
    )?;

    // patient records: deliberately messy, with injected duplicates
    let mut patient_ids = Vec::new();
    let mut first_names = Vec::new();
    let mut last_names = Vec::new();
    let mut birth_dates = Vec::new();
    let mut genders = Vec::new();
    let mut admissions = Vec::new();
    let mut phones = Vec::new();
    let mut addresses = Vec::new();
    let mut diagnoses = Vec::new();

    let gender_codes = ["M", "F", "male", "female", "1", "2", "?"];
    let first_pool = ["Alice", "Bob", "Carol", "David", "Eve", "Frank"];
    let last_pool = ["Hansen", "Jensen", "Nielsen", "Larsen", "Olsen"];
    let diagnosis_pool = ["observation", "fracture", "pneumonia", "migraine"];
    let admission_start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

    for p in 0..options.patients {
        let patient_id = format!("pat{p:03}");
        let admission = day(&mut rng, admission_start, 300);
        let duplicate = rng.random_bool(0.2);
        let copies = if duplicate { 2 } else { 1 };
        let first = first_pool[rng.random_range(0..first_pool.len())];
        let last = last_pool[rng.random_range(0..last_pool.len())];
        let birth = format!("19{:02}-0{}-1{}", rng.random_range(40..99), rng.random_range(1..9), rng.random_range(0..9));
        for copy in 0..copies {
            // Later copies get a later admission so dedup has a winner
            let admission = admission + TimeDelta::days(i64::from(copy) * 30);
            let formatted = match rng.random_range(0..3) {
                0 => admission.format("%Y-%m-%d").to_string(),
                1 => admission.format("%m/%d/%Y").to_string(),
                _ => admission.format("%B %d, %Y").to_string(),
            };
            patient_ids.push(patient_id.clone());
            first_names.push(Some(first.to_string()));
            last_names.push(Some(last.to_string()));
            birth_dates.push(Some(birth.clone()));
            genders.push(Some(
                gender_codes[rng.random_range(0..gender_codes.len())].to_string(),
            ));
            admissions.push(Some(formatted));
            phones.push(if rng.random_bool(0.3) {
                None
            } else {
                Some(format!("555-01{:02}", rng.random_range(0..100)))
            });
            addresses.push(Some(format!(
                "{} Main St, Springfield, IL",
                rng.random_range(1..999)
            )));
            diagnoses.push(Some(
                diagnosis_pool[rng.random_range(0..diagnosis_pool.len())].to_string(),
            ));
        }
    }

    let patient_records = RecordBatch::try_new(
        schema::patient_records_schema(),
        vec![
            Arc::new(StringArray::from(
                patient_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(StringArray::from(first_names)),
            Arc::new(StringArray::from(last_names)),
            Arc::new(StringArray::from(birth_dates)),
            Arc::new(StringArray::from(genders)),
            Arc::new(StringArray::from(admissions)),
            Arc::new(StringArray::from(phones)),
            Arc::new(StringArray::from(addresses)),
            Arc::new(StringArray::from(diagnoses)),
        ],
    )?;

    Ok(SyntheticDataset {
        customers,
        orders,
        order_items,
        products,
        financial_transactions,
        accounts,
        page_events,
        patient_records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_for_equal_seeds() {
        let options = SyntheticOptions {
            customers: 20,
            sessions: 30,
            patients: 10,
            ..SyntheticOptions::default()
        };
        let a = generate(&options).unwrap();
        let b = generate(&options).unwrap();
        assert_eq!(a.customers, b.customers);
        assert_eq!(a.financial_transactions, b.financial_transactions);
        assert_eq!(a.page_events, b.page_events);
    }

    #[test]
    fn test_row_counts() {
        let options = SyntheticOptions {
            customers: 20,
            sessions: 30,
            patients: 10,
            ..SyntheticOptions::default()
        };
        let dataset = generate(&options).unwrap();
        assert_eq!(dataset.customers.num_rows(), 20);
        assert_eq!(dataset.accounts.num_rows(), 20);
        assert_eq!(dataset.products.num_rows(), 10);
        // Duplicates can push patient rows past the requested count
        assert!(dataset.patient_records.num_rows() >= 10);
    }
}
