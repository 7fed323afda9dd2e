use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;

use customer_analytics::analytics::{
    analyze_affinity, analyze_cohorts, analyze_funnel, analyze_paths, assess_churn,
    clean_patient_records, customer_stats, score_customers, score_transactions,
    summarize_segments,
};
use customer_analytics::config::AnalyticsConfig;
use customer_analytics::io::write_parquet;
use customer_analytics::models::{
    Customer, FinancialTransaction, Order, OrderItem, PageEvent, PatientRecord,
};
use customer_analytics::report::{build_customer_view, build_fraud_view};
use customer_analytics::utils::logging::log_analysis_complete;
use customer_analytics::utils::synthetic::{SyntheticOptions, generate};
use customer_analytics::Result;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional config file as the first argument, defaults otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => AnalyticsConfig::from_json_file(Path::new(&path))?,
        None => AnalyticsConfig::default(),
    };
    let out_dir = PathBuf::from("reports");

    info!("Generating synthetic dataset");
    let dataset = generate(&SyntheticOptions::default())?;

    let customers = Customer::from_record_batch(&dataset.customers)?;
    let orders = Order::from_record_batch(&dataset.orders)?;
    let order_items = OrderItem::from_record_batch(&dataset.order_items)?;
    let transactions = FinancialTransaction::from_record_batch(&dataset.financial_transactions)?;
    let page_events = PageEvent::from_record_batch(&dataset.page_events)?;
    let patient_records = PatientRecord::from_record_batch(&dataset.patient_records)?;
    info!(
        "Loaded {} customers, {} orders, {} transactions, {} page events, {} patient rows",
        customers.len(),
        orders.len(),
        transactions.len(),
        page_events.len(),
        patient_records.len()
    );

    // Data cleaning
    let start = Instant::now();
    let cleaned = clean_patient_records(&patient_records, &config.cleaning);
    log_analysis_complete("patient cleaning", cleaned.len(), start.elapsed());

    // Funnel
    let start = Instant::now();
    let funnel = analyze_funnel(&page_events);
    log_analysis_complete("funnel", funnel.stages.len(), start.elapsed());
    for stage in &funnel.stages {
        info!(
            "  {}: {} sessions, conversion {}",
            stage.stage.as_str(),
            stage.sessions,
            stage
                .conversion_from_previous
                .map_or_else(|| "n/a".to_string(), |c| format!("{:.1}%", c * 100.0))
        );
    }
    if let Some(overall) = funnel.overall_conversion {
        info!("  overall conversion: {:.1}%", overall * 100.0);
    }

    // Paths
    let start = Instant::now();
    let paths = analyze_paths(&page_events, 10);
    log_analysis_complete("path analysis", paths.len(), start.elapsed());
    for pattern in paths.iter().take(3) {
        info!("  {} ({} sessions)", pattern.path, pattern.sessions);
    }

    // Cohorts
    let start = Instant::now();
    let cohorts = analyze_cohorts(&customers, &orders, config.cohort.max_offset_months);
    log_analysis_complete("cohort retention", cohorts.len(), start.elapsed());

    // RFM / CLV
    let start = Instant::now();
    let rfm_scores = score_customers(&transactions, &config.rfm, config.reference_date);
    let segments = summarize_segments(&rfm_scores, &config.rfm);
    log_analysis_complete("rfm scoring", rfm_scores.len(), start.elapsed());
    for summary in &segments {
        info!(
            "  {}: {} customers, avg spend {:.2}",
            summary.segment.as_str(),
            summary.customers,
            summary.avg_monetary
        );
    }

    // Churn
    let start = Instant::now();
    let churn = assess_churn(&customers, &orders, &config.churn, config.reference_date);
    log_analysis_complete("churn assessment", churn.len(), start.elapsed());

    // Anomaly detection
    let start = Instant::now();
    let scored = score_transactions(&transactions, &config.anomaly);
    let profiles = customer_stats(&transactions, &config.anomaly);
    log_analysis_complete("anomaly scoring", scored.len(), start.elapsed());

    // Market basket
    let start = Instant::now();
    let affinities = analyze_affinity(&order_items, &config.affinity);
    log_analysis_complete("basket affinity", affinities.len(), start.elapsed());
    for pair in affinities.iter().take(3) {
        info!(
            "  {} + {}: {} co-occurrences ({})",
            pair.product_a,
            pair.product_b,
            pair.co_occurrences,
            pair.level.as_str()
        );
    }

    // Persisted report views
    let customer_view = build_customer_view(&rfm_scores, &churn)?;
    write_parquet(&[customer_view], &out_dir.join("customer_analytics.parquet"))?;
    let fraud_view = build_fraud_view(&scored, &profiles, false)?;
    write_parquet(&[fraud_view], &out_dir.join("fraud_monitoring.parquet"))?;

    info!("All analyses completed; report views written to {}", out_dir.display());
    Ok(())
}
