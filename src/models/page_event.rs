//! Clickstream page event model

use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::models::types::FunnelStage;
use crate::utils::arrow::{string_column, string_value, timestamp_column, timestamp_value};

/// A row of the `page_events` clickstream table
#[derive(Debug, Clone)]
pub struct PageEvent {
    /// Browser session identifier
    pub session_id: String,
    /// Customer, when the session is authenticated
    pub customer_id: Option<String>,
    /// URL of the page the event fired on
    pub page_url: Option<String>,
    /// Event type (page_view, add_to_cart, checkout, purchase, ...)
    pub event_type: Option<String>,
    /// When the event fired
    pub timestamp: Option<NaiveDateTime>,
}

impl PageEvent {
    /// Extract all page events from a record batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let session_ids = string_column(batch, "session_id")?;
        let customer_ids = string_column(batch, "customer_id")?;
        let urls = string_column(batch, "page_url")?;
        let event_types = string_column(batch, "event_type")?;
        let timestamps = timestamp_column(batch, "timestamp")?;

        let mut events = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            events.push(Self {
                session_id: session_ids.value(row).to_string(),
                customer_id: string_value(customer_ids, row),
                page_url: string_value(urls, row),
                event_type: string_value(event_types, row),
                timestamp: timestamp_value(timestamps, row),
            });
        }
        Ok(events)
    }

    /// Page category derived from the first URL path segment
    ///
    /// The root path maps to `home`; events without a URL have no category.
    #[must_use]
    pub fn page_category(&self) -> Option<&str> {
        let url = self.page_url.as_deref()?;
        let path = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .map_or(url, |rest| rest.find('/').map_or("", |i| &rest[i..]));
        let segment = path.trim_matches('/').split('/').next().unwrap_or("");
        if segment.is_empty() {
            Some("home")
        } else {
            Some(segment)
        }
    }

    /// Funnel stage this event represents, if any
    ///
    /// The event type wins over the page category, so a `purchase` event on
    /// the checkout page still counts as a purchase.
    #[must_use]
    pub fn funnel_stage(&self) -> Option<FunnelStage> {
        if let Some(event_type) = self.event_type.as_deref() {
            match event_type.trim().to_lowercase().as_str() {
                "purchase" => return Some(FunnelStage::Purchase),
                "checkout" => return Some(FunnelStage::Checkout),
                "add_to_cart" => return Some(FunnelStage::AddToCart),
                _ => {}
            }
        }
        match self.page_category()? {
            "home" => Some(FunnelStage::Home),
            "product" | "products" => Some(FunnelStage::ProductView),
            "cart" => Some(FunnelStage::AddToCart),
            "checkout" => Some(FunnelStage::Checkout),
            "purchase" | "confirmation" => Some(FunnelStage::Purchase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(url: &str, event_type: &str) -> PageEvent {
        PageEvent {
            session_id: "s1".to_string(),
            customer_id: None,
            page_url: Some(url.to_string()),
            event_type: Some(event_type.to_string()),
            timestamp: None,
        }
    }

    #[test]
    fn test_page_category() {
        assert_eq!(event("/", "page_view").page_category(), Some("home"));
        assert_eq!(
            event("/product/123", "page_view").page_category(),
            Some("product")
        );
        assert_eq!(
            event("https://shop.example.com/cart", "page_view").page_category(),
            Some("cart")
        );
        assert_eq!(
            event("https://shop.example.com", "page_view").page_category(),
            Some("home")
        );
    }

    #[test]
    fn test_event_type_wins_over_url() {
        assert_eq!(
            event("/checkout", "purchase").funnel_stage(),
            Some(FunnelStage::Purchase)
        );
        assert_eq!(
            event("/checkout", "page_view").funnel_stage(),
            Some(FunnelStage::Checkout)
        );
    }

    #[test]
    fn test_unclassified_pages() {
        assert_eq!(event("/blog/post-1", "page_view").funnel_stage(), None);
    }
}
