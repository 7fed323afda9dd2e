//! Patient record cleaning
//!
//! Normalizes raw patient rows: parses free-text dates, canonicalizes
//! gender codes, splits the comma-delimited address, substitutes a
//! sentinel for missing phone numbers, and removes duplicates keeping the
//! most recent admission per patient identity.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::config::CleaningConfig;
use crate::models::patient::{CleanPatientRecord, PatientRecord};
use crate::models::types::Gender;

/// Parse a free-text date by trying each configured format in order
#[must_use]
pub fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Split a "street, city, state" address into its parts
///
/// Missing trailing parts come back as `None`; extra commas beyond the
/// third are kept inside the state part.
fn split_address(address: &str) -> (Option<String>, Option<String>, Option<String>) {
    let mut parts = address.splitn(3, ',').map(|p| {
        let p = p.trim();
        (!p.is_empty()).then(|| p.to_string())
    });
    let street = parts.next().flatten();
    let city = parts.next().flatten();
    let state = parts.next().flatten();
    (street, city, state)
}

/// Identity key a duplicate is judged on
fn dedup_key(record: &CleanPatientRecord) -> (String, String, String, Option<NaiveDate>) {
    (
        record.patient_id.clone(),
        record.first_name.clone().unwrap_or_default(),
        record.last_name.clone().unwrap_or_default(),
        record.date_of_birth,
    )
}

/// Normalize a single raw record
fn normalize(record: &PatientRecord, config: &CleaningConfig) -> CleanPatientRecord {
    let (street, city, state) = record
        .address
        .as_deref()
        .map_or((None, None, None), split_address);

    let phone = match record.phone.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => config.missing_phone_sentinel.clone(),
    };

    CleanPatientRecord {
        patient_id: record.patient_id.clone(),
        first_name: record.first_name.as_deref().map(|s| s.trim().to_string()),
        last_name: record.last_name.as_deref().map(|s| s.trim().to_string()),
        date_of_birth: record
            .date_of_birth
            .as_deref()
            .and_then(|d| parse_date(d, &config.date_formats)),
        gender: record
            .gender
            .as_deref()
            .map_or(Gender::Unknown, Gender::from),
        admission_date: record
            .admission_date
            .as_deref()
            .and_then(|d| parse_date(d, &config.date_formats)),
        phone,
        street,
        city,
        state,
        diagnosis: record.diagnosis.clone(),
    }
}

/// Clean a set of raw patient records
///
/// Duplicates share (patient_id, first_name, last_name, date_of_birth);
/// the survivor is the row with the latest parsed admission date. A row
/// with a parsed date always beats one without.
#[must_use]
pub fn clean_patient_records(
    records: &[PatientRecord],
    config: &CleaningConfig,
) -> Vec<CleanPatientRecord> {
    let mut survivors: FxHashMap<_, CleanPatientRecord> = FxHashMap::default();
    let mut key_order = Vec::new();

    for record in records {
        let clean = normalize(record, config);
        let key = dedup_key(&clean);
        match survivors.get_mut(&key) {
            None => {
                key_order.push(key.clone());
                survivors.insert(key, clean);
            }
            Some(existing) => {
                if clean.admission_date > existing.admission_date {
                    *existing = clean;
                }
            }
        }
    }

    // Preserve first-seen order of each identity
    key_order
        .into_iter()
        .filter_map(|key| survivors.remove(&key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(patient_id: &str, admission: Option<&str>) -> PatientRecord {
        PatientRecord {
            patient_id: patient_id.to_string(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            date_of_birth: Some("1985-03-12".to_string()),
            gender: Some("F".to_string()),
            admission_date: admission.map(str::to_string),
            phone: None,
            address: Some("12 Elm St, Springfield, IL".to_string()),
            diagnosis: Some("observation".to_string()),
        }
    }

    #[test]
    fn test_date_parsing_formats() {
        let config = CleaningConfig::default();
        let expected = NaiveDate::from_ymd_opt(2023, 4, 5).unwrap();
        assert_eq!(parse_date("2023-04-05", &config.date_formats), Some(expected));
        assert_eq!(parse_date("04/05/2023", &config.date_formats), Some(expected));
        assert_eq!(parse_date("05-04-2023", &config.date_formats), Some(expected));
        assert_eq!(
            parse_date("April 05, 2023", &config.date_formats),
            Some(expected)
        );
        assert_eq!(parse_date("garbage", &config.date_formats), None);
        assert_eq!(parse_date("  ", &config.date_formats), None);
    }

    #[test]
    fn test_address_split() {
        let cleaned = clean_patient_records(&[raw("p1", Some("2023-01-01"))], &CleaningConfig::default());
        assert_eq!(cleaned[0].street.as_deref(), Some("12 Elm St"));
        assert_eq!(cleaned[0].city.as_deref(), Some("Springfield"));
        assert_eq!(cleaned[0].state.as_deref(), Some("IL"));
    }

    #[test]
    fn test_phone_sentinel() {
        let config = CleaningConfig::default();
        let cleaned = clean_patient_records(&[raw("p1", Some("2023-01-01"))], &config);
        assert_eq!(cleaned[0].phone, config.missing_phone_sentinel);
    }

    #[test]
    fn test_dedup_keeps_latest_admission() {
        let config = CleaningConfig::default();
        let cleaned = clean_patient_records(
            &[raw("p1", Some("2023-01-01")), raw("p1", Some("2023-06-15"))],
            &config,
        );
        assert_eq!(cleaned.len(), 1);
        assert_eq!(
            cleaned[0].admission_date,
            Some(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
        );
    }

    #[test]
    fn test_dedup_parsed_date_beats_unparseable() {
        let config = CleaningConfig::default();
        let cleaned = clean_patient_records(
            &[raw("p1", Some("not a date")), raw("p1", Some("2023-06-15"))],
            &config,
        );
        assert_eq!(cleaned.len(), 1);
        assert!(cleaned[0].admission_date.is_some());
    }

    #[test]
    fn test_distinct_patients_survive() {
        let config = CleaningConfig::default();
        let cleaned = clean_patient_records(
            &[raw("p1", Some("2023-01-01")), raw("p2", Some("2023-01-01"))],
            &config,
        );
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].patient_id, "p1");
        assert_eq!(cleaned[1].patient_id, "p2");
    }
}
