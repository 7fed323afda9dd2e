//! Patient record models
//!
//! `PatientRecord` mirrors the raw table: free-text dates, inconsistent
//! gender codes, a comma-delimited address. `CleanPatientRecord` is the
//! normalized shape produced by the cleaning analysis.

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::types::Gender;
use crate::utils::arrow::{string_column, string_value};

/// A raw row of the `patient_records` table
#[derive(Debug, Clone)]
pub struct PatientRecord {
    /// Patient identifier
    pub patient_id: String,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Date of birth as entered
    pub date_of_birth: Option<String>,
    /// Gender code as entered (M/F/male/2/...)
    pub gender: Option<String>,
    /// Admission date as free text, in any of several formats
    pub admission_date: Option<String>,
    /// Phone number, possibly empty
    pub phone: Option<String>,
    /// Comma-delimited "street, city, state" address
    pub address: Option<String>,
    /// Admission diagnosis
    pub diagnosis: Option<String>,
}

impl PatientRecord {
    /// Extract all raw patient records from a record batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let patient_ids = string_column(batch, "patient_id")?;
        let first_names = string_column(batch, "first_name")?;
        let last_names = string_column(batch, "last_name")?;
        let birth_dates = string_column(batch, "date_of_birth")?;
        let genders = string_column(batch, "gender")?;
        let admissions = string_column(batch, "admission_date")?;
        let phones = string_column(batch, "phone")?;
        let addresses = string_column(batch, "address")?;
        let diagnoses = string_column(batch, "diagnosis")?;

        let mut records = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            records.push(Self {
                patient_id: patient_ids.value(row).to_string(),
                first_name: string_value(first_names, row),
                last_name: string_value(last_names, row),
                date_of_birth: string_value(birth_dates, row),
                gender: string_value(genders, row),
                admission_date: string_value(admissions, row),
                phone: string_value(phones, row),
                address: string_value(addresses, row),
                diagnosis: string_value(diagnoses, row),
            });
        }
        Ok(records)
    }
}

/// A normalized patient record, output of the cleaning analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CleanPatientRecord {
    /// Patient identifier
    pub patient_id: String,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Parsed date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Canonical gender
    pub gender: Gender,
    /// Parsed admission date
    pub admission_date: Option<NaiveDate>,
    /// Phone, with the sentinel substituted when missing
    pub phone: String,
    /// Street part of the address
    pub street: Option<String>,
    /// City part of the address
    pub city: Option<String>,
    /// State part of the address
    pub state: Option<String>,
    /// Admission diagnosis
    pub diagnosis: Option<String>,
}
