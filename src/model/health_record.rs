//! Health record resource.

use serde::{Deserialize, Serialize};

use super::non_empty;
use crate::error::StoreError;
use crate::store::Resource;

/// Youngest accepted patient age.
pub const MIN_AGE: i64 = 0;
/// Oldest accepted patient age.
pub const MAX_AGE: i64 = 150;

/// A patient health record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Store-assigned identifier.
    pub id: i64,
    /// Patient's full name.
    pub patient_name: String,
    /// Age in years, 0 to 150.
    pub age: i64,
    /// Diagnosis.
    pub diagnosis: String,
    /// Treatment, empty when none was given.
    #[serde(default)]
    pub treatment: String,
}

/// Request body for creating or replacing a health record.
///
/// Every field is optional at the parsing stage so that a missing field is
/// reported as a validation error rather than a parse error. Any `id` sent
/// by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthRecordDraft {
    /// Patient's full name (required).
    #[serde(default)]
    pub patient_name: Option<String>,
    /// Age in years (required).
    #[serde(default)]
    pub age: Option<i64>,
    /// Diagnosis (required).
    #[serde(default)]
    pub diagnosis: Option<String>,
    /// Treatment (optional).
    #[serde(default)]
    pub treatment: Option<String>,
}

impl HealthRecordDraft {
    /// Create a draft with all required fields set.
    pub fn new(patient_name: impl Into<String>, age: i64, diagnosis: impl Into<String>) -> Self {
        Self {
            patient_name: Some(patient_name.into()),
            age: Some(age),
            diagnosis: Some(diagnosis.into()),
            treatment: None,
        }
    }

    /// Set the treatment.
    pub fn with_treatment(mut self, treatment: impl Into<String>) -> Self {
        self.treatment = Some(treatment.into());
        self
    }
}

impl Resource for HealthRecord {
    type Draft = HealthRecordDraft;

    const COLLECTION: &'static str = "records";
    const LABEL: &'static str = "Record";

    fn from_draft(id: i64, draft: HealthRecordDraft) -> Result<Self, StoreError> {
        let patient_name = non_empty(draft.patient_name)
            .ok_or_else(|| StoreError::validation("patient_name is required"))?;

        let age = draft
            .age
            .ok_or_else(|| StoreError::validation("age is required"))?;
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(StoreError::validation(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}"
            )));
        }

        let diagnosis = non_empty(draft.diagnosis)
            .ok_or_else(|| StoreError::validation("diagnosis is required"))?;

        Ok(Self {
            id,
            patient_name,
            age,
            diagnosis,
            treatment: draft.treatment.unwrap_or_default(),
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                patient_name: "John Doe".to_string(),
                age: 35,
                diagnosis: "Flu".to_string(),
                treatment: "Rest and fluids".to_string(),
            },
            Self {
                id: 2,
                patient_name: "Jane Smith".to_string(),
                age: 28,
                diagnosis: "Sprained Ankle".to_string(),
                treatment: "Ice and elevation".to_string(),
            },
        ]
    }
}
