//! Wire contracts for the clinician-facing patient endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub gender: String,
}

/// One stored analysis record for a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub created_at: String,
    pub predicted_disease: String,

    #[serde(default)]
    pub severity: String,

    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientPredictions {
    #[serde(default)]
    pub predictions: Vec<PredictionRecord>,

    #[serde(default)]
    pub count: usize,
}
