//! The clinician-facing patient roster.

use std::sync::Arc;

use api_gateway::ApiGateway;
use skinmorph_common::roster::{PatientInfo, PatientPredictions};
use skinmorph_common::Result;
use tracing::info;

/// Loads the patient list and per-patient analysis history for the
/// clinician dashboard. The route guard keeps patient accounts away from
/// this view; the server additionally enforces the role.
pub struct PatientRoster {
    gateway: Arc<ApiGateway>,
}

impl PatientRoster {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch all patients. An empty roster is a defined, non-error state.
    pub async fn load_patients(&self) -> Result<Vec<PatientInfo>> {
        let patients = self.gateway.patients().await?;
        info!("Loaded {} patients", patients.len());
        Ok(patients)
    }

    /// Fetch the stored analysis records for one patient.
    pub async fn load_predictions(&self, patient_id: &str) -> Result<PatientPredictions> {
        let history = self.gateway.patient_predictions(patient_id).await?;
        info!(
            "Loaded {} analysis records for patient {}",
            history.predictions.len(),
            patient_id
        );
        Ok(history)
    }
}
