//! Wire contracts for single-image analysis.

use serde::{Deserialize, Serialize};

/// Highest-probability classification for an analyzed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopClass {
    pub label: String,
    pub probability: f64,
}

impl TopClass {
    /// Display form of the probability, e.g. `82.0%`.
    pub fn probability_percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}

/// Raw classifier output for one image. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub top_class: TopClass,

    /// Grad-CAM focus map as a base64 PNG. Absent when explainability is
    /// unavailable; views render without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradcam_overlay_png_b64: Option<String>,
}

/// Server-authored care recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub summary: String,
    pub evidence_level: String,
    pub when_to_see_doctor: String,
}

/// Response of the single-image predict operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictOutcome {
    pub prediction: Prediction,

    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}
