//! Wire contracts for the multi-frame risk simulation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical simulation horizons, in display order.
pub const TIMEPOINTS: [&str; 3] = ["30d", "6mo", "1yr"];

/// Risk scores for one future time point. All values in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScores {
    pub pigmentation_risk: f64,
    pub acne_risk: f64,
    pub wrinkle_risk: f64,
}

/// Result of one multi-frame simulation call. Produced fresh per call and
/// never persisted client-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskTrajectory {
    #[serde(default)]
    pub risks: BTreeMap<String, RiskScores>,

    /// Optional overlay image per time point (base64 PNG). A missing
    /// overlay for a time point is valid; the scores render without it.
    #[serde(default)]
    pub future_visuals_png_b64: BTreeMap<String, String>,
}

impl RiskTrajectory {
    /// Time-point labels in canonical order, followed by any extra labels
    /// the server returned.
    pub fn ordered_timepoints(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = TIMEPOINTS
            .iter()
            .copied()
            .filter(|tp| self.risks.contains_key(*tp))
            .collect();
        for tp in self.risks.keys() {
            if !TIMEPOINTS.contains(&tp.as_str()) {
                ordered.push(tp);
            }
        }
        ordered
    }

    pub fn visual_for(&self, timepoint: &str) -> Option<&str> {
        self.future_visuals_png_b64.get(timepoint).map(String::as_str)
    }
}
