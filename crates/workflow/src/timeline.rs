//! The longitudinal lesion history.

use std::sync::Arc;

use api_gateway::ApiGateway;
use skinmorph_common::timeline::{Lesion, Observation};
use skinmorph_common::Result;
use tracing::info;

/// Message shown when the fetched timeline holds no lesions.
pub const EMPTY_TIMELINE_MESSAGE: &str =
    "No events yet. Use the capture flow to start tracking.";

/// Message shown under a lesion with no observations.
pub const EMPTY_LESION_MESSAGE: &str = "No observations yet.";

/// Fetches and holds the lesion history for display.
///
/// Each successful load replaces the previous view-model wholesale, no
/// incremental merging; ordering is exactly what the server returned, so
/// the client never diverges from the record of truth.
pub struct TimelineAggregator {
    gateway: Arc<ApiGateway>,
    lesions: Vec<Lesion>,
}

impl TimelineAggregator {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            gateway,
            lesions: Vec::new(),
        }
    }

    /// Fetch the timeline, replacing the held lesion list on success.
    ///
    /// A failed fetch leaves the previous list in place and surfaces the
    /// error once; retry is the caller invoking `load` again.
    pub async fn load(&mut self) -> Result<&[Lesion]> {
        let response = self.gateway.timeline().await?;
        info!("Loaded timeline with {} lesions", response.lesions.len());
        self.lesions = response.lesions;
        Ok(&self.lesions)
    }

    pub fn lesions(&self) -> &[Lesion] {
        &self.lesions
    }

    pub fn is_empty(&self) -> bool {
        self.lesions.is_empty()
    }
}

/// Heading for one lesion, e.g. `Lesion #3 (forearm)`.
pub fn lesion_heading(lesion: &Lesion) -> String {
    match &lesion.body_site {
        Some(site) => format!("Lesion #{} ({})", lesion.lesion_id, site),
        None => format!("Lesion #{}", lesion.lesion_id),
    }
}

/// Display line for one observation: the classification, plus the
/// probability when the snapshot carries one. An unclassified observation
/// still renders, as "Unknown" with no percentage text.
pub fn observation_line(observation: &Observation) -> String {
    let label = observation.top_class.as_deref().unwrap_or("Unknown");
    match observation.top_prob {
        Some(probability) => format!("{} — {:.1}%", label, probability * 100.0),
        None => label.to_string(),
    }
}
