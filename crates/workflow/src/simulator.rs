//! Multi-frame risk simulation.

use std::sync::Arc;

use api_gateway::{ApiGateway, ImageUpload};
use skinmorph_common::simulation::RiskTrajectory;
use skinmorph_common::{Error, Result};
use tracing::{debug, info};

/// Issues multi-frame predictions and holds the latest trajectory.
///
/// A failed run leaves the previously rendered trajectory untouched; there
/// is no partial overwrite.
pub struct SimulationDriver {
    gateway: Arc<ApiGateway>,
    trajectory: Option<RiskTrajectory>,
}

impl SimulationDriver {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            gateway,
            trajectory: None,
        }
    }

    /// Run a simulation over an ordered frame sequence.
    pub async fn run(&mut self, frames: Vec<ImageUpload>) -> Result<&RiskTrajectory> {
        if frames.is_empty() {
            return Err(Error::Validation(
                "simulation requires at least one frame".to_string(),
            ));
        }

        debug!("Running simulation over {} frames", frames.len());
        let trajectory = self.gateway.predict_sequence(frames).await?;
        info!("Simulation returned {} time points", trajectory.risks.len());

        Ok(self.trajectory.insert(trajectory))
    }

    /// Demo affordance: replay one frame `count` times through the same
    /// contract. Frames are not deduplicated or validated for
    /// distinctness; production callers supply real sequences.
    pub async fn run_demo(&mut self, frame: ImageUpload, count: usize) -> Result<&RiskTrajectory> {
        let frames = vec![frame; count.max(1)];
        self.run(frames).await
    }

    /// The most recent successful trajectory, if any.
    pub fn trajectory(&self) -> Option<&RiskTrajectory> {
        self.trajectory.as_ref()
    }
}
