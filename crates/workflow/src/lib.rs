//! View-facing workflow components.
//!
//! The relay carries ephemeral analysis results between views; the
//! aggregators and drivers fetch persisted or computed state through the
//! gateway. None of them write session state.

pub mod referral;
pub mod relay;
pub mod roster;
pub mod simulator;
pub mod timeline;

pub use relay::{NavigationToken, WorkflowPayload, WorkflowRelay};
pub use roster::PatientRoster;
pub use simulator::SimulationDriver;
pub use timeline::TimelineAggregator;
