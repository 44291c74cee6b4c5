//! Shared data contracts and error taxonomy for the SkinMorph client core.
//!
//! The remote API speaks loosely-typed JSON; everything it sends or receives
//! is converted into the closed contracts in this crate at the gateway
//! boundary, so the rest of the client operates on fully-typed values.

pub mod auth;
pub mod error;
pub mod identity;
pub mod prediction;
pub mod roster;
pub mod simulation;
pub mod timeline;

pub use error::{Error, Result};
pub use identity::{Identity, Role};
