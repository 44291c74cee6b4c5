//! Session lifecycle and role-gated navigation.
//!
//! The [`SessionController`] is the single writer of the credential store
//! and the in-memory identity; the route guard in [`guard`] reads that
//! identity to decide which views a navigation may reach.

pub mod controller;
pub mod guard;

pub use controller::{SessionController, SessionState};
pub use guard::{check, Access, View};
