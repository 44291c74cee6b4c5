//! Authenticated request gateway for the SkinMorph remote API.
//!
//! Every outbound call goes through [`ApiGateway`], which attaches the
//! current bearer token (read fresh from the credential store on each
//! dispatch, never cached) and converts unauthorized and validation
//! responses into the shared error taxonomy.

pub mod client;
pub mod config;

pub use client::{ApiGateway, ImageUpload};
pub use config::GatewayConfig;
