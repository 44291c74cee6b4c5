//! Configuration for the API gateway.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Timeouts are deliberately left to the underlying transport; the client
//! core enforces none of its own.

use skinmorph_common::{Error, Result};

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base address of the SkinMorph API
    pub base_url: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GatewayConfig {
            base_url: std::env::var("SKINMORPH_API_BASE")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
        };

        config.validate()?;

        Ok(config)
    }

    /// Build a configuration for an explicit base address.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let config = GatewayConfig {
            base_url: base_url.into(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Validation(
                "SKINMORPH_API_BASE must not be empty".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Validation(format!(
                "SKINMORPH_API_BASE must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Join a path onto the base address.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
