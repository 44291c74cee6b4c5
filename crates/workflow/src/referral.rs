//! Clinician handoff report retrieval.

use api_gateway::ApiGateway;
use skinmorph_common::{Error, Result};
use tracing::info;

/// Fetch the handoff report and verify the payload is a PDF document.
///
/// The bytes are handed to the caller as-is; writing or displaying them is
/// the view's concern.
pub async fn fetch_report(gateway: &ApiGateway) -> Result<Vec<u8>> {
    let bytes = gateway.report().await?;

    if !bytes.starts_with(b"%PDF") {
        return Err(Error::Payload(
            "report payload is not a PDF document".to_string(),
        ));
    }

    info!("Fetched handoff report ({} bytes)", bytes.len());
    Ok(bytes)
}
