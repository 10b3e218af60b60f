//! Transport traits.

use umeng_core::{ApiResponse, TransportError};
use umeng_crypto::SignedRequest;

/// Low-level request sender.
#[trait_variant::make(Send)]
pub trait Transport: Send + Sync {
    /// Transmit a signed request and decode the API reply.
    async fn execute(&self, request: &SignedRequest) -> Result<ApiResponse, TransportError>;
}
