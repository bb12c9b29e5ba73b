//! Backend adapter contract and provider registry.
//!
//! Provides an abstraction layer over rig-core so the rest of the crate
//! only sees [`ProviderAdapter`]: one prompt in, one raw reply out.

pub mod registry;
pub mod rig;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::BackendName;

pub use registry::{BackendInfo, ProviderRegistry};

/// Errors from resolving or invoking a backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The requested backend is unknown or has no credential configured.
    #[error("LLM provider '{name}' not available. Available providers: [{}]", .available.join(", "))]
    Unavailable {
        name: String,
        available: Vec<String>,
    },

    /// Transport failure or timeout while talking to the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with its own error (auth, quota, bad request).
    #[error("LLM API error: {0}")]
    Backend(String),
}

/// Uniform call contract over one configured backend.
///
/// Implementations perform exactly one round trip per `invoke` and hold no
/// request-scoped state, so a single instance may be shared across
/// concurrent requests.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which backend this adapter talks to.
    fn backend(&self) -> BackendName;

    /// Model id sent with each request.
    fn model(&self) -> &str;

    /// Send `prompt` and return the backend's raw reply text.
    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Invoke an adapter, abandoning the wait after `timeout`.
///
/// Expiry is reported as [`ProviderError::Network`]. The in-flight request
/// is not cancelled on the backend side.
pub async fn invoke_with_timeout(
    adapter: &dyn ProviderAdapter,
    prompt: &str,
    timeout: Duration,
) -> Result<String, ProviderError> {
    match tokio::time::timeout(timeout, adapter.invoke(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Network(format!(
            "{} request timed out after {timeout:?}",
            adapter.backend()
        ))),
    }
}

/// Markers identifying a failure below the HTTP layer.
const TRANSPORT_MARKERS: &[&str] = &[
    "timed out",
    "timeout",
    "connection",
    "error sending request",
    "dns error",
    "failed to lookup address",
    "broken pipe",
    "reset by peer",
    "network",
];

/// Sort a client error message into a network or backend failure.
///
/// Used for errors that carry no typed classification. Anything not
/// recognisably a transport problem is treated as the backend reporting its
/// own error.
pub fn classify_error(label: &str, message: &str) -> ProviderError {
    let lower = message.to_lowercase();
    if TRANSPORT_MARKERS.iter().any(|m| lower.contains(m)) {
        ProviderError::Network(format!("{label} request failed: {message}"))
    } else {
        ProviderError::Backend(format!("{label} API error: {message}"))
    }
}
