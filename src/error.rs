//! Error type for the embedding layer.
//!
//! Runtime entry points never fail - expected misconfiguration degrades
//! to "do nothing". Errors exist only at the edges where the host hands
//! us data to parse: the boot config payload and translation resources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    /// The host-supplied configuration payload is not valid JSON for
    /// the expected shape.
    #[error("invalid configuration payload: {0}")]
    Config(#[from] serde_json::Error),

    /// A locale tag in the translation payload failed to parse.
    #[error("invalid locale tag `{0}`")]
    Locale(String),

    /// A translation resource failed to parse as Fluent syntax.
    #[error("translation resource for locale `{0}` is not valid FTL")]
    Translation(String),
}
