use thiserror::Error;

/// Errors raised while loading a host document or building its mirror
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Failed to launch the browser backing a page document
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to a running browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Navigation to the target page failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// The host document could not be read or parsed
    #[error("Failed to load document: {0}")]
    DocumentLoadFailed(String),

    /// The root was requested before the readiness wait completed
    #[error("Document is not loaded yet, call load_all first")]
    DocumentNotReady,

    /// A source node could not be read during traversal
    #[error("Malformed node {id}: {reason}")]
    MalformedNode { id: String, reason: String },

    /// The mirror could not be converted to or from JSON
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The configured collector endpoint is not a valid URL
    #[error("Invalid collector endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, MirrorError>;
