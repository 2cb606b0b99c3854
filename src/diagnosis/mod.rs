pub mod client;
pub mod parser;

pub use client::*;
pub use parser::*;

use thiserror::Error;

/// Maximum accepted upload size. The upload widget enforces the same bound
/// before submission; the core rejects anything larger at construction.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("Diagnosis service is unreachable at {0}")]
    Connection(String),

    #[error("Diagnosis request timed out after {0}s")]
    Timeout(u64),

    #[error("Diagnosis request failed: {0}")]
    Network(String),

    #[error("Diagnosis service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Health check failed: {0}")]
    Health(String),

    #[error("Malformed diagnosis response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Image exceeds the 5MB upload limit ({0} bytes)")]
    ImageTooLarge(usize),

    #[error("Unsupported upload type '{0}' (expected an image)")]
    UnsupportedImageType(String),
}
