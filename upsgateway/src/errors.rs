use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read HTTP body: {0}")]
    HttpIo(#[from] std::io::Error),

    #[error("Failed to decode configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plugin configuration must be a JSON object, got: {0}")]
    NotAnObject(String),

    #[error("Invalid scale factor {0} (expected 2, 3 or 4)")]
    InvalidScaleFactor(u8),
}
