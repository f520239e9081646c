//! Error types for the WMS proxy.

use thiserror::Error;

/// Result type alias using WmsError.
pub type WmsResult<T> = Result<T, WmsError>;

/// Primary error type for WMS proxy operations.
#[derive(Debug, Error)]
pub enum WmsError {
    // === WMS Protocol Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Unsupported request type: {0}")]
    OperationNotSupported(String),

    // === Reprojection Errors ===
    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Unsupported transformation from {from} to {to}")]
    UnsupportedTransform { from: String, to: String },

    // === Upstream Errors ===
    #[error("Service metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Upstream server error: {0}")]
    UpstreamUnavailable(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl WmsError {
    /// Get the OGC WMS exception code for this error.
    pub fn wms_exception_code(&self) -> &'static str {
        match self {
            WmsError::MissingParameter(_) => "MissingParameterValue",
            WmsError::InvalidParameter { .. } => "InvalidParameterValue",
            WmsError::InvalidDimensions(_) => "InvalidDimensionValue",
            WmsError::OperationNotSupported(_) => "OperationNotSupported",
            WmsError::InvalidBbox(_) => "InvalidBBox",
            WmsError::UnsupportedTransform { .. } => "InvalidCRS",
            _ => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WmsError::MissingParameter(_)
            | WmsError::InvalidParameter { .. }
            | WmsError::InvalidDimensions(_)
            | WmsError::OperationNotSupported(_)
            | WmsError::InvalidBbox(_)
            | WmsError::UnsupportedTransform { .. } => 400,

            WmsError::MetadataUnavailable(_) | WmsError::UpstreamUnavailable(_) => 502,

            WmsError::InternalError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for WmsError {
    fn from(err: serde_json::Error) -> Self {
        WmsError::InternalError(format!("JSON error: {}", err))
    }
}

impl From<crate::bbox::BboxParseError> for WmsError {
    fn from(err: crate::bbox::BboxParseError) -> Self {
        WmsError::InvalidBbox(err.to_string())
    }
}
