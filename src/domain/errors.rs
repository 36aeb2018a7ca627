//! Error taxonomy shared by the chart renderer and the fetch client.
//!
//! An empty series is not an error (see `ChartFrame::Empty`) and a flat price
//! range is handled by the fallback domain, so neither appears here.

use thiserror::Error;

/// Failures that abort a chart render
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// A candle carries a non-finite price; rendering it would misstate the market
    #[error("candle {index} has a malformed `{field}` value")]
    MalformedRecord { index: usize, field: &'static str },

    /// Target surface is not a finite, non-negative size
    #[error("invalid chart dimensions {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
}

/// Reasons a single API record is rejected during normalization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` is not a finite number")]
    NonFinite(&'static str),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors surfaced by the dashboard API client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request could not be sent or the connection dropped
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP {code}: {text}")]
    Status { code: u16, text: String },

    /// Body was not the JSON shape we expect
    #[error("decode error: {0}")]
    Decode(String),

    /// Payload decoded but carried no usable records
    #[error("validation error: {0}")]
    Validation(#[from] NormalizeError),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
pub type ChartResult<T> = Result<T, ChartError>;
