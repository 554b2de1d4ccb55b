//! Invocation result returned to the caller.

use serde::{Deserialize, Serialize};

/// Status code of every successful invocation.
pub const STATUS_OK: u16 = 200;

/// Message reported on success.
pub const SUCCESS_MESSAGE: &str = "page stats saved";

/// Result of a successful statistics update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerResponse {
    /// Always [`STATUS_OK`]; failures are returned as errors instead.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Details of the update.
    pub body: ResponseBody,
}

/// Details of a statistics update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// Human readable summary.
    pub message: String,
    /// Bucket of all artifacts.
    pub bucket: String,
    /// Hit key that triggered the update.
    pub hit_key: String,
    /// Key the statistics were written to.
    pub stats: String,
    /// Public identifier of the page.
    pub uuid: String,
    /// Share of handwritten words.
    pub handwriting_pct: f64,
}

impl HandlerResponse {
    /// Creates a success response.
    pub fn ok(body: ResponseBody) -> Self {
        Self {
            status_code: STATUS_OK,
            body,
        }
    }
}
