//! API Response envelope
//!
//! Every backend endpoint wraps its payload the same way:
//! ```json
//! {
//!     "success": true,
//!     "data": { ... },
//!     "error": null
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Unified response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend accepted the request
    #[serde(default)]
    pub success: bool,
    /// Response payload (absent on failure, sometimes absent on success)
    pub data: Option<T>,
    /// Human-readable failure message
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a successful response without a payload
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// Create a failed response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Collapse the envelope into a tagged result.
    ///
    /// `Ok` carries the (possibly absent) payload, `Err` carries the backend's
    /// message when it supplied one. A `success=false` envelope never yields
    /// data, even if the backend attached some.
    pub fn into_result(self) -> Result<Option<T>, Option<String>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.filter(|e| !e.trim().is_empty()))
        }
    }
}
