//! Request contract helpers shared by list endpoints.
//!
//! Pagination is 1-based: `page >= 1`, `limit >= 1`, defaults page 1 /
//! limit 25. `search` is an optional case-insensitive substring filter and
//! reads as the empty string when absent.

use serde::Deserialize;

use crate::api::error::ApiError;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    25
}

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: default_page(), limit: default_limit(), search: String::new() }
    }
}

impl ListQuery {
    /// Reject out-of-range pagination values with distinct messages.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page < 1 {
            return Err(ApiError::bad_request("page must be a positive integer greater than zero"));
        }
        if self.limit < 1 {
            return Err(ApiError::bad_request(
                "limit must be a positive integer greater than zero",
            ));
        }
        Ok(())
    }
}

/// Path IDs are positive integers; zero and negatives are client errors.
pub fn positive_id(id: i64) -> Result<i64, ApiError> {
    if id < 1 {
        return Err(ApiError::bad_request("id must be a positive integer"));
    }
    Ok(id)
}
