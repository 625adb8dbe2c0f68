//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};

/// Request to shorten a URL.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    /// The original URL to shorten. Missing and empty are rejected alike.
    #[serde(default)]
    pub url: Option<String>,
}

/// Response for a created (or re-used) short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    /// Full public short URL, base URL plus code.
    pub short_url: String,
    /// The original URL, echoed back exactly as submitted.
    pub long_url: String,
    pub short_code: String,
}
