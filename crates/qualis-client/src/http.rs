//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`ClientError::Api`]) so the endpoint modules stay
//! focused on request construction and response mapping.

use crate::error::ClientError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Join a server base URL and an API path without doubling slashes.
#[must_use]
pub fn endpoint(instance_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        instance_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
