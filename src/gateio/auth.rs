//! Authentication utilities for the Gate.io v4 API

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};

use crate::common::errors::{ExecutionError, Result};
use crate::config::types::ApiCredentials;

type HmacSha512 = Hmac<Sha512>;

/// Generate the HMAC-SHA512 signature for an API request.
///
/// Gate.io signs `METHOD\nPATH\nQUERY\nSHA512(body)\nTIMESTAMP`, with the
/// body hash and the signature both hex-encoded.
///
/// # Arguments
/// * `secret` - API secret key
/// * `timestamp` - Unix timestamp in seconds
/// * `method` - HTTP method (GET, POST, etc.)
/// * `path` - API endpoint path, e.g. `/api/v4/spot/orders`
/// * `query` - Raw query string without the leading `?` (empty if none)
/// * `body` - Request body (empty string for GET requests)
pub fn sign_request(
    secret: &str,
    timestamp: i64,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
) -> Result<String> {
    let mut hasher = Sha512::new();
    hasher.update(body.as_bytes());
    let body_hash = hex::encode(hasher.finalize());

    let message = format!(
        "{}\n{}\n{}\n{}\n{}",
        method.to_uppercase(),
        path,
        query,
        body_hash,
        timestamp
    );

    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| ExecutionError::Authentication(format!("Failed to create HMAC: {}", e)))?;
    mac.update(message.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Generate authentication headers for an API request
pub fn generate_auth_headers(
    credentials: &ApiCredentials,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
) -> Result<AuthHeaders> {
    let timestamp = chrono::Utc::now().timestamp();
    let signature = sign_request(
        &credentials.api_secret,
        timestamp,
        method,
        path,
        query,
        body,
    )?;

    Ok(AuthHeaders {
        api_key: credentials.api_key.clone(),
        signature,
        timestamp,
    })
}

/// Authentication headers for API requests
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub api_key: String,
    pub signature: String,
    pub timestamp: i64,
}

impl AuthHeaders {
    /// Add authentication headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("KEY", &self.api_key)
            .header("Timestamp", self.timestamp.to_string())
            .header("SIGN", &self.signature)
    }
}
