//! HTTP client wrapper for talking to the catalog.
//!
//! Requests are issued once. A failed fetch is final for that call; the
//! harvest loop decides whether it is fatal.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::error::{HarvesterError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("dcat-harvester/", env!("CARGO_PKG_VERSION"));

const APPLICATION_JSON: &str = "application/json";

/// Create a configured HTTP client.
///
/// # Arguments
/// * `timeout_secs` - Per-request timeout
pub fn create_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// GET a URL and return the response body.
///
/// Any non-success status becomes `HarvesterError::HttpStatus`.
pub fn get_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    tracing::debug!(url, "GET");
    let response = check_status(client.get(url).send()?, url)?;
    Ok(response.bytes()?.to_vec())
}

/// POST a JSON body and return the raw response body.
pub fn post_json(client: &Client, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
    tracing::debug!(url, "POST");
    let response = client
        .post(url)
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .header(ACCEPT, APPLICATION_JSON)
        .body(body)
        .send()?;
    let response = check_status(response, url)?;
    Ok(response.bytes()?.to_vec())
}

fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(HarvesterError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = create_client(30);
        assert!(client.is_ok());
    }
}
