//! Access API client - `GET /api/request_access`

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{NonceSource, REQUEST_ACCESS_PATH};
use crate::rpc::{http_client, REQUEST_TIMEOUT};
use crate::types::{AccessRequest, NonceError};

/// HTTP client for the site's access API
pub struct AccessApiClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl AccessApiClient {
    pub fn new(site_base: &Url) -> Result<Self, NonceError> {
        Self::with_timeout(site_base, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(site_base: &Url, timeout: Duration) -> Result<Self, NonceError> {
        let endpoint = site_base
            .join(REQUEST_ACCESS_PATH)
            .map_err(|e| NonceError::Malformed(format!("bad site url: {}", e)))?;

        Ok(Self {
            client: http_client(timeout),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl NonceSource for AccessApiClient {
    async fn request_access(&self) -> Result<AccessRequest, NonceError> {
        debug!("Requesting access code from {}", self.endpoint);

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| NonceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NonceError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NonceError::Network(e.to_string()))?;

        let request = parse_access_request(&body)?;
        info!("Received one-time access code");
        Ok(request)
    }
}

fn parse_access_request(body: &str) -> Result<AccessRequest, NonceError> {
    let request: AccessRequest =
        serde_json::from_str(body).map_err(|e| NonceError::Malformed(e.to_string()))?;

    if request.nonce.trim().is_empty() {
        return Err(NonceError::Malformed("empty nonce".into()));
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let base = Url::parse("https://lounge.example/some/page").unwrap();
        let client = AccessApiClient::new(&base).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://lounge.example/api/request_access"
        );
    }

    #[test]
    fn test_parse_access_request() {
        let req = parse_access_request(r#"{"nonce":"abc123"}"#).unwrap();
        assert_eq!(req.nonce, "abc123");
    }

    #[test]
    fn test_parse_rejects_empty_nonce() {
        assert!(matches!(
            parse_access_request(r#"{"nonce":"  "}"#),
            Err(NonceError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_nonce() {
        assert!(matches!(
            parse_access_request(r#"{"code":"abc"}"#),
            Err(NonceError::Malformed(_))
        ));
        assert!(parse_access_request("not json").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let base = Url::parse(&crate::test_net::closed_port_url()).unwrap();
        let client = AccessApiClient::new(&base).unwrap();
        assert!(matches!(
            client.request_access().await,
            Err(NonceError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_stalled_backend_is_network_error() {
        let (_listener, url) = crate::test_net::silent_endpoint();
        let base = Url::parse(&url).unwrap();
        let client =
            AccessApiClient::with_timeout(&base, crate::test_net::SHORT_TIMEOUT).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), client.request_access())
            .await
            .expect("request should give up on its own");
        assert!(matches!(result, Err(NonceError::Network(_))));
    }
}
