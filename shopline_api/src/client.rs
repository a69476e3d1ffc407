//! HTTP client for the Shopline Open API.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    errors::ErrorBody,
    query::{CustomerListQuery, CustomerQuery, CustomerSearchQuery, PromotionQuery, Query},
    types::{Customer, CustomerPage, Document},
    Error,
};

/// Production base URL of the Open API.
pub const DEFAULT_BASE_URL: &str = "https://open.shopline.io/v1";

/// Every call gives up after this long. Not configurable per call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "shopline-admin-portal";

/// Credentials and endpoint for a [`Client`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer token from Staff Settings > API Auth.
    pub access_token: String,
    /// API root, without a trailing slash.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(access_token: &str, base_url: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &if self.has_token() { "<redacted>" } else { "" })
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Read-only client for the customer endpoints of the Shopline Open API.
///
/// Each operation sends exactly one GET through [`Client::get`]. Failures are
/// logged once here and returned as [`Error`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Creates a client. Fails only if the TLS backend cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport {
                    message: e.to_string(),
                }
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn get_url(&self, segments: &[&str], query: &impl Query) -> Result<Url, Error> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.config.base_url, e);
            Error::Transport {
                message: format!("invalid base URL: {}", e),
            }
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL cannot carry a path: {}", self.config.base_url);
                Error::Transport {
                    message: "invalid base URL".to_string(),
                }
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(query.add_to_url(&url))
    }

    async fn get<T>(&self, segments: &[&str], query: &impl Query) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let path = format!("/{}", segments.join("/"));
        let url = self.get_url(segments, query)?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.config.access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Shopline API request failed: GET {}: {:?}", path, e);
                Error::Transport {
                    message: e.to_string(),
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: GET {}: {:?}", path, e);
            Error::Transport {
                message: e.to_string(),
            }
        })?;

        if status.is_client_error() || status.is_server_error() {
            let body = ErrorBody::parse(&body);
            tracing::warn!(
                "Shopline API error: GET {} -> {} {}",
                path,
                status.as_u16(),
                truncate_body(&body.to_string())
            );
            return Err(Error::Status {
                status: status.as_u16(),
                message: format!("{} for GET {}", status, path),
                body,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse response: GET {}: {} | body: {}",
                path,
                e,
                truncate_body(&body)
            );
            Error::Decode {
                message: e.to_string(),
            }
        })
    }

    /// `GET /customers`: one page of customers, by page number or cursor.
    pub async fn list_customers(&self, query: &CustomerListQuery) -> Result<CustomerPage, Error> {
        self.get(&["customers"], query).await
    }

    /// `GET /customers/{id}`: a single customer's details.
    pub async fn get_customer(
        &self,
        customer_id: &str,
        query: &CustomerQuery,
    ) -> Result<Customer, Error> {
        self.get(&["customers", customer_id], query).await
    }

    /// `GET /customers/search`.
    pub async fn search_customers(
        &self,
        query: &CustomerSearchQuery,
    ) -> Result<CustomerPage, Error> {
        self.get(&["customers", "search"], query).await
    }

    /// `GET /customers/{id}/promotions`: promotions and coupons of a customer.
    pub async fn get_customer_promotions(
        &self,
        customer_id: &str,
        query: &PromotionQuery,
    ) -> Result<Document, Error> {
        self.get(&["customers", customer_id, "promotions"], query)
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    match body.char_indices().nth(MAX) {
        None => body.to_string(),
        Some((cut, _)) => format!("{}...[truncated]", &body[..cut]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("token", "https://open.shopline.io/v1/");
        assert_eq!(config.base_url, "https://open.shopline.io/v1");
    }

    #[test]
    fn debug_output_hides_the_token() {
        let config = ClientConfig::new("secret-token", DEFAULT_BASE_URL);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn customer_id_is_a_single_path_segment() {
        let client = Client::new(ClientConfig::new("t", "https://example.com/v1")).unwrap();
        let url = client
            .get_url(&["customers", "a/b c"], &CustomerQuery::default())
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/v1/customers/a%2Fb%20c");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(2500);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("...[truncated]"));
        assert_eq!(truncate_body("short"), "short");
    }
}
