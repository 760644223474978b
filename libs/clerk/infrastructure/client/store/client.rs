use super::types::{AddToCartRequest, AddToCartResponse, ProductsResponse, SessionResponse};
use crate::domain::{MonitorTarget, SessionToken};
use crate::infrastructure::config::StoreEndpoints;
use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::{redirect, Client, Response, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid SKU: {0}")]
    InvalidSku(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Append the `&=<unix seconds>` suffix the store uses to defeat caches
pub fn cache_bust(url: &str) -> String {
    format!("{}&={}", url, Utc::now().timestamp())
}

/// URL with its query string dropped, for logging links that carry a session token
pub fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// Client for the store session, product, cart and checkout endpoints
///
/// Cloning is cheap; the underlying connection pools are shared.
#[derive(Debug, Clone)]
pub struct StoreClient {
    endpoints: StoreEndpoints,
    client: Client,
    /// Same settings, but redirects are surfaced instead of followed
    checkout_client: Client,
}

impl StoreClient {
    /// Create new store client
    pub fn new(endpoints: StoreEndpoints) -> Result<Self> {
        let client = Client::builder()
            .timeout(endpoints.request_timeout())
            .build()?;
        let checkout_client = Client::builder()
            .timeout(endpoints.request_timeout())
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            endpoints,
            client,
            checkout_client,
        })
    }

    /// Fetch a fresh session token
    pub async fn session_token(&self) -> Result<SessionToken> {
        let url = cache_bust(&self.endpoints.session_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.endpoints.user_agent)
            .send()
            .await?;
        let response = check_status(response, "fetch session token").await?;

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| StoreError::DeserializeFailed(e.to_string()))?;

        if body.session_token.is_empty() {
            return Err(StoreError::ApiError(
                "session endpoint returned an empty token".to_string(),
            ));
        }

        Ok(SessionToken::new(body.session_token))
    }

    /// Look up product and inventory information for a target
    pub async fn product_info(&self, target: &MonitorTarget) -> Result<ProductsResponse> {
        let url = format!(
            "{}/{}/{}/{}",
            self.endpoints.products_url.trim_end_matches('/'),
            target.locale,
            target.currency,
            target.sku
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.endpoints.user_agent)
            .send()
            .await?;
        let response = check_status(response, "fetch product info").await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::DeserializeFailed(e.to_string()))
    }

    /// Put one unit of the target's SKU in the active cart
    pub async fn add_to_cart(
        &self,
        target: &MonitorTarget,
        token: &SessionToken,
    ) -> Result<AddToCartResponse> {
        let sku: u64 = target
            .sku
            .parse()
            .map_err(|_| StoreError::InvalidSku(target.sku.clone()))?;
        debug!("POST {} sku={}", self.endpoints.cart_url, sku);

        let response = self
            .client
            .post(&self.endpoints.cart_url)
            .header(USER_AGENT, &self.endpoints.user_agent)
            .header(CONTENT_TYPE, "application/json")
            .header("locale", &target.locale)
            .header("nvidia_shop_id", token.value())
            .json(&AddToCartRequest::single(sku))
            .send()
            .await?;
        let response = check_status(response, "add to cart").await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::DeserializeFailed(e.to_string()))
    }

    /// Resolve the checkout page for the active cart
    ///
    /// The store answers with a redirect to the hosted checkout; its target is
    /// the URL to hand to the user. A plain success means the request URL
    /// itself is the checkout page.
    pub async fn web_checkout_url(
        &self,
        target: &MonitorTarget,
        token: &SessionToken,
    ) -> Result<String> {
        let url = cache_bust(&format!(
            "{}?token={}&locale={}",
            self.endpoints.checkout_url,
            token.value(),
            target.locale
        ));

        let response = self
            .checkout_client
            .get(&url)
            .header(USER_AGENT, &self.endpoints.user_agent)
            .send()
            .await?;

        let status = response.status();
        if status.is_redirection() {
            return response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    StoreError::ApiError(format!("checkout redirect ({}) without location", status))
                });
        }

        check_status(response, "open web checkout").await?;
        Ok(url)
    }
}

async fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("Rate limit exceeded while trying to {}", action);
        return Err(StoreError::RateLimitExceeded);
    }

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(StoreError::ApiError(format!(
            "Failed to {} ({}): {}",
            action, status, error_text
        )));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_query() {
        assert_eq!(
            redact_query("https://checkout.example/cart?token=abc"),
            "https://checkout.example/cart"
        );
        assert_eq!(
            redact_query("https://checkout.example/cart"),
            "https://checkout.example/cart"
        );
    }

    #[test]
    fn test_cache_bust_suffix() {
        let url = cache_bust("https://store.example/SessionToken?format=json");
        let (base, stamp) = url.rsplit_once("&=").unwrap();
        assert_eq!(base, "https://store.example/SessionToken?format=json");
        assert!(stamp.parse::<i64>().unwrap() > 1_600_000_000);
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_non_numeric_sku() {
        let client = StoreClient::new(StoreEndpoints::default()).unwrap();
        let target = MonitorTarget {
            region: "USA".to_string(),
            model: "3080".to_string(),
            sku: "not-a-sku".to_string(),
            locale: "en_us".to_string(),
            store_locale: "en_us".to_string(),
            currency: "USD".to_string(),
        };
        let err = client
            .add_to_cart(&target, &SessionToken::new("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidSku(_)));
    }
}
