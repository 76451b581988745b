//! Coupon validation service.
//!
//! The decision logic itself is pure and lives in `azahar_core::CouponBook`;
//! this service selects, at the composition root, whether codes are checked
//! against the built-in table or a remote coupon lookup service.
//!
//! The remote variant is the storefront's only suspending cart operation. It
//! carries an explicit request timeout so a slow coupon service cannot hang
//! a checkout; staleness of the result (cart cleared while the lookup was in
//! flight) is handled by the cart store's epoch guard, not here.

use std::time::Duration;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use azahar_core::{CouponBook, CouponGrant, CouponRejection};

use crate::config::CheckoutConfig;

/// Why a coupon could not be applied.
#[derive(Debug, Error)]
pub enum CouponError {
    /// The built-in table rejected the code.
    #[error(transparent)]
    Rejected(#[from] CouponRejection),

    /// The remote service refused the code, with its reason.
    #[error("{0}")]
    Refused(String),

    /// The remote service did not answer within the configured timeout.
    #[error("coupon lookup timed out")]
    Timeout,

    /// The remote request failed.
    #[error("coupon lookup failed: {0}")]
    Http(reqwest::Error),
}

/// Coupon validation backend chosen from configuration.
#[derive(Debug)]
pub struct CouponService {
    backend: Backend,
}

#[derive(Debug)]
enum Backend {
    Table(CouponBook),
    Remote(CouponClient),
}

impl CouponService {
    /// Select the backend: remote when a coupon service URL is configured,
    /// otherwise the built-in table.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be constructed.
    pub fn from_config(config: &CheckoutConfig) -> Result<Self, reqwest::Error> {
        let backend = match &config.coupon_service_url {
            Some(url) => Backend::Remote(CouponClient::new(
                url,
                Duration::from_secs(config.coupon_timeout_secs),
            )?),
            None => Backend::Table(CouponBook::builtin()),
        };
        Ok(Self { backend })
    }

    /// Use an explicit table (tests, tools).
    #[must_use]
    pub const fn with_table(book: CouponBook) -> Self {
        Self {
            backend: Backend::Table(book),
        }
    }

    /// Validate a code against an order subtotal.
    ///
    /// # Errors
    ///
    /// `CouponError::Rejected`/`Refused` when the code is refused (the cart
    /// must be left unchanged by callers), `Timeout`/`Http` when the remote
    /// backend fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn validate(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> Result<CouponGrant, CouponError> {
        match &self.backend {
            Backend::Table(book) => Ok(book.validate(code, subtotal)?),
            Backend::Remote(client) => client.validate(code, subtotal).await,
        }
    }
}

// =============================================================================
// Remote lookup client
// =============================================================================

/// Wire request for the coupon lookup service.
#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    code: &'a str,
    total: Decimal,
}

/// Wire response on success.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    /// Granted discount percentage (0-100).
    discount: u8,
}

/// Wire response on refusal (HTTP 400/404).
#[derive(Debug, Deserialize)]
struct LookupErrorBody {
    error: String,
}

/// Client for the remote coupon lookup service.
#[derive(Debug)]
struct CouponClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CouponClient {
    fn new(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    async fn validate(&self, code: &str, subtotal: Decimal) -> Result<CouponGrant, CouponError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&LookupRequest {
                code,
                total: subtotal,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        // 400/404 carry a human-readable refusal reason in the body
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            let reason = response
                .json::<LookupErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Coupon was refused".to_string());
            return Err(CouponError::Refused(reason));
        }

        let response = response.error_for_status().map_err(CouponError::Http)?;
        let body: LookupResponse = response.json().await.map_err(CouponError::Http)?;

        Ok(CouponGrant {
            percentage: body.discount.min(100),
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> CouponError {
    if err.is_timeout() {
        CouponError::Timeout
    } else {
        CouponError::Http(err)
    }
}
