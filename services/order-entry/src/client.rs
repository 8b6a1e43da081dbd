use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use types::ids::{CompanyCode, UserId};

use crate::error::SubmitError;
use crate::models::{OrderForm, OrderRequest};

/// Path of the order-submission endpoint, relative to the server base URL.
pub const ORDERS_PATH: &str = "/api/v1/orders";

/// Configuration for [`OrderClient`].
#[derive(Debug, Clone)]
pub struct OrderClientConfig {
    /// Trading server base URL, without trailing slash.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for OrderClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Anything that can deliver an order to the trading server.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, request: &OrderRequest) -> Result<(), SubmitError>;
}

/// REST client for the order endpoint.
#[derive(Clone)]
pub struct OrderClient {
    http_client: Client,
    orders_url: String,
}

impl OrderClient {
    pub fn new(config: OrderClientConfig) -> Result<Self, SubmitError> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            orders_url: format!("{}{}", config.base_url.trim_end_matches('/'), ORDERS_PATH),
        })
    }

    pub fn orders_url(&self) -> &str {
        &self.orders_url
    }
}

#[async_trait]
impl OrderSubmitter for OrderClient {
    async fn submit(&self, request: &OrderRequest) -> Result<(), SubmitError> {
        tracing::debug!(
            company_code = %request.company_code,
            side = %request.side,
            quantity = %request.quantity,
            price = %request.price,
            "Submitting order"
        );

        let res = self
            .http_client
            .post(&self.orders_url)
            .json(request)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Order service unreachable"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "Order rejected");
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(company_code = %request.company_code, side = %request.side, "Order submitted");
        Ok(())
    }
}

/// Validate a form, build the request and submit it.
pub async fn submit_form<S: OrderSubmitter + ?Sized>(
    submitter: &S,
    company_code: CompanyCode,
    user_id: UserId,
    form: &OrderForm,
) -> Result<OrderRequest, SubmitError> {
    let request = OrderRequest::from_form(company_code, user_id, form)?;
    submitter.submit(&request).await?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use types::order::Side;

    #[derive(Default)]
    struct RecordingSubmitter {
        sent: Mutex<Vec<OrderRequest>>,
    }

    #[async_trait]
    impl OrderSubmitter for RecordingSubmitter {
        async fn submit(&self, request: &OrderRequest) -> Result<(), SubmitError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    #[test]
    fn test_orders_url_joins_base() {
        let client = OrderClient::new(OrderClientConfig {
            base_url: "http://example.test/".to_string(),
            ..OrderClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.orders_url(), "http://example.test/api/v1/orders");
    }

    #[tokio::test]
    async fn test_submit_form_validates_before_sending() {
        let submitter = RecordingSubmitter::default();
        let code = CompanyCode::from("005930");

        let bad = OrderForm::limit(Side::Buy, 100, -1);
        let err = submit_form(&submitter, code.clone(), UserId::new(1), &bad)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Order(_)));
        assert!(submitter.sent.lock().unwrap().is_empty());

        let good = OrderForm::market(Side::Sell, 2);
        let request = submit_form(&submitter, code, UserId::new(1), &good).await.unwrap();
        assert_eq!(submitter.sent.lock().unwrap().as_slice(), &[request]);
    }
}
