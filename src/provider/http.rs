//! HTTP client for the remote calculator API.
//!
//! One client serves both capabilities. Every call goes through the same
//! path: authorize, send, classify the status, retry once, and only then
//! surface the mapped error.

use crate::config::{AuthScheme, Settings};
use crate::provider::arithmetic::{ArithmeticProvider, Computation};
use crate::provider::error::ApiError;
use crate::provider::history::{ApiOperation, HistoryProvider, RemoteRecord};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Serialize)]
struct CalculateRequest {
    parameter1: f64,
    parameter2: f64,
}

#[derive(Deserialize)]
struct ResultDto {
    result: f64,
    operation: ApiOperation,
}

/// Authenticated client for the arithmetic and history endpoints.
pub struct HttpCalculatorApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
    scheme: Mutex<AuthScheme>,
    rotate_on_unauthorized: bool,
    retries: u32,
}

impl HttpCalculatorApi {
    /// Create a client with bearer auth, one retry and no request timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: build_client(None),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into().trim().to_string(),
            scheme: Mutex::new(AuthScheme::Bearer),
            rotate_on_unauthorized: false,
            retries: 1,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let api = Self::new(settings.api_base_url.clone(), settings.api_token.clone())
            .with_auth_scheme(settings.auth_scheme)
            .with_retries(settings.request_retries)
            .rotate_auth_on_unauthorized(settings.rotate_auth_on_unauthorized);
        match settings.request_timeout() {
            Some(timeout) => api.with_request_timeout(timeout),
            None => api,
        }
    }

    /// Abort any attempt that takes longer than `timeout`. An aborted
    /// attempt counts as a connectivity failure and is retried as usual.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(Some(timeout));
        self
    }

    pub fn with_auth_scheme(self, scheme: AuthScheme) -> Self {
        *self.scheme.lock() = scheme;
        self
    }

    /// Number of automatic retries after a failed attempt.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// After a 401, switch to the next auth scheme for later calls.
    pub fn rotate_auth_on_unauthorized(mut self, enabled: bool) -> Self {
        self.rotate_on_unauthorized = enabled;
        self
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        *self.scheme.lock()
    }

    pub fn set_auth_scheme(&self, scheme: AuthScheme) {
        info!(?scheme, "auth scheme changed");
        *self.scheme.lock() = scheme;
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            return request;
        }
        let scheme = self.auth_scheme();
        request.header(AUTHORIZATION, scheme.header_value(&self.token))
    }

    async fn send_once(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            debug!(error = %e, "transport failure");
            ApiError::Connectivity
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(status.as_u16()))
        }
    }

    /// Send the request built by `build`, retrying failed attempts.
    async fn execute<F>(&self, endpoint: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.retries.saturating_add(1);
        let mut last_error = ApiError::Connectivity;

        for attempt in 1..=attempts {
            match self.send_once(build()).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt < attempts {
                        warn!(endpoint, attempt, error = %err, "request failed, retrying");
                    }
                    last_error = err;
                }
            }
        }

        if last_error == ApiError::Unauthorized && self.rotate_on_unauthorized {
            self.rotate_scheme();
        }
        error!(endpoint, error = %last_error, "calculator API call failed");
        Err(last_error)
    }

    fn rotate_scheme(&self) {
        let mut scheme = self.scheme.lock();
        match scheme.next() {
            Some(next) => {
                warn!(from = ?*scheme, to = ?next, "unauthorized, trying next auth scheme");
                *scheme = next;
            }
            None => warn!("unauthorized with every auth scheme"),
        }
    }

    async fn calculate(
        &self,
        endpoint: &str,
        parameter1: f64,
        parameter2: f64,
    ) -> Result<Computation, ApiError> {
        let url = self.url(endpoint);
        let body = CalculateRequest {
            parameter1,
            parameter2,
        };
        debug!(endpoint, parameter1, parameter2, "calculate request");

        let response = self
            .execute(endpoint, || self.client.post(&url).json(&body))
            .await?;
        let dto: ResultDto = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        info!(endpoint, result = dto.result, "calculate succeeded");
        Ok(Computation {
            result: dto.result,
            operator: dto.operation.into(),
        })
    }

    async fn fetch_records<F>(
        &self,
        endpoint: &str,
        request: F,
    ) -> Result<Vec<RemoteRecord>, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let response = self.execute(endpoint, request).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Build the shared client. Requests run without a deadline unless one is given.
fn build_client(timeout: Option<Duration>) -> reqwest::Client {
    let builder = match timeout {
        Some(timeout) => reqwest::Client::builder().timeout(timeout),
        None => reqwest::Client::builder(),
    };
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, ?timeout, "HTTP client builder failed, using defaults");
        reqwest::Client::new()
    })
}

#[async_trait]
impl ArithmeticProvider for HttpCalculatorApi {
    async fn add(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        self.calculate("/add", lhs, rhs).await
    }

    async fn subtract(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        self.calculate("/subtract", lhs, rhs).await
    }

    async fn multiply(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        self.calculate("/multiply", lhs, rhs).await
    }

    async fn divide(&self, lhs: f64, rhs: f64) -> Result<Computation, ApiError> {
        self.calculate("/divide", lhs, rhs).await
    }

    async fn power(&self, base: f64, exponent: f64) -> Result<Computation, ApiError> {
        self.calculate("/power", base, exponent).await
    }

    async fn square_root(&self, value: f64) -> Result<Computation, ApiError> {
        self.calculate("/squareRoot", value, 0.0).await
    }
}

#[async_trait]
impl HistoryProvider for HttpCalculatorApi {
    async fn fetch_all(&self) -> Result<Vec<RemoteRecord>, ApiError> {
        let url = self.url("/history");
        self.fetch_records("/history", || self.client.get(&url)).await
    }

    async fn fetch_recent(&self, count: usize) -> Result<Vec<RemoteRecord>, ApiError> {
        let url = self.url("/history/recent");
        self.fetch_records("/history/recent", || {
            self.client.get(&url).query(&[("count", count)])
        })
        .await
    }

    async fn clear(&self) -> Result<(), ApiError> {
        let url = self.url("/history");
        self.execute("/history", || self.client.delete(&url)).await?;
        info!("remote history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operator;
    use httpmock::prelude::*;
    use serde_json::json;

    const BASE: &str = "/api/calculator";

    fn api(server: &MockServer) -> HttpCalculatorApi {
        HttpCalculatorApi::new(server.url(BASE), "t0k3n")
    }

    #[tokio::test]
    async fn add_posts_operands_with_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/api/calculator/add")
                .header("authorization", "Bearer t0k3n")
                .json_body(json!({"parameter1": 5.0, "parameter2": 3.0}));
            then.status(200)
                .json_body(json!({"result": 8.0, "operation": "ADDITION"}));
        });

        let computation = api(&server).add(5.0, 3.0).await.unwrap();

        mock.assert();
        assert_eq!(computation.result, 8.0);
        assert_eq!(computation.operator, Operator::Add);
    }

    #[tokio::test]
    async fn square_root_sends_zero_second_parameter() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/api/calculator/squareRoot")
                .json_body(json!({"parameter1": 9.0, "parameter2": 0.0}));
            then.status(200)
                .json_body(json!({"result": 3.0, "operation": "SQUARE_ROOT"}));
        });

        let computation = api(&server).square_root(9.0).await.unwrap();

        mock.assert();
        assert_eq!(computation.result, 3.0);
        assert_eq!(computation.operator, Operator::Sqrt);
    }

    #[tokio::test]
    async fn failed_call_is_retried_once() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/api/calculator/multiply");
            then.status(500);
        });

        let result = api(&server).multiply(2.0, 3.0).await;

        mock.assert_hits(2);
        assert_eq!(result, Err(ApiError::Server { status: 500 }));
    }

    #[tokio::test]
    async fn retries_can_be_disabled() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/api/calculator/power");
            then.status(404);
        });

        let result = api(&server).with_retries(0).power(2.0, 3.0).await;

        mock.assert_hits(1);
        assert_eq!(result, Err(ApiError::NotFound));
    }

    #[tokio::test]
    async fn statuses_map_to_error_classes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/api/calculator/add");
            then.status(401);
        });
        server.mock(|when, then| {
            when.method(Method::POST).path("/api/calculator/subtract");
            then.status(403);
        });

        let api = api(&server);
        assert_eq!(api.add(1.0, 1.0).await, Err(ApiError::Unauthorized));
        assert_eq!(api.subtract(1.0, 1.0).await, Err(ApiError::Forbidden));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connectivity_error() {
        let api = HttpCalculatorApi::new("http://127.0.0.1:1/api", "t").with_retries(0);
        assert_eq!(api.divide(1.0, 2.0).await, Err(ApiError::Connectivity));
    }

    #[tokio::test]
    async fn slow_response_waits_without_a_timeout() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/api/calculator/add");
            then.status(200)
                .delay(Duration::from_millis(600))
                .json_body(json!({"result": 2.0, "operation": "ADDITION"}));
        });

        let computation = api(&server).with_retries(0).add(1.0, 1.0).await.unwrap();

        mock.assert();
        assert_eq!(computation.result, 2.0);
    }

    #[tokio::test]
    async fn configured_timeout_aborts_slow_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/api/calculator/add");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"result": 2.0, "operation": "ADDITION"}));
        });

        let api = api(&server)
            .with_retries(0)
            .with_request_timeout(Duration::from_millis(100));
        let result = api.add(1.0, 1.0).await;

        mock.assert_hits(1);
        assert_eq!(result, Err(ApiError::Connectivity));
    }

    #[test]
    fn settings_timeout_is_opt_in() {
        let mut settings = Settings::default();
        assert_eq!(settings.request_timeout(), None);
        HttpCalculatorApi::from_settings(&settings);

        settings.request_timeout_secs = Some(1);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(1)));
        HttpCalculatorApi::from_settings(&settings);
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/api/calculator/divide");
            then.status(200).body("not json");
        });

        let result = api(&server).divide(1.0, 2.0).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn unauthorized_rotates_auth_scheme_when_enabled() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST)
                .path("/api/calculator/add")
                .header("authorization", "Bearer t0k3n");
            then.status(401);
        });
        let token_mock = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/api/calculator/add")
                .header("authorization", "Token t0k3n");
            then.status(200)
                .json_body(json!({"result": 2.0, "operation": "ADDITION"}));
        });

        let api = api(&server).rotate_auth_on_unauthorized(true);
        assert_eq!(api.add(1.0, 1.0).await, Err(ApiError::Unauthorized));
        assert_eq!(api.auth_scheme(), AuthScheme::Token);

        let computation = api.add(1.0, 1.0).await.unwrap();
        token_mock.assert();
        assert_eq!(computation.result, 2.0);
    }

    #[tokio::test]
    async fn empty_token_sends_no_authorization_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/api/calculator/add")
                .header_missing("authorization");
            then.status(200)
                .json_body(json!({"result": 3.0, "operation": "ADDITION"}));
        });

        let api = HttpCalculatorApi::new(server.url(BASE), "");
        api.add(1.0, 2.0).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn history_endpoints() {
        let server = MockServer::start();
        let all = server.mock(|when, then| {
            when.method(Method::GET).path("/api/calculator/history");
            then.status(200).json_body(json!([
                {"id": 2, "operation": "SQUARE_ROOT", "parameter1": 9.0, "parameter2": 0.0,
                 "result": 3.0, "date": "2024-05-01T10:31:00Z"},
                {"id": 1, "operation": "ADDITION", "parameter1": 5.0, "parameter2": 3.0,
                 "result": 8.0, "date": "2024-05-01T10:30:00Z"}
            ]));
        });
        let recent = server.mock(|when, then| {
            when.method(Method::GET)
                .path("/api/calculator/history/recent")
                .query_param("count", "1");
            then.status(200).json_body(json!([
                {"id": 2, "operation": "SQUARE_ROOT", "parameter1": 9.0,
                 "result": 3.0, "date": "2024-05-01T10:31:00Z"}
            ]));
        });
        let clear = server.mock(|when, then| {
            when.method(Method::DELETE).path("/api/calculator/history");
            then.status(204);
        });

        let api = api(&server);
        let records = api.fetch_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].operation, ApiOperation::SquareRoot);

        let latest = api.fetch_recent(1).await.unwrap();
        assert_eq!(latest.len(), 1);

        api.clear().await.unwrap();

        all.assert();
        recent.assert();
        clear.assert();
    }
}
