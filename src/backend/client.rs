//! Authenticated JSON transport shared by every endpoint module.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::{
    domain::session::Session,
    infra::{
        config::{BackendConfig, FirstLoadConfig},
        token_store::TokenStore,
    },
};

use super::{
    decode,
    error::ApiError,
    lenient::{detail_text, DecodeError},
};

/// REST client for the versioned backend API.
///
/// Cheap to clone; clones share the connection pool and the token store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    backend: BackendConfig,
    first_load: FirstLoadConfig,
    tokens: Arc<dyn TokenStore>,
}

/// One outgoing request, relative to the API prefix.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
    /// Overrides the client-wide timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::POST, path)
        }
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl ApiClient {
    pub fn new(
        backend: BackendConfig,
        first_load: FirstLoadConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(backend.timeout())
            .timeout(backend.timeout())
            .build()
            .map_err(|error| ApiError::Network(error.to_string()))?;

        Ok(Self {
            http,
            backend,
            first_load,
            tokens,
        })
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    pub fn first_load(&self) -> &FirstLoadConfig {
        &self.first_load
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The stored session, or `Unauthorized` when nobody is signed in.
    pub fn stored_session(&self) -> Result<Session, ApiError> {
        self.tokens
            .load()
            .map_err(|error| ApiError::TokenStore(error.to_string()))?
            .ok_or(ApiError::Unauthorized)
    }

    /// Sends an authenticated request and returns the JSON body.
    ///
    /// An already expired access token is refreshed up front; a `401` triggers
    /// one refresh and a single retry.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let mut session = self.stored_session()?;
        if session.access_token_expired(Utc::now()) {
            tracing::debug!("access token expired; refreshing before request");
            session = self.refresh(&session).await?;
        }

        match self.execute(&request, Some(&session.access_token)).await {
            Err(ApiError::Unauthorized) if session.refresh_token.is_some() => {
                tracing::debug!(path = %request.path, "request unauthorized; refreshing once");
                let session = self.refresh(&session).await?;
                self.execute(&request, Some(&session.access_token)).await
            }
            other => other,
        }
    }

    /// Sends a request without credentials (login, refresh).
    pub(crate) async fn send_public(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.execute(&request, None).await
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = self.backend.rest_url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.inspect_err(|error| {
            tracing::debug!(method = %request.method, path = %request.path, error = %error, "request failed");
        })?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(method = %request.method, path = %request.path, status = status.as_u16(), "response received");
        parse_response(status, &body).inspect_err(|error| {
            tracing::debug!(path = %request.path, code = error.code(), "request rejected");
        })
    }

    /// Exchanges the refresh token for new tokens and persists them.
    pub(crate) async fn refresh(&self, session: &Session) -> Result<Session, ApiError> {
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            return Err(ApiError::Unauthorized);
        };

        let value = self
            .send_public(ApiRequest::post(
                "/auth/refresh",
                serde_json::json!({ "refresh_token": refresh_token }),
            ))
            .await
            .inspect_err(|error| {
                tracing::warn!(
                    code = "AUTH_REFRESH_FAILED",
                    error_code = error.code(),
                    error = %error,
                    "token refresh failed"
                );
            })?;

        let fresh = decode::session(&value)?;
        let mut renewed = session.with_tokens(fresh.access_token, fresh.refresh_token);
        if !fresh.user.id.is_empty() {
            renewed.user = fresh.user;
        }

        self.tokens
            .save(&renewed)
            .map_err(|error| ApiError::TokenStore(error.to_string()))?;
        tracing::info!("access token refreshed");
        Ok(renewed)
    }
}

/// Maps a status and raw body onto the JSON payload or an `ApiError`.
pub(crate) fn parse_response(status: StatusCode, body: &str) -> Result<Value, ApiError> {
    let parsed = if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(body)
    };

    if status.is_success() {
        return parsed.map_err(|_| {
            ApiError::Decode(DecodeError::Shape {
                expected: "json",
                found: "malformed body",
            })
        });
    }

    let detail = parsed
        .ok()
        .and_then(|value| value.get("detail").map(detail_text))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_owned()
            } else {
                trimmed.chars().take(200).collect()
            }
        });

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::Timeout,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => ApiError::Network(detail),
        _ => ApiError::Backend {
            status: status.as_u16(),
            detail,
        },
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::infra::token_store::MemoryTokenStore;

    #[test]
    fn success_bodies_parse_as_json() {
        let value = parse_response(StatusCode::OK, r#"{"id": "p1"}"#).expect("json");

        assert_eq!(value, json!({"id": "p1"}));
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(parse_response(StatusCode::NO_CONTENT, "").expect("empty"), Value::Null);
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let error = parse_response(StatusCode::OK, "<html>").expect_err("must fail");

        assert!(matches!(error, ApiError::Decode(_)));
    }

    #[test]
    fn not_found_keeps_backend_detail() {
        let error = parse_response(StatusCode::NOT_FOUND, r#"{"detail": "Not Found"}"#)
            .expect_err("must fail");

        assert!(matches!(error, ApiError::NotFound(detail) if detail == "Not Found"));
    }

    #[test]
    fn validation_errors_are_joined() {
        let error = parse_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"msg": "field required"}, {"msg": "too short"}]}"#,
        )
        .expect_err("must fail");

        assert!(matches!(
            error,
            ApiError::Backend { status: 422, detail } if detail == "field required; too short"
        ));
    }

    #[test]
    fn unauthorized_and_gateway_errors_are_classified() {
        assert!(matches!(
            parse_response(StatusCode::UNAUTHORIZED, ""),
            Err(ApiError::Unauthorized)
        ));
        assert!(parse_response(StatusCode::BAD_GATEWAY, "upstream down")
            .expect_err("must fail")
            .is_transient());
    }

    #[test]
    fn plain_text_error_bodies_become_detail() {
        let error = parse_response(StatusCode::INTERNAL_SERVER_ERROR, "boom").expect_err("must fail");

        assert!(matches!(error, ApiError::Backend { status: 500, detail } if detail == "boom"));
    }

    #[test]
    fn missing_session_is_unauthorized() {
        let client = ApiClient::new(
            BackendConfig::default(),
            FirstLoadConfig::default(),
            Arc::new(MemoryTokenStore::default()),
        )
        .expect("client builds");

        assert!(matches!(client.stored_session(), Err(ApiError::Unauthorized)));
    }
}
