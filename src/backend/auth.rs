use async_trait::async_trait;
use serde_json::json;

use crate::{
    domain::session::Session,
    usecases::{contracts::SourceError, login::AuthClient},
};

use super::{
    client::{ApiClient, ApiRequest},
    decode,
    error::ApiError,
};

impl ApiClient {
    /// `POST /auth/login`. Some deployments answer bad credentials with 400
    /// rather than 401; both surface as `Unauthorized`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request = ApiRequest::post(
            "/auth/login",
            json!({ "email": email, "password": password }),
        );

        let value = match self.send_public(request).await {
            Err(ApiError::Backend { status: 400, .. }) => return Err(ApiError::Unauthorized),
            other => other?,
        };

        Ok(decode::session(&value)?)
    }
}

#[async_trait]
impl AuthClient for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session, SourceError> {
        Ok(self.sign_in(email, password).await?)
    }
}
