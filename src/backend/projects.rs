use std::{future::Future, time::Duration};

use async_trait::async_trait;

use crate::{
    domain::project::{Camera, CompletionStatus, ConstructionSite, Project},
    infra::config::FirstLoadConfig,
    usecases::{contracts::SourceError, projects::ProjectsSource},
};

use super::{
    client::{ApiClient, ApiRequest},
    decode,
    error::ApiError,
    lenient::decode_list,
};

/// Runs `attempt` under the cold-start policy.
///
/// Up to `policy.attempts` tries use the short timeout; after failure `n`
/// the caller waits `n` backoff units. One final try then uses `standard`
/// and its outcome is returned as is. Only transient failures are retried.
pub(crate) async fn with_first_load_policy<T, F, Fut>(
    policy: &FirstLoadConfig,
    standard: Duration,
    mut attempt: F,
) -> Result<T, ApiError>
where
    F: FnMut(Duration) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let short = Duration::from_millis(policy.timeout_ms);
    let unit = Duration::from_millis(policy.backoff_unit_ms);

    for n in 1..=policy.attempts {
        match attempt(short).await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() => {
                tracing::warn!(
                    code = "FIRST_LOAD_RETRY",
                    error_code = error.code(),
                    attempt = n,
                    error = %error,
                    "first load attempt failed; backing off"
                );
                tokio::time::sleep(unit * n).await;
            }
            Err(error) => return Err(error),
        }
    }

    attempt(standard).await
}

impl ApiClient {
    pub async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
        let standard = self.backend().timeout();

        with_first_load_policy(self.first_load(), standard, |timeout| async move {
            let value = self.send(ApiRequest::get("/projects").timeout(timeout)).await?;
            Ok(decode_list(&value, decode::project)?)
        })
        .await
    }

    pub async fn fetch_project(&self, project_id: &str) -> Result<Project, ApiError> {
        let value = self.send(ApiRequest::get(format!("/projects/{project_id}"))).await?;
        Ok(decode::project(&value)?)
    }

    pub async fn fetch_completion(&self, project_id: &str) -> Result<CompletionStatus, ApiError> {
        let value = self
            .send(ApiRequest::get(format!("/projects/{project_id}/completion")))
            .await?;
        Ok(decode::completion_status(&value, project_id)?)
    }

    pub async fn fetch_cameras(&self, project_id: &str) -> Result<Vec<Camera>, ApiError> {
        let value = self
            .send(ApiRequest::get(format!("/projects/{project_id}/cameras")))
            .await?;
        Ok(decode_list(&value, decode::camera)?)
    }

    pub async fn fetch_sites(&self, project_id: Option<&str>) -> Result<Vec<ConstructionSite>, ApiError> {
        let path = match project_id {
            Some(project_id) => format!("/projects/{project_id}/sites"),
            None => "/construction-sites".to_owned(),
        };

        let value = self.send(ApiRequest::get(path)).await?;
        Ok(decode_list(&value, decode::construction_site)?)
    }
}

#[async_trait]
impl ProjectsSource for ApiClient {
    async fn list_projects(&self) -> Result<Vec<Project>, SourceError> {
        Ok(self.fetch_projects().await?)
    }

    async fn project(&self, project_id: &str) -> Result<Project, SourceError> {
        Ok(self.fetch_project(project_id).await?)
    }

    async fn completion(&self, project_id: &str) -> Result<CompletionStatus, SourceError> {
        Ok(self.fetch_completion(project_id).await?)
    }

    async fn cameras(&self, project_id: &str) -> Result<Vec<Camera>, SourceError> {
        Ok(self.fetch_cameras(project_id).await?)
    }

    async fn sites(&self, project_id: Option<&str>) -> Result<Vec<ConstructionSite>, SourceError> {
        Ok(self.fetch_sites(project_id).await?)
    }
}
