//! Project browsing: the project list, one project with its completion
//! status, its cameras and construction sites, and its cover image.

use async_trait::async_trait;

use crate::{
    domain::project::{Camera, CompletionStatus, ConstructionSite, Project},
    infra::image_cache::CachedImage,
};

use super::contracts::SourceError;

#[async_trait]
pub trait ProjectsSource: Send + Sync {
    /// The list shown right after launch; sources apply the first-load policy.
    async fn list_projects(&self) -> Result<Vec<Project>, SourceError>;
    async fn project(&self, project_id: &str) -> Result<Project, SourceError>;
    async fn completion(&self, project_id: &str) -> Result<CompletionStatus, SourceError>;
    async fn cameras(&self, project_id: &str) -> Result<Vec<Camera>, SourceError>;
    /// Sites of one project, or every site the user can see.
    async fn sites(&self, project_id: Option<&str>) -> Result<Vec<ConstructionSite>, SourceError>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn image(&self, url: &str) -> Result<CachedImage, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectsError {
    Unauthorized,
    NotFound,
    TemporarilyUnavailable,
    CameraNotFound(String),
    /// The camera exists but publishes no stream.
    NoStream(String),
    NoCover,
    Failed(String),
}

impl ProjectsError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => SourceError::Unauthorized.user_message(),
            Self::NotFound => "Project not found.".to_owned(),
            Self::TemporarilyUnavailable => SourceError::Unavailable.user_message(),
            Self::CameraNotFound(id) => format!("Camera {id} is not part of this project."),
            Self::NoStream(name) => format!("Camera {name} has no stream."),
            Self::NoCover => "Project has no cover image.".to_owned(),
            Self::Failed(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetails {
    pub project: Project,
    /// Absent when the backend has no completion record for the project.
    pub completion: Option<CompletionStatus>,
}

pub async fn list_projects(source: &dyn ProjectsSource) -> Result<Vec<Project>, ProjectsError> {
    source.list_projects().await.map_err(map_source_error)
}

pub async fn project_details(
    source: &dyn ProjectsSource,
    project_id: &str,
) -> Result<ProjectDetails, ProjectsError> {
    let project = source.project(project_id).await.map_err(map_source_error)?;

    let completion = match source.completion(project_id).await {
        Ok(status) => Some(status),
        Err(SourceError::NotFound(_)) => None,
        Err(error) => return Err(map_source_error(error)),
    };

    Ok(ProjectDetails {
        project,
        completion,
    })
}

pub async fn list_cameras(
    source: &dyn ProjectsSource,
    project_id: &str,
) -> Result<Vec<Camera>, ProjectsError> {
    source.cameras(project_id).await.map_err(map_source_error)
}

pub async fn list_sites(
    source: &dyn ProjectsSource,
    project_id: Option<&str>,
) -> Result<Vec<ConstructionSite>, ProjectsError> {
    source.sites(project_id).await.map_err(map_source_error)
}

/// Resolves the stream of one camera of a project.
pub async fn camera_stream(
    source: &dyn ProjectsSource,
    project_id: &str,
    camera_id: &str,
) -> Result<Camera, ProjectsError> {
    let camera = list_cameras(source, project_id)
        .await?
        .into_iter()
        .find(|camera| camera.id == camera_id)
        .ok_or_else(|| ProjectsError::CameraNotFound(camera_id.to_owned()))?;

    if camera.stream_url.trim().is_empty() {
        let label = if camera.name.is_empty() {
            camera.id.clone()
        } else {
            camera.name.clone()
        };
        return Err(ProjectsError::NoStream(label));
    }

    Ok(camera)
}

pub async fn project_cover(
    projects: &dyn ProjectsSource,
    images: &dyn ImageSource,
    project_id: &str,
) -> Result<CachedImage, ProjectsError> {
    let project = projects.project(project_id).await.map_err(map_source_error)?;
    if project.image_url.trim().is_empty() {
        return Err(ProjectsError::NoCover);
    }

    images
        .image(&project.image_url)
        .await
        .map_err(map_source_error)
}

fn map_source_error(error: SourceError) -> ProjectsError {
    match error {
        SourceError::Unauthorized => ProjectsError::Unauthorized,
        SourceError::NotFound(_) => ProjectsError::NotFound,
        SourceError::Unavailable => ProjectsError::TemporarilyUnavailable,
        other => ProjectsError::Failed(other.user_message()),
    }
}
