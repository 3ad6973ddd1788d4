//! Alias tables and decoders for the lenient-decoded models.
//!
//! Candidate order is camelCase, then snake_case, then spellings older
//! backend releases are known to have used.

use serde_json::Value;

use crate::domain::{
    project::{Camera, CompletionDocument, CompletionStatus, ConstructionSite, Project},
    session::{Session, UserIdentity},
};

use super::lenient::{DecodeError, Field, LenientObject};

pub mod fields {
    use super::Field;

    pub const ID: Field = Field::new("id", &["id", "uuid", "pk"]);
    pub const NAME: Field = Field::new("name", &["name", "title"]);
    pub const ADDRESS: Field = Field::new("address", &["address", "location"]);
    pub const IMAGE_URL: Field = Field::new(
        "image_url",
        &["imageUrl", "image_url", "image", "photoUrl", "photo_url", "coverUrl", "cover_url"],
    );
    pub const STATUS: Field = Field::new("status", &["status", "state"]);
    pub const PROGRESS: Field = Field::new(
        "progress",
        &["progress", "progressPercent", "progress_percent", "completion"],
    );
    pub const CUSTOMER_NAME: Field = Field::new(
        "customer_name",
        &["customerName", "customer_name", "clientName", "client_name"],
    );
    pub const START_DATE: Field = Field::new(
        "start_date",
        &["startDate", "start_date", "startedAt", "started_at"],
    );
    pub const END_DATE: Field = Field::new(
        "end_date",
        &["endDate", "end_date", "deadline", "finishDate", "finish_date"],
    );
    pub const SITES_COUNT: Field = Field::new(
        "sites_count",
        &["sitesCount", "sites_count", "constructionSitesCount", "construction_sites_count"],
    );
    pub const CAMERAS_COUNT: Field =
        Field::new("cameras_count", &["camerasCount", "cameras_count"]);

    pub const PROJECT_ID: Field = Field::new("project_id", &["projectId", "project_id", "project"]);
    pub const STREAM_URL: Field = Field::new(
        "stream_url",
        &["streamUrl", "stream_url", "hlsUrl", "hls_url", "rtspUrl", "rtsp_url", "url"],
    );
    pub const PREVIEW_URL: Field = Field::new(
        "preview_url",
        &["previewUrl", "preview_url", "snapshotUrl", "snapshot_url", "thumbnail"],
    );
    pub const IS_ONLINE: Field = Field::new(
        "is_online",
        &["isOnline", "is_online", "online", "isActive", "is_active"],
    );

    pub const LATITUDE: Field = Field::new("latitude", &["latitude", "lat"]);
    pub const LONGITUDE: Field = Field::new("longitude", &["longitude", "lng", "lon"]);

    pub const STAGE: Field = Field::new("stage", &["stage", "currentStage", "current_stage", "status"]);
    pub const IS_COMPLETED: Field = Field::new(
        "is_completed",
        &["isCompleted", "is_completed", "completed"],
    );
    pub const COMPLETED_STEPS: Field = Field::new(
        "completed_steps",
        &["completedSteps", "completed_steps", "doneSteps", "done_steps"],
    );
    pub const TOTAL_STEPS: Field = Field::new(
        "total_steps",
        &["totalSteps", "total_steps", "stepsCount", "steps_count"],
    );
    pub const DOCUMENTS: Field = Field::new("documents", &["documents", "docs", "files"]);
    pub const DOCUMENT_URL: Field = Field::new(
        "url",
        &["url", "fileUrl", "file_url", "downloadUrl", "download_url"],
    );
    pub const IS_SIGNED: Field = Field::new("is_signed", &["isSigned", "is_signed", "signed"]);

    pub const ACCESS_TOKEN: Field = Field::new(
        "access_token",
        &["accessToken", "access_token", "access", "token"],
    );
    pub const REFRESH_TOKEN: Field = Field::new(
        "refresh_token",
        &["refreshToken", "refresh_token", "refresh"],
    );
    pub const USER: Field = Field::new("user", &["user", "profile", "me"]);
    pub const EMAIL: Field = Field::new("email", &["email", "login"]);
    pub const FULL_NAME: Field = Field::new(
        "full_name",
        &["fullName", "full_name", "name", "displayName", "display_name"],
    );
    pub const ROLE: Field = Field::new("role", &["role", "userRole", "user_role"]);
}

pub fn project(value: &Value) -> Result<Project, DecodeError> {
    let object = LenientObject::new(value)?;

    Ok(Project {
        id: object.required_id(&fields::ID)?,
        name: object.string(&fields::NAME),
        address: object.string(&fields::ADDRESS),
        image_url: object.string(&fields::IMAGE_URL),
        status: object.string(&fields::STATUS),
        progress: object.u32(&fields::PROGRESS).min(100) as u8,
        customer_name: object.string(&fields::CUSTOMER_NAME),
        start_date: object.timestamp(&fields::START_DATE),
        end_date: object.timestamp(&fields::END_DATE),
        sites_count: object.u32(&fields::SITES_COUNT),
        cameras_count: object.u32(&fields::CAMERAS_COUNT),
    })
}

pub fn camera(value: &Value) -> Result<Camera, DecodeError> {
    let object = LenientObject::new(value)?;

    Ok(Camera {
        id: object.required_id(&fields::ID)?,
        project_id: object.string(&fields::PROJECT_ID),
        name: object.string(&fields::NAME),
        stream_url: object.string(&fields::STREAM_URL),
        preview_url: object.string(&fields::PREVIEW_URL),
        is_online: object.bool(&fields::IS_ONLINE),
    })
}

pub fn construction_site(value: &Value) -> Result<ConstructionSite, DecodeError> {
    let object = LenientObject::new(value)?;

    Ok(ConstructionSite {
        id: object.required_id(&fields::ID)?,
        project_id: object.string(&fields::PROJECT_ID),
        name: object.string(&fields::NAME),
        address: object.string(&fields::ADDRESS),
        latitude: object.f64(&fields::LATITUDE),
        longitude: object.f64(&fields::LONGITUDE),
    })
}

/// Completion payloads do not always echo the project id, so the caller's id
/// is used when the payload lacks one.
pub fn completion_status(value: &Value, project_id: &str) -> Result<CompletionStatus, DecodeError> {
    let object = LenientObject::new(value)?;

    Ok(CompletionStatus {
        project_id: object
            .opt_string(&fields::PROJECT_ID)
            .unwrap_or_else(|| project_id.to_owned()),
        stage: object.string(&fields::STAGE),
        is_completed: object.bool(&fields::IS_COMPLETED),
        completed_steps: object.u32(&fields::COMPLETED_STEPS),
        total_steps: object.u32(&fields::TOTAL_STEPS),
        documents: object.list(&fields::DOCUMENTS, completion_document)?,
    })
}

fn completion_document(value: &Value) -> Result<CompletionDocument, DecodeError> {
    let object = LenientObject::new(value)?;

    Ok(CompletionDocument {
        id: object.required_id(&fields::ID)?,
        name: object.string(&fields::NAME),
        url: object.string(&fields::DOCUMENT_URL),
        is_signed: object.bool(&fields::IS_SIGNED),
    })
}

/// Login and refresh responses. The user block is optional on refresh.
pub fn session(value: &Value) -> Result<Session, DecodeError> {
    let object = LenientObject::new(value)?;

    let access_token = object
        .opt_string(&fields::ACCESS_TOKEN)
        .filter(|token| !token.is_empty())
        .ok_or(DecodeError::MissingField(fields::ACCESS_TOKEN.name))?;

    let user = match object.lookup(&fields::USER) {
        Some(user) => user_identity(user)?,
        None => UserIdentity::default(),
    };

    Ok(Session {
        access_token,
        refresh_token: object.opt_string(&fields::REFRESH_TOKEN),
        user,
    })
}

fn user_identity(value: &Value) -> Result<UserIdentity, DecodeError> {
    let object = LenientObject::new(value)?;

    Ok(UserIdentity {
        id: object.string(&fields::ID),
        email: object.string(&fields::EMAIL),
        full_name: object.string(&fields::FULL_NAME),
        role: object.string(&fields::ROLE),
    })
}
