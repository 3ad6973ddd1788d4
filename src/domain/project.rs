//! Entities decoded through the lenient field-alias decoder.
//!
//! Every field has a documented default so a drifting backend payload still
//! yields a usable value; see `backend::lenient` for the alias tables.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Cover image, empty when the project has none.
    pub image_url: String,
    pub status: String,
    /// Completion percentage, clamped to `0..=100`.
    pub progress: u8,
    pub customer_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub sites_count: u32,
    pub cameras_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Camera {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub stream_url: String,
    pub preview_url: String,
    pub is_online: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstructionSite {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionDocument {
    pub id: String,
    pub name: String,
    pub url: String,
    pub is_signed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionStatus {
    pub project_id: String,
    pub stage: String,
    pub is_completed: bool,
    pub completed_steps: u32,
    pub total_steps: u32,
    pub documents: Vec<CompletionDocument>,
}

impl CompletionStatus {
    pub fn unsigned_documents(&self) -> usize {
        self.documents.iter().filter(|doc| !doc.is_signed).count()
    }

    /// Progress label such as `3/5`.
    pub fn steps_label(&self) -> String {
        format!("{}/{}", self.completed_steps, self.total_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_unsigned_documents() {
        let status = CompletionStatus {
            completed_steps: 2,
            total_steps: 4,
            documents: vec![
                CompletionDocument {
                    is_signed: true,
                    ..Default::default()
                },
                CompletionDocument::default(),
            ],
            ..Default::default()
        };

        assert_eq!(status.unsigned_documents(), 1);
        assert_eq!(status.steps_label(), "2/4");
    }
}
