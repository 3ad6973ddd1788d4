//! Text views for the one-shot list and detail commands.

use chrono::{DateTime, Local, Utc};

use crate::{
    domain::{
        chat::Chat,
        list_state::{ListScreenState, ListUiState},
        project::{Camera, ConstructionSite, Project},
    },
    usecases::projects::ProjectDetails,
};

use super::{styles, tables::render_table};

/// Renders a list screen: a table when ready, otherwise its placeholder.
pub fn list_lines<T>(
    state: &ListScreenState<T>,
    empty_text: &str,
    render: impl Fn(&[T]) -> Vec<String>,
) -> Vec<String> {
    match state.ui_state() {
        ListUiState::Loading => vec![styles::muted_style().apply("Loading…").to_string()],
        ListUiState::Empty => vec![styles::muted_style().apply(empty_text).to_string()],
        ListUiState::Error => vec![styles::error_style()
            .apply(state.error().unwrap_or("Something went wrong."))
            .to_string()],
        ListUiState::Ready => render(state.items()),
    }
}

pub fn projects_table(projects: &[Project]) -> Vec<String> {
    let rows = projects
        .iter()
        .map(|project| {
            vec![
                project.id.clone(),
                project.name.clone(),
                project.status.clone(),
                format!("{}%", project.progress),
                project.customer_name.clone(),
                format_date(project.end_date),
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "NAME", "STATUS", "PROGRESS", "CUSTOMER", "DUE"], &rows)
}

pub fn chats_table(chats: &[Chat]) -> Vec<String> {
    let rows = chats
        .iter()
        .map(|chat| {
            // Cells stay unstyled: escape codes would break column widths.
            let unread = if chat.unread_count > 0 {
                chat.unread_count.to_string()
            } else {
                String::new()
            };

            vec![
                chat.id.clone(),
                chat.display_title().to_owned(),
                unread,
                chat.last_message.clone().unwrap_or_default(),
                format_timestamp(chat.last_message_at),
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "WITH", "UNREAD", "LAST MESSAGE", "AT"], &rows)
}

pub fn cameras_table(cameras: &[Camera]) -> Vec<String> {
    let rows = cameras
        .iter()
        .map(|camera| {
            vec![
                camera.id.clone(),
                camera.name.clone(),
                if camera.is_online { "online" } else { "offline" }.to_owned(),
                camera.stream_url.clone(),
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "NAME", "STATE", "STREAM"], &rows)
}

pub fn sites_table(sites: &[ConstructionSite]) -> Vec<String> {
    let rows = sites
        .iter()
        .map(|site| {
            let coordinates = match (site.latitude, site.longitude) {
                (Some(lat), Some(lon)) => format!("{lat:.5}, {lon:.5}"),
                _ => String::new(),
            };
            vec![
                site.id.clone(),
                site.name.clone(),
                site.address.clone(),
                coordinates,
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "NAME", "ADDRESS", "COORDINATES"], &rows)
}

pub fn project_details_lines(details: &ProjectDetails) -> Vec<String> {
    let project = &details.project;
    let mut lines = vec![
        styles::header_style().apply(&project.name).to_string(),
        field("Address", &project.address),
        field("Customer", &project.customer_name),
        field("Status", &project.status),
        field("Progress", &format!("{}%", project.progress)),
        field(
            "Schedule",
            &format!(
                "{} → {}",
                format_date(project.start_date),
                format_date(project.end_date)
            ),
        ),
        field(
            "Sites / cameras",
            &format!("{} / {}", project.sites_count, project.cameras_count),
        ),
    ];

    match &details.completion {
        None => lines.push(field("Completion", "not started")),
        Some(completion) => {
            lines.push(field(
                "Completion",
                &format!(
                    "{} ({} steps{})",
                    if completion.stage.is_empty() { "-" } else { &completion.stage },
                    completion.steps_label(),
                    if completion.is_completed { ", done" } else { "" }
                ),
            ));
            for document in &completion.documents {
                let mark = if document.is_signed { "signed" } else { "unsigned" };
                lines.push(format!("  - {} [{mark}] {}", document.name, document.url));
            }
            if completion.unsigned_documents() > 0 {
                lines.push(
                    styles::unread_count_style()
                        .apply(format!(
                            "  {} document(s) awaiting signature",
                            completion.unsigned_documents()
                        ))
                        .to_string(),
                );
            }
        }
    }

    lines
}

fn field(label: &str, value: &str) -> String {
    let value = if value.trim().is_empty() { "-" } else { value };
    format!("{}{value}", styles::muted_style().apply(format!("{label:<16}")))
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_owned())
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{CompletionDocument, CompletionStatus};

    #[test]
    fn chats_table_shows_unread_and_fallback_title() {
        let mut chat = Chat::placeholder("c7");
        chat.unread_count = 3;
        chat.last_message = Some("See you at the gate".to_owned());

        let lines = chats_table(&[chat]);

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("c7  c7"));
        assert!(lines[1].contains("  3  "));
        assert!(lines[1].contains("See you at the gate"));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let mut state = ListScreenState::<Project>::default();
        state.set_ready(Vec::new());

        let lines = list_lines(&state, "No projects yet.", projects_table);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No projects yet."));
    }

    #[test]
    fn error_state_shows_user_text() {
        let mut state = ListScreenState::<Project>::default();
        state.set_error("Server is unreachable.");

        let lines = list_lines(&state, "No projects yet.", projects_table);

        assert!(lines[0].contains("Server is unreachable."));
    }

    #[test]
    fn ready_projects_render_one_row_each() {
        let mut state = ListScreenState::default();
        state.set_ready(vec![
            Project {
                id: "p1".to_owned(),
                name: "Tower A".to_owned(),
                progress: 40,
                ..Project::default()
            },
            Project {
                id: "p2".to_owned(),
                name: "Depot".to_owned(),
                ..Project::default()
            },
        ]);

        let lines = list_lines(&state, "No projects yet.", projects_table);

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Tower A"));
        assert!(lines[1].contains("40%"));
    }

    #[test]
    fn details_list_documents_and_unsigned_count() {
        let details = ProjectDetails {
            project: Project {
                id: "p1".to_owned(),
                name: "Tower A".to_owned(),
                ..Project::default()
            },
            completion: Some(CompletionStatus {
                project_id: "p1".to_owned(),
                stage: "acceptance".to_owned(),
                completed_steps: 2,
                total_steps: 5,
                documents: vec![CompletionDocument {
                    id: "d1".to_owned(),
                    name: "Act".to_owned(),
                    url: "https://x/d1".to_owned(),
                    is_signed: false,
                }],
                ..CompletionStatus::default()
            }),
        };

        let lines = project_details_lines(&details);

        assert!(lines.iter().any(|line| line.contains("acceptance (2/5 steps)")));
        assert!(lines.iter().any(|line| line.contains("Act [unsigned]")));
        assert!(lines.iter().any(|line| line.contains("1 document(s) awaiting signature")));
    }
}
