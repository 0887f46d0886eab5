//! Page views composed from [`SessionState`] and backend data.
//!
//! A render cycle is: derive a [`PageRequest`] from the session, fetch what
//! that page needs ([`fetch_page`]), then [`compose`] the view. Composing is
//! where the one-shot clear-input flag is consumed.

use crate::charts::{Dashboard, DashboardData};
use crate::error::ClientError;
use crate::gateway::BackendGateway;
use crate::models::{ChatEntry, Project, ProjectId};
use crate::state::{Page, SessionState, Tab};
use crate::timestamp::format_timestamp;

pub const PING_SIGNAL: &str = "ping";
pub const PING_ACK: &str = "✅ Ping received. App is alive.";
pub const NO_SIGNALS: [&str; 0] = [];

pub const READ_ONLY_NOTICE: &str =
    "Viewing chat history only. Create a new project to start a conversation.";
pub const NO_PROJECTS_NOTICE: &str = "No projects found. Create a new project to get started.";
pub const NO_MESSAGES_NOTICE: &str = "No messages yet. Start a conversation below.";
pub const NO_HISTORY_NOTICE: &str = "No chat history found for this project.";

/// Answer the liveness probe if `signals` carries it. Stateless.
pub fn liveness_probe<'a, I>(signals: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    signals
        .into_iter()
        .any(|signal| signal == PING_SIGNAL)
        .then_some(PING_ACK)
}

/// What the current page needs from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    Landing,
    Chat { project_id: ProjectId, tab: Tab },
}

pub fn page_request(state: &SessionState) -> PageRequest {
    match (state.page(), state.current_project_id()) {
        (Page::Chat, Some(project_id)) => PageRequest::Chat {
            project_id: project_id.clone(),
            tab: state.current_tab(),
        },
        _ => PageRequest::Landing,
    }
}

/// Backend data fetched for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData {
    pub request: PageRequest,
    pub projects: Result<Vec<Project>, ClientError>,
    /// Only fetched for the chat tab.
    pub history: Option<Result<Vec<ChatEntry>, ClientError>>,
}

/// Fetch the project list, plus the chat history when the chat tab is shown.
/// Charts are drawn from local data and never cause a request.
pub async fn fetch_page<G: BackendGateway>(gateway: &G, request: &PageRequest) -> PageData {
    let projects = gateway.list_projects().await;
    let history = match request {
        PageRequest::Chat {
            project_id,
            tab: Tab::Chat,
        } => Some(gateway.get_chat_history(project_id).await),
        _ => None,
    };
    PageData {
        request: request.clone(),
        projects,
        history,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: String,
}

/// Flatten history entries into bubbles: the user's message, then the reply.
pub fn conversation(entries: &[ChatEntry]) -> Vec<ChatBubble> {
    let mut bubbles = Vec::with_capacity(entries.len() * 2);
    for entry in entries {
        let timestamp = format_timestamp(&entry.timestamp);
        let turns = [
            (Speaker::User, &entry.message),
            (Speaker::Assistant, &entry.response),
        ];
        for (speaker, text) in turns {
            if let Some(text) = text.as_deref().filter(|text| !text.is_empty()) {
                bubbles.push(ChatBubble {
                    speaker,
                    text: text.to_string(),
                    timestamp: timestamp.clone(),
                });
            }
        }
    }
    bubbles
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationPanel {
    /// Writable conversation of the active project.
    Active {
        bubbles: Vec<ChatBubble>,
        empty_notice: Option<&'static str>,
        input_default: String,
    },
    /// History of any other project. Has no input.
    ReadOnly {
        notice: &'static str,
        bubbles: Vec<ChatBubble>,
        empty_notice: Option<&'static str>,
    },
}

impl ConversationPanel {
    pub fn heading(&self) -> &'static str {
        match self {
            ConversationPanel::Active { .. } => "Project Risk Analysis",
            ConversationPanel::ReadOnly { .. } => "Project Risk Analysis History",
        }
    }

    pub fn bubbles(&self) -> &[ChatBubble] {
        match self {
            ConversationPanel::Active { bubbles, .. } | ConversationPanel::ReadOnly { bubbles, .. } => bubbles,
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, ConversationPanel::Active { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabView {
    Chat(ConversationPanel),
    Visualization(Box<Dashboard>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPageView {
    pub project_id: ProjectId,
    pub title: String,
    pub tab: Tab,
    pub content: TabView,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandingView {
    pub show_add_project_form: bool,
    pub projects: Vec<Project>,
    pub empty_notice: Option<&'static str>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Alive(&'static str),
    Landing(LandingView),
    Chat(ChatPageView),
}

/// Build the view for the current page. Consumes the clear-input flag
/// whether or not an input box ends up on screen, so it never outlives the
/// render that follows the send.
pub fn compose(state: &mut SessionState, data: PageData, last_typed: &str) -> PageView {
    let input_default = state.input_default(last_typed);
    let mut errors = Vec::new();
    let projects = data.projects.unwrap_or_else(|err| {
        errors.push(format!("Error fetching projects: {err}"));
        Vec::new()
    });

    let PageRequest::Chat { project_id, tab } = page_request(state) else {
        let empty_notice = (projects.is_empty() && errors.is_empty()).then_some(NO_PROJECTS_NOTICE);
        return PageView::Landing(LandingView {
            show_add_project_form: state.show_add_project_form(),
            projects,
            empty_notice,
            errors,
        });
    };

    let title = projects
        .iter()
        .find(|project| project.id == project_id)
        .map(Project::display_name)
        .unwrap_or_else(|| format!("Project {project_id}"));

    let content = match tab {
        Tab::Visualization => TabView::Visualization(Box::new(Dashboard::build(&DashboardData::sample()))),
        Tab::Chat => {
            let entries = match data.history {
                Some(Ok(entries)) => entries,
                Some(Err(err)) => {
                    errors.push(format!("Error fetching chat history: {err}"));
                    Vec::new()
                }
                None => Vec::new(),
            };
            let bubbles = conversation(&entries);
            if state.is_active(&project_id) {
                TabView::Chat(ConversationPanel::Active {
                    empty_notice: bubbles.is_empty().then_some(NO_MESSAGES_NOTICE),
                    bubbles,
                    input_default,
                })
            } else {
                TabView::Chat(ConversationPanel::ReadOnly {
                    notice: READ_ONLY_NOTICE,
                    empty_notice: bubbles.is_empty().then_some(NO_HISTORY_NOTICE),
                    bubbles,
                })
            }
        }
    };

    PageView::Chat(ChatPageView {
        project_id,
        title,
        tab,
        content,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: Option<&str>, response: Option<&str>) -> ChatEntry {
        ChatEntry {
            message: message.map(str::to_string),
            response: response.map(str::to_string),
            timestamp: "2025-03-01T14:05:00Z".to_string(),
        }
    }

    fn landing_data(projects: Vec<Project>) -> PageData {
        PageData {
            request: PageRequest::Landing,
            projects: Ok(projects),
            history: None,
        }
    }

    #[test]
    fn probe_only_answers_ping() {
        assert_eq!(liveness_probe(["ping"]), Some(PING_ACK));
        assert_eq!(liveness_probe(["tab", "ping"]), Some(PING_ACK));
        assert_eq!(liveness_probe(["pong"]), None);
        assert_eq!(liveness_probe(Vec::<&str>::new()), None);
    }

    #[test]
    fn conversation_skips_missing_halves() {
        let bubbles = conversation(&[
            entry(Some("What is the top risk?"), Some("Schedule slip")),
            entry(None, Some("Welcome")),
            entry(Some(""), None),
        ]);
        let speakers: Vec<_> = bubbles.iter().map(|b| b.speaker).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Assistant, Speaker::Assistant]);
        assert_eq!(bubbles[0].timestamp, "March 01, 2025 02:05 PM");
    }

    #[test]
    fn missing_timestamp_renders_blank() {
        let history: Vec<ChatEntry> =
            serde_json::from_str(r#"[{"message": "hi", "response": "yo", "timestamp": null}]"#).unwrap();
        let bubbles = conversation(&history);
        assert_eq!(bubbles.len(), 2);
        assert!(bubbles.iter().all(|b| b.timestamp.is_empty()));
    }

    #[test]
    fn empty_landing_shows_notice() {
        let mut state = SessionState::new();
        let PageView::Landing(view) = compose(&mut state, landing_data(vec![]), "") else {
            panic!("expected landing page");
        };
        assert_eq!(view.empty_notice, Some(NO_PROJECTS_NOTICE));
    }

    #[test]
    fn project_fetch_errors_are_surfaced() {
        let mut state = SessionState::new();
        let data = PageData {
            request: PageRequest::Landing,
            projects: Err(ClientError::Server {
                status: 502,
                body: String::new(),
            }),
            history: None,
        };
        let PageView::Landing(view) = compose(&mut state, data, "") else {
            panic!("expected landing page");
        };
        assert_eq!(view.errors.len(), 1);
        assert!(view.errors[0].contains("502"));
        assert_eq!(view.empty_notice, None);
    }

    #[test]
    fn read_only_panel_for_viewed_project() {
        let mut state = SessionState::new();
        let id = ProjectId::new("old");
        state.view_project(id.clone());
        let data = PageData {
            request: page_request(&state),
            projects: Ok(vec![Project {
                id: id.clone(),
                name: "Legacy".into(),
            }]),
            history: Some(Ok(vec![])),
        };
        let PageView::Chat(view) = compose(&mut state, data, "typed") else {
            panic!("expected chat page");
        };
        assert_eq!(view.title, "Legacy");
        let TabView::Chat(panel) = view.content else {
            panic!("expected chat tab");
        };
        assert!(!panel.is_writable());
        assert_eq!(
            panel,
            ConversationPanel::ReadOnly {
                notice: READ_ONLY_NOTICE,
                bubbles: vec![],
                empty_notice: Some(NO_HISTORY_NOTICE),
            }
        );
    }
}
