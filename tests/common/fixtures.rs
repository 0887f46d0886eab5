use std::collections::HashMap;
use std::sync::Mutex;

use agentverse::models::ChatUploads;
use agentverse::render::{ConversationPanel, PageView, TabView};
use agentverse::{
    BackendGateway, ChatEntry, ChatReply, ClientError, FileRole, NewProjectForm, Project,
    ProjectId, Upload,
};

pub const TEST_TIMESTAMP: &str = "2025-03-01T14:05:00Z";

/// A backend call as the in-memory gateway saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListProjects,
    CreateProject(String),
    InitChat(ProjectId),
    ContinueChat(ProjectId, String),
    GetChatHistory(ProjectId),
}

#[derive(Debug, Default)]
struct Backend {
    projects: Vec<Project>,
    histories: HashMap<ProjectId, Vec<ChatEntry>>,
    calls: Vec<Call>,
    next_id: u32,
    fail_create: bool,
    fail_init: bool,
    fail_continue: bool,
}

/// In-memory analysis service that records every call made to it.
/// Created projects get ids `p1`, `p2`, ... in order.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    backend: Mutex<Backend>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing project with some history.
    pub fn with_project(self, id: &str, name: &str, history: Vec<ChatEntry>) -> Self {
        {
            let mut backend = self.backend.lock().unwrap();
            let id = ProjectId::new(id);
            backend.projects.push(Project {
                id: id.clone(),
                name: name.to_string(),
            });
            backend.histories.insert(id, history);
        }
        self
    }

    pub fn failing_create(self) -> Self {
        self.backend.lock().unwrap().fail_create = true;
        self
    }

    pub fn failing_init(self) -> Self {
        self.backend.lock().unwrap().fail_init = true;
        self
    }

    pub fn set_failing_continue(&self, fail: bool) {
        self.backend.lock().unwrap().fail_continue = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.backend.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.backend.lock().unwrap().calls.clear();
    }

    pub fn history(&self, id: &ProjectId) -> Vec<ChatEntry> {
        self.backend
            .lock()
            .unwrap()
            .histories
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn project_ids(&self) -> Vec<ProjectId> {
        self.backend
            .lock()
            .unwrap()
            .projects
            .iter()
            .map(|project| project.id.clone())
            .collect()
    }
}

fn unavailable() -> ClientError {
    ClientError::Server {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

impl BackendGateway for RecordingGateway {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let mut backend = self.backend.lock().unwrap();
        backend.calls.push(Call::ListProjects);
        Ok(backend.projects.clone())
    }

    async fn create_project(&self, name: &str) -> Result<Project, ClientError> {
        let mut backend = self.backend.lock().unwrap();
        backend.calls.push(Call::CreateProject(name.to_string()));
        if backend.fail_create {
            return Err(unavailable());
        }
        backend.next_id += 1;
        let project = Project {
            id: ProjectId::new(format!("p{}", backend.next_id)),
            name: name.to_string(),
        };
        backend.projects.push(project.clone());
        Ok(project)
    }

    async fn init_chat(&self, project_id: &ProjectId, _uploads: &ChatUploads) -> Result<(), ClientError> {
        let mut backend = self.backend.lock().unwrap();
        backend.calls.push(Call::InitChat(project_id.clone()));
        if backend.fail_init {
            return Err(unavailable());
        }
        backend.histories.entry(project_id.clone()).or_default();
        Ok(())
    }

    async fn continue_chat(&self, project_id: &ProjectId, text: &str) -> Result<ChatReply, ClientError> {
        let mut backend = self.backend.lock().unwrap();
        backend
            .calls
            .push(Call::ContinueChat(project_id.clone(), text.to_string()));
        if backend.fail_continue {
            return Err(ClientError::Network("connection reset".to_string()));
        }
        let reply = format!("Analysis of: {text}");
        backend
            .histories
            .entry(project_id.clone())
            .or_default()
            .push(entry(Some(text), Some(&reply)));
        Ok(ChatReply::Text(reply))
    }

    async fn get_chat_history(&self, project_id: &ProjectId) -> Result<Vec<ChatEntry>, ClientError> {
        let mut backend = self.backend.lock().unwrap();
        backend.calls.push(Call::GetChatHistory(project_id.clone()));
        Ok(backend.histories.get(project_id).cloned().unwrap_or_default())
    }
}

pub fn entry(message: Option<&str>, response: Option<&str>) -> ChatEntry {
    ChatEntry {
        message: message.map(str::to_string),
        response: response.map(str::to_string),
        timestamp: TEST_TIMESTAMP.to_string(),
    }
}

pub fn csv_upload(name: &str) -> Upload {
    Upload::new(name, b"id,name,value\n1,a,10\n".to_vec())
}

/// A form with a name and all three CSV files attached.
pub fn complete_form(name: &str) -> NewProjectForm {
    NewProjectForm::new(name)
        .with_upload(FileRole::Employee, csv_upload("employees.csv"))
        .with_upload(FileRole::Project, csv_upload("project.csv"))
        .with_upload(FileRole::Financial, csv_upload("financial.csv"))
}

/// The conversation panel of a chat page, panicking on anything else.
pub fn chat_panel(page: &PageView) -> &ConversationPanel {
    match page {
        PageView::Chat(view) => match &view.content {
            TabView::Chat(panel) => panel,
            other => panic!("expected chat tab, got {other:?}"),
        },
        other => panic!("expected chat page, got {other:?}"),
    }
}

/// What the chat input box would be pre-filled with.
pub fn input_default(page: &PageView) -> &str {
    match chat_panel(page) {
        ConversationPanel::Active { input_default, .. } => input_default,
        other => panic!("expected writable panel, got {other:?}"),
    }
}
