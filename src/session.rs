//! Chat submission and project creation against the analysis service.
//!
//! Each workflow comes in two halves: an async half that only talks to the
//! [`BackendGateway`], and a synchronous half that applies the outcome to
//! [`SessionState`]. [`ChatSession`] runs both in sequence; an event-loop
//! front end can instead run the async half on its executor and apply the
//! result when it arrives.

use crate::error::{ClientError, CreateProjectError, ValidationError};
use crate::gateway::{BackendGateway, ChatReply};
use crate::models::{ChatUploads, FileRole, ProjectId, Upload};
use crate::navigation::Intent;
use crate::render::{self, PageView};
use crate::state::SessionState;

/// The add-project form as the user filled it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProjectForm {
    pub name: String,
    pub employee: Option<Upload>,
    pub project: Option<Upload>,
    pub financial: Option<Upload>,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProject {
    pub name: String,
    pub uploads: ChatUploads,
}

impl NewProjectForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_upload(mut self, role: FileRole, upload: Upload) -> Self {
        self.set_upload(role, Some(upload));
        self
    }

    pub fn set_upload(&mut self, role: FileRole, upload: Option<Upload>) {
        let slot = match role {
            FileRole::Employee => &mut self.employee,
            FileRole::Project => &mut self.project,
            FileRole::Financial => &mut self.financial,
        };
        *slot = upload;
    }

    pub fn upload(&self, role: FileRole) -> Option<&Upload> {
        match role {
            FileRole::Employee => self.employee.as_ref(),
            FileRole::Project => self.project.as_ref(),
            FileRole::Financial => self.financial.as_ref(),
        }
    }

    /// Check the name and the three files without touching the network.
    pub fn validate(&self) -> Result<ValidatedProject, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        match (&self.employee, &self.project, &self.financial) {
            (Some(employee), Some(project), Some(financial)) => Ok(ValidatedProject {
                name: name.to_string(),
                uploads: ChatUploads {
                    employee: employee.clone(),
                    project: project.clone(),
                    financial: financial.clone(),
                },
            }),
            _ => Err(ValidationError::MissingFiles(
                FileRole::ALL
                    .into_iter()
                    .filter(|role| self.upload(*role).is_none())
                    .collect(),
            )),
        }
    }
}

/// Create the project, then initialize its conversation with the uploads.
///
/// There is no rollback: if initialization fails the project stays on the
/// backend and the error names it.
pub async fn create_and_initialize<G: BackendGateway>(
    gateway: &G,
    project: &ValidatedProject,
) -> Result<ProjectId, CreateProjectError> {
    let created = gateway
        .create_project(&project.name)
        .await
        .map_err(CreateProjectError::Create)?;
    let initialized = gateway.init_chat(&created.id, &project.uploads).await;
    if let Err(source) = initialized {
        tracing::warn!(project_id = %created.id, %source, "chat initialization failed; project left uninitialized");
        return Err(CreateProjectError::Init {
            project_id: created.id,
            source,
        });
    }
    Ok(created.id)
}

/// Why a submission never reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// The project is historical; its conversation cannot be appended to.
    ReadOnly,
    EmptyMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Sent { reply: String },
    Rejected(SubmitRejection),
    Failed(ClientError),
}

impl SessionState {
    /// Gate a submission. Only the active project with a non-blank message
    /// may reach the backend.
    pub fn admit_submission(&self, project_id: &ProjectId, text: &str) -> Result<(), SubmitRejection> {
        if !self.is_active(project_id) {
            return Err(SubmitRejection::ReadOnly);
        }
        if text.trim().is_empty() {
            return Err(SubmitRejection::EmptyMessage);
        }
        Ok(())
    }

    /// Apply the backend's answer to a submission. On success the input is
    /// cleared on the next render; on failure the typed text is kept.
    pub fn complete_submission(&mut self, result: Result<ChatReply, ClientError>) -> SubmitOutcome {
        match result {
            Ok(reply) => {
                self.request_clear_input();
                self.schedule_render();
                SubmitOutcome::Sent {
                    reply: reply.display_text(),
                }
            }
            Err(err) => {
                tracing::warn!(%err, "sending message failed");
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Apply the result of [`create_and_initialize`]. Only full success moves
    /// the session; any failure leaves it where it was.
    pub fn complete_creation(&mut self, result: &Result<ProjectId, CreateProjectError>) {
        match result {
            Ok(id) => self.enter_new_project(id.clone()),
            Err(err) => tracing::warn!(%err, "project creation failed"),
        }
    }
}

/// One user session bound to a backend.
#[derive(Debug)]
pub struct ChatSession<G> {
    state: SessionState,
    gateway: G,
}

impl<G: BackendGateway> ChatSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            state: SessionState::new(),
            gateway,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn is_active(&self, project_id: &ProjectId) -> bool {
        self.state.is_active(project_id)
    }

    pub fn navigate(&mut self, intent: Intent) {
        self.state.dispatch(intent);
    }

    /// Send `text` to the conversation of `project_id`.
    ///
    /// Historical projects and blank messages are rejected without calling
    /// the backend.
    pub async fn submit(&mut self, project_id: &ProjectId, text: &str) -> SubmitOutcome {
        if let Err(rejection) = self.state.admit_submission(project_id, text) {
            tracing::debug!(project_id = %project_id, ?rejection, "submission rejected");
            return SubmitOutcome::Rejected(rejection);
        }
        let result = self.gateway.continue_chat(project_id, text).await;
        self.state.complete_submission(result)
    }

    /// Validate the form, create and initialize the project, and enter it.
    pub async fn create_project(&mut self, form: &NewProjectForm) -> Result<ProjectId, CreateProjectError> {
        let result = match form.validate() {
            Ok(project) => create_and_initialize(&self.gateway, &project).await,
            Err(err) => Err(err.into()),
        };
        self.state.complete_creation(&result);
        result
    }

    /// Render the current page. The liveness probe is answered before the
    /// session is looked at.
    pub async fn render<'a, I>(&mut self, signals: I, last_typed: &str) -> PageView
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let Some(ack) = render::liveness_probe(signals) {
            return PageView::Alive(ack);
        }
        let request = render::page_request(&self.state);
        let data = render::fetch_page(&self.gateway, &request).await;
        render::compose(&mut self.state, data, last_typed)
    }
}
