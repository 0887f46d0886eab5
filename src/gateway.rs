//! Typed access to the remote analysis service.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{ChatEntry, ChatUploads, FileRole, Project, ProjectId};

/// Reply to a chat continuation, as the service sent it.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Text(String),
    Structured(Value),
}

impl ChatReply {
    /// Collapse either shape into the string shown to the user.
    pub fn display_text(&self) -> String {
        match self {
            ChatReply::Text(text) => text.clone(),
            ChatReply::Structured(Value::String(text)) => text.clone(),
            ChatReply::Structured(Value::Object(fields)) => ["response", "text", "message", "reply"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(fields.clone()).to_string()),
            ChatReply::Structured(other) => other.to_string(),
        }
    }

    /// Parse a response body that did not declare itself as plain text.
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => ChatReply::Structured(value),
            Err(_) => ChatReply::Text(body),
        }
    }
}

/// The operations the client needs from the analysis service.
pub trait BackendGateway {
    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>, ClientError>> + Send;
    fn create_project(&self, name: &str) -> impl Future<Output = Result<Project, ClientError>> + Send;
    fn init_chat(
        &self,
        project_id: &ProjectId,
        uploads: &ChatUploads,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
    fn continue_chat(
        &self,
        project_id: &ProjectId,
        text: &str,
    ) -> impl Future<Output = Result<ChatReply, ClientError>> + Send;
    fn get_chat_history(
        &self,
        project_id: &ProjectId,
    ) -> impl Future<Output = Result<Vec<ChatEntry>, ClientError>> + Send;
}

#[derive(Serialize)]
struct CreateProjectRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ContinueChatRequest<'a> {
    text: &'a str,
}

/// [`BackendGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("agentverse/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Map a non-success status to [`ClientError::Server`].
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "analysis service returned an error");
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

/// Read a chat reply. A `text/plain` body is taken verbatim, anything else
/// is tried as JSON first.
async fn read_reply(resp: reqwest::Response) -> Result<ChatReply, ClientError> {
    let resp = check_response(resp).await?;
    let plain = is_plain_text(&resp);
    let body = resp.text().await?;
    Ok(if plain {
        ChatReply::Text(body)
    } else {
        ChatReply::from_body(body)
    })
}

fn is_plain_text(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/plain"))
}

impl BackendGateway for HttpGateway {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let url = self.config.endpoint("/projects/");
        tracing::debug!(%url, "listing projects");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn create_project(&self, name: &str) -> Result<Project, ClientError> {
        let url = self.config.endpoint("/projects/");
        tracing::debug!(%url, name, "creating project");
        let resp = self
            .http
            .post(&url)
            .json(&CreateProjectRequest { name })
            .send()
            .await?;
        let project: Project = check_response(resp).await?.json().await?;
        tracing::info!(project_id = %project.id, "project created");
        Ok(project)
    }

    async fn init_chat(
        &self,
        project_id: &ProjectId,
        uploads: &ChatUploads,
    ) -> Result<(), ClientError> {
        let url = self.config.endpoint(&format!("/chat/init/{project_id}"));
        let mut form = Form::new();
        for role in FileRole::ALL {
            let upload = uploads.get(role);
            let part = Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone())
                .mime_str("text/csv")?;
            form = form.part(role.field_name(), part);
        }
        tracing::debug!(%url, "uploading chat inputs");
        check_response(self.http.post(&url).multipart(form).send().await?).await?;
        Ok(())
    }

    async fn continue_chat(&self, project_id: &ProjectId, text: &str) -> Result<ChatReply, ClientError> {
        let url = self.config.endpoint(&format!("/chat/continue/{project_id}"));
        tracing::debug!(%url, "continuing chat");
        let resp = self
            .http
            .post(&url)
            .json(&ContinueChatRequest { text })
            .send()
            .await?;
        read_reply(resp).await
    }

    async fn get_chat_history(&self, project_id: &ProjectId) -> Result<Vec<ChatEntry>, ClientError> {
        let url = self.config.endpoint(&format!("/chats/{project_id}"));
        tracing::debug!(%url, "fetching chat history");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }
}
