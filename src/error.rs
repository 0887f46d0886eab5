//! Error types surfaced to the user.
//!
//! Nothing here is fatal: every variant renders as a message and the session
//! stays usable.

use thiserror::Error;

use crate::models::{FileRole, ProjectId};

/// Failure of a call to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport or connection failure.
    #[error("error connecting to API: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("server returned status {status}: {body}")]
    Server {
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("unexpected response from API: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Server {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Form input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a project name")]
    MissingName,

    #[error("Please upload all required files (missing: {})", list_roles(.0))]
    MissingFiles(Vec<FileRole>),
}

fn list_roles(roles: &[FileRole]) -> String {
    roles
        .iter()
        .map(|role| role.field_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure of the create-then-initialize sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateProjectError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error creating project: {0}")]
    Create(#[source] ClientError),

    /// The project exists on the backend but its conversation was never
    /// initialized. It is not rolled back.
    #[error("Project {project_id} was created but chat initialization failed: {source}")]
    Init {
        project_id: ProjectId,
        #[source]
        source: ClientError,
    },
}

impl CreateProjectError {
    /// Id of a project left on the backend without a conversation, if any.
    pub fn orphaned_project(&self) -> Option<&ProjectId> {
        match self {
            CreateProjectError::Init { project_id, .. } => Some(project_id),
            _ => None,
        }
    }
}
