pub mod charts;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod navigation;
pub mod render;
pub mod session;
pub mod state;
pub mod timestamp;

pub use charts::{Dashboard, DashboardData};
pub use config::ClientConfig;
pub use error::{ClientError, CreateProjectError, ValidationError};
pub use gateway::{BackendGateway, ChatReply, HttpGateway};
pub use models::{ChatEntry, FileRole, Project, ProjectId, RiskRecord, Severity, Upload};
pub use navigation::Intent;
pub use render::PageView;
pub use session::{ChatSession, NewProjectForm, SubmitOutcome, SubmitRejection};
pub use state::{Page, SessionState, Tab};

#[cfg(feature = "gui")]
pub mod gui;
