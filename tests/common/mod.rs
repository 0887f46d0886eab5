mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from agentverse for tests
pub use agentverse::render::{self, ConversationPanel, PageView, TabView};
pub use agentverse::{
    BackendGateway, ChatEntry, ChatReply, ChatSession, ClientError, FileRole, Intent,
    NewProjectForm, Page, Project, ProjectId, SubmitOutcome, SubmitRejection, Tab, Upload,
};
