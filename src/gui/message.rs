use crate::{
    error::{ClientError, CreateProjectError},
    gateway::ChatReply,
    gui::screens::{ScreenMessage, chat_page::ChatPageScreen, landing_page::LandingPageScreen},
    models::ProjectId,
    render::PageData,
};

#[derive(Debug, Clone)]
pub enum Message {
    LandingPage(ScreenMessage<LandingPageScreen>),
    ChatPage(ScreenMessage<ChatPageScreen>),
    PageLoaded { epoch: u64, data: PageData },
    ProjectCreated(Result<ProjectId, CreateProjectError>),
    MessageSent(Result<ChatReply, ClientError>),
}
