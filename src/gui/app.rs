use iced::{Element, Task};

use crate::config::ClientConfig;
use crate::gateway::HttpGateway;
use crate::gui::{
    AppState, Message,
    screens::{Screen, ScreenData, ScreenMessage, loading_page::LoadingPageScreen},
};

pub struct AgentverseApp {
    screen: ScreenData,
    state: AppState,
}

impl AgentverseApp {
    pub fn new(gateway: HttpGateway) -> (Self, Task<Message>) {
        let state = AppState::new(gateway);
        let first_load = state.load_page();
        (
            Self {
                screen: ScreenData::LoadingPage(LoadingPageScreen),
                state,
            },
            first_load,
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        self.screen
            .update(message, &mut self.state)
            .map(into_app_message)
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.screen.view().map(into_app_message)
    }
}

fn into_app_message(message: ScreenMessage<ScreenData>) -> Message {
    match message {
        ScreenMessage::ScreenMessage(message) => message,
        ScreenMessage::ParentMessage(never) => match never {},
    }
}

/// Open the desktop dashboard and block until its window closes.
pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let gateway = HttpGateway::new(config)?;
    tracing::info!(base_url = %gateway.config().base_url, "starting dashboard");
    iced::application(
        move || AgentverseApp::new(gateway.clone()),
        AgentverseApp::update,
        AgentverseApp::view,
    )
    .title("AgentVerse")
    .run()
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {}", e))
}
