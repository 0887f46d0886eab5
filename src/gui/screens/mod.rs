pub mod chat_page;
pub mod landing_page;
pub mod loading_page;

use iced::{Element, Task};

use crate::{
    gui::{AppState, Message},
    render::{self, PageView},
    session,
};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug + Clone;
    type ParentMessage: std::fmt::Debug + Clone;
    fn view(&self) -> Element<'_, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    LoadingPage(loading_page::LoadingPageScreen),
    LandingPage(landing_page::LandingPageScreen),
    ChatPage(chat_page::ChatPageScreen),
}

impl ScreenData {
    /// What the user has typed into the chat box, if it is on screen.
    fn draft(&self) -> &str {
        match self {
            ScreenData::ChatPage(page) => page.draft(),
            _ => "",
        }
    }

    /// Swap in the screen for a freshly composed page, keeping the landing
    /// form when the landing page is simply redrawn.
    fn show(&mut self, view: PageView) {
        match (&mut *self, view) {
            (ScreenData::LandingPage(page), PageView::Landing(view)) => page.set_view(view),
            (_, PageView::Landing(view)) => {
                *self = ScreenData::LandingPage(landing_page::LandingPageScreen::new(view));
            }
            (_, PageView::Chat(view)) => {
                let kept = match &*self {
                    ScreenData::ChatPage(page) if page.project_id() == &view.project_id => page.draft().to_string(),
                    _ => String::new(),
                };
                *self = ScreenData::ChatPage(chat_page::ChatPageScreen::new(view, &kept));
            }
            (_, PageView::Alive(_)) => *self = ScreenData::LoadingPage(loading_page::LoadingPageScreen),
        }
    }
}

fn reload(state: &AppState) -> Task<ScreenMessage<ScreenData>> {
    state.load_page().map(ScreenMessage::ScreenMessage)
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;
    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        match self {
            ScreenData::LoadingPage(screen) => screen.view().map(|message| match message {
                ScreenMessage::ScreenMessage(never) | ScreenMessage::ParentMessage(never) => {
                    match never {}
                }
            }),
            ScreenData::LandingPage(screen) => screen.view().map(Message::LandingPage),
            ScreenData::ChatPage(screen) => screen.view().map(Message::ChatPage),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (x, Message::PageLoaded { epoch, data }) => {
                if !state.is_current(epoch) {
                    tracing::debug!(epoch, "dropping stale page load");
                    return Task::none();
                }
                let draft = x.draft().to_string();
                let view = render::compose(&mut state.session, data, &draft);
                x.show(view);
                Task::none()
            }
            (x, Message::ProjectCreated(result)) => {
                state.session.complete_creation(&result);
                if let ScreenData::LandingPage(page) = x {
                    page.finish_creation(&result);
                }
                match result {
                    Ok(_) => reload(state),
                    Err(_) => Task::none(),
                }
            }
            (x, Message::MessageSent(result)) => {
                let outcome = state.session.complete_submission(result);
                if let ScreenData::ChatPage(page) = x {
                    page.finish_send(&outcome);
                }
                match outcome {
                    session::SubmitOutcome::Sent { .. } => reload(state),
                    _ => Task::none(),
                }
            }
            (ScreenData::LandingPage(page), Message::LandingPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::LandingPage)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(parent_msg) => match parent_msg {
                    landing_page::ParentMessage::Navigate(intent) => {
                        state.session.dispatch(intent);
                        reload(state)
                    }
                    landing_page::ParentMessage::CreateProject(project) => {
                        let gateway = state.gateway.clone();
                        Task::perform(
                            async move { session::create_and_initialize(&gateway, &project).await },
                            |result| ScreenMessage::ScreenMessage(Message::ProjectCreated(result)),
                        )
                    }
                },
            },
            (ScreenData::ChatPage(page), Message::ChatPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::ChatPage)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(parent_msg) => match parent_msg {
                    chat_page::ParentMessage::Navigate(intent) => {
                        state.session.dispatch(intent);
                        reload(state)
                    }
                    chat_page::ParentMessage::Submit { project_id, text } => {
                        if let Err(rejection) = state.session.admit_submission(&project_id, &text) {
                            tracing::debug!(?rejection, "submission rejected");
                            page.finish_send(&session::SubmitOutcome::Rejected(rejection));
                            return Task::none();
                        }
                        let gateway = state.gateway.clone();
                        Task::perform(
                            async move {
                                use crate::gateway::BackendGateway;
                                gateway.continue_chat(&project_id, &text).await
                            },
                            |result| ScreenMessage::ScreenMessage(Message::MessageSent(result)),
                        )
                    }
                },
            },
            _ => Task::none(),
        }
    }
}
