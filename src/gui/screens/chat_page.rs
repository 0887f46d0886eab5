use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, row, text, text_input},
};

use crate::{
    charts::ChartColor,
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets,
    },
    models::ProjectId,
    navigation::Intent,
    render::{self, ChatPageView, ConversationPanel, TabView},
    session::{SubmitOutcome, SubmitRejection},
    state::Tab,
};

#[derive(Debug, Clone)]
pub struct ChatPageScreen {
    view: ChatPageView,
    draft: String,
    sending: bool,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ChatPageMessage {
    Back,
    SelectTab(Tab),
    DraftChanged(String),
    Send,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Navigate(Intent),
    Submit { project_id: ProjectId, text: String },
}

impl ChatPageScreen {
    /// `previous_draft` is kept while the page has no writable input, so the
    /// text survives a trip through the visualization tab.
    pub fn new(view: ChatPageView, previous_draft: &str) -> Self {
        let draft = match &view.content {
            TabView::Chat(ConversationPanel::Active { input_default, .. }) => input_default.clone(),
            _ => previous_draft.to_string(),
        };
        Self {
            view,
            draft,
            sending: false,
            error: None,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.view.project_id
    }

    pub fn finish_send(&mut self, outcome: &SubmitOutcome) {
        self.sending = false;
        self.error = match outcome {
            SubmitOutcome::Sent { .. } | SubmitOutcome::Rejected(SubmitRejection::EmptyMessage) => None,
            SubmitOutcome::Rejected(SubmitRejection::ReadOnly) => Some(render::READ_ONLY_NOTICE.to_string()),
            SubmitOutcome::Failed(err) => Some(format!("Error sending message: {err}")),
        };
    }

    fn chat_input(&self) -> Element<'_, ScreenMessage<Self>> {
        let input = text_input("Ask about project risks...", &self.draft)
            .on_input(|draft| ScreenMessage::ScreenMessage(ChatPageMessage::DraftChanged(draft)));
        let (input, send) = if self.sending {
            (input, button("Sending..."))
        } else {
            (
                input.on_submit(ScreenMessage::ScreenMessage(ChatPageMessage::Send)),
                button("Send").on_press(ScreenMessage::ScreenMessage(ChatPageMessage::Send)),
            )
        };
        row![input, send].spacing(10).align_y(Center).into()
    }
}

impl Screen for ChatPageScreen {
    type Message = ChatPageMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let header = row![
            button("← Back to Projects").on_press(ScreenMessage::ScreenMessage(ChatPageMessage::Back)),
            column![
                text(self.view.title.as_str()).size(28),
                text(format!("Project ID: {}", self.view.project_id)).size(12),
            ]
            .width(Length::Fill),
        ]
        .spacing(20)
        .align_y(Center);

        let tabs = widgets::tab_bar(self.view.tab, |tab| {
            ScreenMessage::ScreenMessage(ChatPageMessage::SelectTab(tab))
        });

        let mut main = column![widgets::errors(&self.view.errors)].spacing(10);
        if let Some(error) = &self.error {
            main = main.push(text(error.as_str()).color(widgets::chart_color(ChartColor::Red)));
        }
        main = match &self.view.content {
            TabView::Chat(panel) => {
                let main = main.push(widgets::conversation(panel));
                if panel.is_writable() {
                    main.push(self.chat_input())
                } else {
                    main
                }
            }
            TabView::Visualization(dashboard) => main.push(widgets::dashboard(dashboard)),
        };

        widgets::layout(header, tabs, main)
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            ChatPageMessage::Back => Task::done(ScreenMessage::ParentMessage(ParentMessage::Navigate(
                Intent::GoToLanding,
            ))),
            ChatPageMessage::SelectTab(tab) => Task::done(ScreenMessage::ParentMessage(
                ParentMessage::Navigate(Intent::SwitchTab(tab)),
            )),
            ChatPageMessage::DraftChanged(draft) => {
                self.draft = draft;
                Task::none()
            }
            ChatPageMessage::Send => {
                self.sending = true;
                self.error = None;
                Task::done(ScreenMessage::ParentMessage(ParentMessage::Submit {
                    project_id: self.view.project_id.clone(),
                    text: self.draft.clone(),
                }))
            }
        }
    }
}
