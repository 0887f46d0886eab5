use iced::Task;

use crate::gateway::HttpGateway;
use crate::gui::Message;
use crate::render;
use crate::state::SessionState;

/// Session plus the backend it talks to. Screens only hold view data and
/// widget buffers; everything that decides navigation lives here.
#[derive(Debug)]
pub struct AppState {
    pub session: SessionState,
    pub gateway: HttpGateway,
}

impl AppState {
    pub fn new(gateway: HttpGateway) -> Self {
        Self {
            session: SessionState::new(),
            gateway,
        }
    }

    /// Whether a load requested at `epoch` still matches the session.
    pub fn is_current(&self, epoch: u64) -> bool {
        epoch == self.session.render_epoch()
    }

    /// Fetch what the current page needs. The result is tagged with the
    /// render epoch it was requested for, so a load overtaken by a later
    /// transition can be dropped.
    pub fn load_page(&self) -> Task<Message> {
        let epoch = self.session.render_epoch();
        let request = render::page_request(&self.session);
        let gateway = self.gateway.clone();
        Task::perform(
            async move { render::fetch_page(&gateway, &request).await },
            move |data| Message::PageLoaded { epoch, data },
        )
    }
}
