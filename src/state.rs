use crate::models::ProjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Landing,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Visualization,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Chat, Tab::Visualization];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Visualization => "Visualization",
        }
    }
}

/// Everything the client remembers for one user session.
///
/// Fields are only changed by the navigation transitions and the chat
/// workflows, so the invariants below hold after every call:
/// - `active_project_id` is only set by [`SessionState::enter_new_project`];
/// - `page == Page::Chat` implies `current_project_id` is set;
/// - the clear-input flag survives at most one render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub(crate) page: Page,
    pub(crate) current_project_id: Option<ProjectId>,
    pub(crate) active_project_id: Option<ProjectId>,
    pub(crate) current_tab: Tab,
    pub(crate) show_add_project_form: bool,
    pub(crate) clear_input_on_next_render: bool,
    pub(crate) render_epoch: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn current_project_id(&self) -> Option<&ProjectId> {
        self.current_project_id.as_ref()
    }

    pub fn active_project_id(&self) -> Option<&ProjectId> {
        self.active_project_id.as_ref()
    }

    pub fn current_tab(&self) -> Tab {
        self.current_tab
    }

    pub fn show_add_project_form(&self) -> bool {
        self.show_add_project_form
    }

    pub fn clear_input_pending(&self) -> bool {
        self.clear_input_on_next_render
    }

    /// Number of full re-renders scheduled so far. Presentations compare it to
    /// drop page loads that a later transition has made stale.
    pub fn render_epoch(&self) -> u64 {
        self.render_epoch
    }

    /// Whether the conversation of `project_id` accepts new messages.
    pub fn is_active(&self, project_id: &ProjectId) -> bool {
        self.active_project_id.as_ref() == Some(project_id)
    }

    /// Take the one-shot clear flag. Call once per render, before the input
    /// box is built.
    pub fn consume_clear_flag(&mut self) -> bool {
        std::mem::take(&mut self.clear_input_on_next_render)
    }

    /// Default value for the chat input on this render: empty right after a
    /// successful send, otherwise whatever the user last typed.
    pub fn input_default(&mut self, last_typed: &str) -> String {
        if self.consume_clear_flag() {
            String::new()
        } else {
            last_typed.to_string()
        }
    }

    pub(crate) fn request_clear_input(&mut self) {
        self.clear_input_on_next_render = true;
    }

    pub(crate) fn schedule_render(&mut self) {
        self.render_epoch += 1;
    }
}
