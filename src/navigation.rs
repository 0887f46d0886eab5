//! Transitions over [`SessionState`].
//!
//! Every transition is total and schedules a full re-render.

use crate::models::ProjectId;
use crate::state::{Page, SessionState, Tab};

/// A navigation request coming from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    GoToLanding,
    ViewProject(ProjectId),
    ToggleAddProjectForm,
    SwitchTab(Tab),
}

impl SessionState {
    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::GoToLanding => self.go_to_landing(),
            Intent::ViewProject(id) => self.view_project(id),
            Intent::ToggleAddProjectForm => self.toggle_add_project_form(),
            Intent::SwitchTab(tab) => self.switch_tab(tab),
        }
    }

    /// Back to the project list. The current and active ids are kept.
    pub fn go_to_landing(&mut self) {
        tracing::debug!("navigate: landing");
        self.page = Page::Landing;
        self.schedule_render();
    }

    /// Open an existing project. Its conversation is read-only unless it is
    /// already the active project.
    pub fn view_project(&mut self, id: ProjectId) {
        tracing::debug!(project_id = %id, "navigate: view project");
        self.page = Page::Chat;
        self.current_project_id = Some(id);
        self.schedule_render();
    }

    /// Open a project that was just created and initialized in this session
    /// and make it the one writable conversation.
    pub fn enter_new_project(&mut self, id: ProjectId) {
        tracing::info!(project_id = %id, "navigate: enter new project");
        self.page = Page::Chat;
        self.current_project_id = Some(id.clone());
        self.active_project_id = Some(id);
        self.show_add_project_form = false;
        self.schedule_render();
    }

    pub fn toggle_add_project_form(&mut self) {
        self.show_add_project_form = !self.show_add_project_form;
        self.schedule_render();
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        tracing::debug!(tab = tab.label(), "navigate: switch tab");
        self.current_tab = tab;
        self.schedule_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ProjectId {
        ProjectId::new(raw)
    }

    #[test]
    fn viewing_never_activates() {
        let mut state = SessionState::new();
        state.view_project(id("old"));
        assert_eq!(state.page(), Page::Chat);
        assert_eq!(state.current_project_id(), Some(&id("old")));
        assert_eq!(state.active_project_id(), None);
        assert!(!state.is_active(&id("old")));
    }

    #[test]
    fn entering_a_new_project_activates_it() {
        let mut state = SessionState::new();
        state.toggle_add_project_form();
        state.enter_new_project(id("p1"));
        assert_eq!(state.page(), Page::Chat);
        assert_eq!(state.current_project_id(), Some(&id("p1")));
        assert!(state.is_active(&id("p1")));
        assert!(!state.show_add_project_form());
    }

    #[test]
    fn revisiting_after_creation_keeps_single_active_id() {
        let mut state = SessionState::new();
        state.enter_new_project(id("p1"));
        state.go_to_landing();
        state.view_project(id("p2"));
        assert!(!state.is_active(&id("p2")));
        state.go_to_landing();
        state.view_project(id("p1"));
        assert!(state.is_active(&id("p1")));
        assert_eq!(state.active_project_id(), Some(&id("p1")));
    }

    #[test]
    fn landing_keeps_project_ids() {
        let mut state = SessionState::new();
        state.enter_new_project(id("p1"));
        state.go_to_landing();
        assert_eq!(state.page(), Page::Landing);
        assert_eq!(state.current_project_id(), Some(&id("p1")));
        assert_eq!(state.active_project_id(), Some(&id("p1")));
    }

    #[test]
    fn every_transition_schedules_a_render() {
        let mut state = SessionState::new();
        let intents = [
            Intent::ToggleAddProjectForm,
            Intent::ToggleAddProjectForm,
            Intent::ViewProject(id("p3")),
            Intent::SwitchTab(Tab::Visualization),
            Intent::GoToLanding,
        ];
        for (n, intent) in intents.into_iter().enumerate() {
            state.dispatch(intent);
            assert_eq!(state.render_epoch(), n as u64 + 1);
        }
        assert_eq!(state.current_tab(), Tab::Visualization);
        assert!(!state.show_add_project_form());
    }
}
