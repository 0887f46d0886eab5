use std::path::PathBuf;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{Column, button, column, container, row, scrollable, text, text_input},
};
use iced_widget::container::bordered_box;
use rfd::AsyncFileDialog;

use crate::{
    error::CreateProjectError,
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets,
    },
    models::{FileRole, ProjectId, Upload},
    navigation::Intent,
    render::LandingView,
    session::{NewProjectForm, ValidatedProject},
};

#[derive(Debug, Clone)]
pub struct LandingPageScreen {
    view: LandingView,
    form: NewProjectForm,
    creating: bool,
    error: Option<String>,
    notice: Option<String>,
}

#[derive(Debug, Clone)]
pub enum LandingPageMessage {
    ToggleAddProject,
    NameChanged(String),
    PickFile(FileRole),
    FilePicked(FileRole, PathBuf),
    GetStarted,
    ViewProject(ProjectId),
    None,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Navigate(Intent),
    CreateProject(ValidatedProject),
}

impl LandingPageScreen {
    pub fn new(view: LandingView) -> Self {
        Self {
            view,
            form: NewProjectForm::default(),
            creating: false,
            error: None,
            notice: None,
        }
    }

    pub fn set_view(&mut self, view: LandingView) {
        self.view = view;
    }

    /// Reflect the outcome of a creation started from this screen. On
    /// failure the form is kept so the user can retry.
    pub fn finish_creation(&mut self, result: &Result<ProjectId, CreateProjectError>) {
        self.creating = false;
        match result {
            Ok(id) => {
                self.form = NewProjectForm::default();
                self.error = None;
                self.notice = Some(format!("Project created successfully! (Project ID: {id})"));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    fn file_row(&self, role: FileRole) -> Element<'_, ScreenMessage<Self>> {
        let chosen = self
            .form
            .upload(role)
            .map_or("No file selected", |upload| upload.file_name.as_str());
        row![
            text(role.label()).width(Length::FillPortion(2)),
            text(chosen).width(Length::FillPortion(2)),
            button("Browse…").on_press(ScreenMessage::ScreenMessage(LandingPageMessage::PickFile(role))),
        ]
        .spacing(10)
        .align_y(Center)
        .into()
    }

    fn add_project_form(&self) -> Element<'_, ScreenMessage<Self>> {
        let mut form = column![
            text("Create New Project").size(20),
            text_input("Project name", &self.form.name)
                .on_input(|name| ScreenMessage::ScreenMessage(LandingPageMessage::NameChanged(name))),
        ]
        .spacing(10);
        for role in FileRole::ALL {
            form = form.push(self.file_row(role));
        }
        let submit = if self.creating {
            button("Creating project and initializing chat…")
        } else {
            button("Get Started").on_press(ScreenMessage::ScreenMessage(LandingPageMessage::GetStarted))
        };
        container(form.push(submit))
            .style(bordered_box)
            .padding(10)
            .into()
    }
}

impl Screen for LandingPageScreen {
    type Message = LandingPageMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let toggle_label = if self.view.show_add_project_form {
            "Cancel"
        } else {
            "+ Add Project"
        };
        let mut content = column![
            text("AgentVerse").size(32),
            text("Project Risk Management Dashboard"),
            widgets::errors(&self.view.errors),
            button(toggle_label).on_press(ScreenMessage::ScreenMessage(LandingPageMessage::ToggleAddProject)),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Center);

        if self.view.show_add_project_form {
            content = content.push(self.add_project_form());
        }
        if let Some(error) = &self.error {
            content = content.push(text(error.as_str()).color(widgets::chart_color(crate::charts::ChartColor::Red)));
        }
        if let Some(notice) = &self.notice {
            content = content.push(text(notice.as_str()));
        }

        content = content.push(text("Your Projects").size(24));
        if let Some(notice) = self.view.empty_notice {
            content = content.push(text(notice));
        }
        let projects = Column::with_children(self.view.projects.iter().map(|project| {
            container(
                row![
                    column![
                        text(project.display_name()).size(18),
                        text(format!("Project ID: {}", project.id)).size(12),
                    ]
                    .width(Length::Fill),
                    button("View").on_press(ScreenMessage::ScreenMessage(LandingPageMessage::ViewProject(
                        project.id.clone(),
                    ))),
                ]
                .align_y(Center),
            )
            .style(bordered_box)
            .padding(10)
            .into()
        }))
        .spacing(10);

        container(scrollable(content.push(projects)))
            .center_x(Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            LandingPageMessage::ToggleAddProject => {
                self.error = None;
                Task::done(ScreenMessage::ParentMessage(ParentMessage::Navigate(
                    Intent::ToggleAddProjectForm,
                )))
            }
            LandingPageMessage::NameChanged(name) => {
                self.form.name = name;
                Task::none()
            }
            LandingPageMessage::PickFile(role) => Task::perform(
                AsyncFileDialog::new()
                    .set_title(role.label())
                    .add_filter("CSV", &["csv"])
                    .pick_file(),
                move |handle| match handle {
                    Some(data) => ScreenMessage::ScreenMessage(LandingPageMessage::FilePicked(
                        role,
                        data.path().to_path_buf(),
                    )),
                    None => ScreenMessage::ScreenMessage(LandingPageMessage::None),
                },
            ),
            LandingPageMessage::FilePicked(role, path) => {
                match Upload::from_path(&path) {
                    Ok(upload) => self.form.set_upload(role, Some(upload)),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "could not read selected file");
                        self.error = Some(format!("Could not read {}: {err}", path.display()));
                    }
                }
                Task::none()
            }
            LandingPageMessage::GetStarted => match self.form.validate() {
                Ok(project) => {
                    self.creating = true;
                    self.error = None;
                    self.notice = None;
                    Task::done(ScreenMessage::ParentMessage(ParentMessage::CreateProject(project)))
                }
                Err(err) => {
                    self.error = Some(err.to_string());
                    Task::none()
                }
            },
            LandingPageMessage::ViewProject(id) => Task::done(ScreenMessage::ParentMessage(
                ParentMessage::Navigate(Intent::ViewProject(id)),
            )),
            LandingPageMessage::None => Task::none(),
        }
    }
}
