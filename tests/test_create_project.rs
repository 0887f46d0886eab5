mod common;

use std::io::Write;

use agentverse::{CreateProjectError, ValidationError};
use common::*;

#[tokio::test]
async fn test_invalid_form_never_reaches_backend() -> anyhow::Result<()> {
    let mut session = ChatSession::new(RecordingGateway::new());
    let before = session.state().clone();

    let blank = complete_form("  ");
    let err = session.create_project(&blank).await.unwrap_err();
    assert!(matches!(err, CreateProjectError::Validation(ValidationError::MissingName)));

    let partial = NewProjectForm::new("Alpha").with_upload(FileRole::Employee, csv_upload("e.csv"));
    let err = session.create_project(&partial).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Please upload all required files (missing: project_file, financial_file)"
    );

    assert!(session.gateway().calls().is_empty());
    assert_eq!(session.state(), &before);

    Ok(())
}

#[tokio::test]
async fn test_init_failure_leaves_session_on_landing() -> anyhow::Result<()> {
    let mut session = ChatSession::new(RecordingGateway::new().failing_init());

    let err = session.create_project(&complete_form("Alpha")).await.unwrap_err();

    assert_eq!(err.orphaned_project(), Some(&ProjectId::new("p1")));
    assert_eq!(session.state().page(), Page::Landing);
    assert_eq!(session.state().active_project_id(), None);
    assert_eq!(session.state().current_project_id(), None);
    // No rollback: the project stays on the backend.
    assert_eq!(session.gateway().project_ids(), vec![ProjectId::new("p1")]);
    assert_eq!(
        session.gateway().calls(),
        vec![
            Call::CreateProject("Alpha".to_string()),
            Call::InitChat(ProjectId::new("p1")),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_create_failure_skips_init() -> anyhow::Result<()> {
    let mut session = ChatSession::new(RecordingGateway::new().failing_create());

    let err = session.create_project(&complete_form("Alpha")).await.unwrap_err();

    assert!(matches!(err, CreateProjectError::Create(ClientError::Server { status: 503, .. })));
    assert_eq!(err.orphaned_project(), None);
    assert_eq!(session.gateway().calls(), vec![Call::CreateProject("Alpha".to_string())]);
    assert_eq!(session.state().page(), Page::Landing);

    Ok(())
}

#[tokio::test]
async fn test_create_chat_and_visualize() -> anyhow::Result<()> {
    let mut session = ChatSession::new(RecordingGateway::new());
    let p1 = ProjectId::new("p1");

    let created = session.create_project(&complete_form("Alpha")).await?;
    assert_eq!(created, p1);
    assert_eq!(session.state().page(), Page::Chat);
    assert_eq!(session.state().current_project_id(), Some(&p1));
    assert_eq!(session.state().active_project_id(), Some(&p1));

    let page = session.render(render::NO_SIGNALS, "").await;
    let PageView::Chat(view) = &page else {
        panic!("expected chat page");
    };
    assert_eq!(view.title, "Alpha");
    let panel = chat_panel(&page);
    assert!(panel.is_writable());
    assert_eq!(panel.heading(), "Project Risk Analysis");
    assert!(panel.bubbles().is_empty());

    let outcome = session.submit(&p1, "What is the top risk?").await;
    assert!(matches!(outcome, SubmitOutcome::Sent { .. }));

    let page = session.render(render::NO_SIGNALS, "What is the top risk?").await;
    let bubbles = chat_panel(&page).bubbles();
    assert_eq!(bubbles.len(), 2);
    assert_eq!(bubbles[0].text, "What is the top risk?");
    assert_eq!(bubbles[1].text, "Analysis of: What is the top risk?");
    assert_eq!(input_default(&page), "");

    session.gateway().clear_calls();
    session.navigate(Intent::SwitchTab(Tab::Visualization));
    let page = session.render(render::NO_SIGNALS, "").await;
    let PageView::Chat(view) = page else {
        panic!("expected chat page");
    };
    let TabView::Visualization(dashboard) = view.content else {
        panic!("expected visualization tab");
    };
    assert_eq!(dashboard.health.value, 65);
    assert!(!dashboard.breakdown.slices.is_empty());
    assert_eq!(dashboard.trend.series.len(), 4);
    // Charts come from local data; only the project list is fetched.
    assert_eq!(session.gateway().calls(), vec![Call::ListProjects]);

    Ok(())
}

#[test]
fn test_upload_from_path() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(b"employee_id,name\n1,Ada\n")?;

    let upload = Upload::from_path(file.path())?;

    assert!(upload.file_name.ends_with(".csv"));
    assert_eq!(upload.bytes, b"employee_id,name\n1,Ada\n");

    Ok(())
}
