use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use agentverse::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use agentverse::render::{self, ChatBubble, ConversationPanel, PageView, Speaker, TabView};
use agentverse::{
    ChatSession, ClientConfig, Dashboard, DashboardData, FileRole, HttpGateway, Intent,
    NewProjectForm, ProjectId, SubmitOutcome, SubmitRejection, Upload,
};

#[derive(Parser)]
#[command(name = "agentverse")]
#[command(about = "Project risk dashboard client for the AgentVerse analysis service")]
struct Cli {
    /// Root URL of the analysis service
    #[arg(long, env = "AGENTVERSE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "AGENTVERSE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer the liveness probe and exit
    Ping,

    /// List projects
    Projects,

    /// Show the chat history of an existing project (read-only)
    History {
        #[arg(value_name = "PROJECT_ID")]
        project_id: String,
    },

    /// Create a project from three CSV files, then chat about its risks
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        /// Employee data (CSV)
        #[arg(long, value_name = "CSV")]
        employee: Option<PathBuf>,

        /// Project data (CSV)
        #[arg(long, value_name = "CSV")]
        project: Option<PathBuf>,

        /// Financial data (CSV)
        #[arg(long, value_name = "CSV")]
        financial: Option<PathBuf>,
    },

    /// Print the visualization charts as JSON
    Dashboard,

    /// Open the desktop dashboard (default)
    #[cfg(feature = "gui")]
    Gui,
}

fn main() -> anyhow::Result<()> {
    let Cli {
        base_url,
        timeout_secs,
        verbose,
        quiet,
        command,
    } = Cli::parse();

    let start = || -> anyhow::Result<ClientConfig> {
        init_tracing(quiet, verbose)?;
        let config = ClientConfig::new(&base_url).with_timeout(Duration::from_secs(timeout_secs));
        if verbose {
            println!("Using analysis service at {}", config.base_url);
        }
        Ok(config)
    };

    match command {
        // The probe is answered before any session or logging exists.
        Some(Command::Ping) => {
            println!("{}", render::PING_ACK);
            Ok(())
        }
        Some(Command::Dashboard) => {
            start()?;
            let dashboard = Dashboard::build(&DashboardData::sample());
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            Ok(())
        }
        Some(Command::Projects) => block_on(list_projects(start()?)),
        Some(Command::History { project_id }) => block_on(show_history(start()?, ProjectId::new(project_id))),
        Some(Command::Create {
            name,
            employee,
            project,
            financial,
        }) => {
            let config = start()?;
            let mut form = NewProjectForm::new(name);
            for (role, path) in [
                (FileRole::Employee, employee),
                (FileRole::Project, project),
                (FileRole::Financial, financial),
            ] {
                if let Some(path) = path {
                    let upload = Upload::from_path(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    form.set_upload(role, Some(upload));
                }
            }
            block_on(create_and_chat(config, form))
        }
        #[cfg(feature = "gui")]
        Some(Command::Gui) | None => agentverse::gui::run(start()?),
        #[cfg(not(feature = "gui"))]
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("AGENTVERSE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn block_on<F: std::future::Future<Output = anyhow::Result<()>>>(future: F) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?
        .block_on(future)
}

async fn list_projects(config: ClientConfig) -> anyhow::Result<()> {
    let mut session = ChatSession::new(HttpGateway::new(config)?);
    match session.render(render::NO_SIGNALS, "").await {
        PageView::Landing(view) => {
            print_errors(&view.errors);
            if let Some(notice) = view.empty_notice {
                println!("{notice}");
            }
            println!("=== Your Projects ===");
            for project in &view.projects {
                println!("  {}  (Project ID: {})", project.display_name(), project.id);
            }
        }
        other => {
            print_page(&other, 0);
        }
    }
    Ok(())
}

async fn show_history(config: ClientConfig, project_id: ProjectId) -> anyhow::Result<()> {
    let mut session = ChatSession::new(HttpGateway::new(config)?);
    session.navigate(Intent::ViewProject(project_id));
    let page = session.render(render::NO_SIGNALS, "").await;
    print_page(&page, 0);
    Ok(())
}

async fn create_and_chat(config: ClientConfig, form: NewProjectForm) -> anyhow::Result<()> {
    let mut session = ChatSession::new(HttpGateway::new(config)?);
    let project_id = match session.create_project(&form).await {
        Ok(id) => id,
        Err(err) => {
            if let Some(orphan) = err.orphaned_project() {
                eprintln!("Project {orphan} exists on the server without an initialized chat.");
            }
            return Err(err.into());
        }
    };
    println!("Project created successfully! (Project ID: {project_id})");
    println!("Ask a question about project risks. Empty line resends an unsent message, /quit exits.\n");

    let stdin = io::stdin();
    let mut shown = 0;
    let mut draft = String::new();
    loop {
        let page = session.render(render::NO_SIGNALS, &draft).await;
        shown = print_page(&page, shown);
        if let PageView::Chat(view) = &page {
            if let TabView::Chat(ConversationPanel::Active { input_default, .. }) = &view.content {
                draft = input_default.clone();
            }
        }

        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "/quit" {
            break;
        }
        if !line.is_empty() {
            draft = line.to_string();
        }

        match session.submit(&project_id, &draft).await {
            SubmitOutcome::Sent { .. } => {}
            SubmitOutcome::Rejected(SubmitRejection::EmptyMessage) => continue,
            SubmitOutcome::Rejected(SubmitRejection::ReadOnly) => {
                println!("{}", render::READ_ONLY_NOTICE);
                break;
            }
            SubmitOutcome::Failed(err) => {
                eprintln!("Error sending message: {err}");
                println!("Your message was kept. Press Enter to retry.");
            }
        }
    }
    Ok(())
}

/// Print a page, skipping the first `already_shown` chat bubbles. Returns how
/// many bubbles the page holds.
fn print_page(page: &PageView, already_shown: usize) -> usize {
    match page {
        PageView::Alive(ack) => {
            println!("{ack}");
            0
        }
        PageView::Landing(view) => {
            print_errors(&view.errors);
            for project in &view.projects {
                println!("  {}  (Project ID: {})", project.display_name(), project.id);
            }
            0
        }
        PageView::Chat(view) => {
            print_errors(&view.errors);
            if already_shown == 0 {
                println!("=== {} ===", view.title);
            }
            match &view.content {
                TabView::Chat(panel) => {
                    if already_shown == 0 {
                        println!("{}", panel.heading());
                        if let ConversationPanel::ReadOnly { notice, .. } = panel {
                            println!("{notice}");
                        }
                    }
                    let bubbles = panel.bubbles();
                    if bubbles.is_empty() {
                        let empty = match panel {
                            ConversationPanel::Active { empty_notice, .. }
                            | ConversationPanel::ReadOnly { empty_notice, .. } => empty_notice,
                        };
                        if let Some(notice) = empty {
                            println!("{notice}");
                        }
                    }
                    for bubble in bubbles.iter().skip(already_shown) {
                        print_bubble(bubble);
                    }
                    bubbles.len()
                }
                TabView::Visualization(dashboard) => {
                    println!("Project health: {}%", dashboard.health.value);
                    0
                }
            }
        }
    }
}

fn print_bubble(bubble: &ChatBubble) {
    let who = match bubble.speaker {
        Speaker::User => "You",
        Speaker::Assistant => "Assistant",
    };
    println!("[{}] {who}: {}", bubble.timestamp, bubble.text);
}

fn print_errors(errors: &[String]) {
    for error in errors {
        eprintln!("{error}");
    }
}
