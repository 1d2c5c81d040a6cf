use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mood_journal::client::{ApiClient, MoodApi};
use mood_journal::config::Config;
use mood_journal::models::{Gender, UserProfile};
use mood_journal::session::SessionClient;
use mood_journal::store::{IdentityStore, SqliteStore};
use mood_journal::workflow::MoodWorkflow;
use mood_journal::{api, dashboard, history::HistoryLoader, render, FailureKind, MoodError};

#[derive(Parser)]
#[command(name = "mood")]
#[command(about = "Journal your mood and get a supportive response")]
struct Cli {
    /// Base URL of the mood service (overrides config and MOOD_JOURNAL_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Path of the identity store database
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register your age and gender and start a new session
    Register {
        #[arg(long)]
        age: u32,

        /// Male, Female, Non-binary or "Prefer not to say"
        #[arg(long)]
        gender: Gender,
    },
    /// Write journal entries interactively (default)
    Journal,
    /// Print the mood trend for the stored session
    History,
    /// Show the stored identity
    Whoami,
    /// Show the effective configuration
    Config {
        /// Persist the effective --url, --timeout and --store to the config file
        #[arg(long)]
        save: bool,
    },
    /// Run the stub development server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

/// Logs go to stderr; stdout carries the journal conversation.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "mood_journal=info,tower_http=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

struct App {
    api: Arc<dyn MoodApi>,
    store: Arc<dyn IdentityStore>,
}

impl App {
    fn open(config: &Config) -> anyhow::Result<Self> {
        let api = ApiClient::from_config(config).context("Failed to build HTTP client")?;
        let store_path = config.resolved_store_path()?;
        let store = SqliteStore::open(&store_path)
            .with_context(|| format!("Failed to open identity store at {}", store_path.display()))?;
        tracing::debug!(
            "Using service {} and store {}",
            api.base_url(),
            store_path.display()
        );

        Ok(Self {
            api: Arc::new(api),
            store: Arc::new(store),
        })
    }

    fn sessions(&self) -> SessionClient {
        SessionClient::new(self.api.clone(), self.store.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load();
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(store) = cli.store {
        config.store_path = Some(store);
    }

    match cli.command.unwrap_or(Commands::Journal) {
        Commands::Serve { port } => {
            let app = api::create_router();
            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("Stub mood server listening on http://127.0.0.1:{}", port);
            axum::serve(listener, app).await?;
        }
        Commands::Config { save } => {
            println!("url:     {}", config.base_url);
            println!("timeout: {}s", config.timeout_secs);
            println!("store:   {}", config.resolved_store_path()?.display());
            if save {
                let path = config.save().context("Failed to save config")?;
                println!("Saved to {}", path.display());
            }
        }
        Commands::Register { age, gender } => {
            let app = App::open(&config)?;
            let profile = UserProfile::new(age, gender);
            match app.sessions().register(&profile).await {
                Ok(session) => println!("Registered. Session {}", session.session_id),
                Err(e) => report(&e),
            }
        }
        Commands::Whoami => {
            let app = App::open(&config)?;
            let sessions = app.sessions();
            match sessions.current_session()? {
                Some(session) => println!(
                    "Session {} (age {}, {})",
                    session.session_id, session.profile.age, session.profile.gender
                ),
                None => match sessions.current_profile()? {
                    Some(profile) => println!(
                        "Profile saved (age {}, {}) but no session. Run `mood register`.",
                        profile.age, profile.gender
                    ),
                    None => println!("Not registered. Run `mood register`."),
                },
            }
        }
        Commands::History => {
            let app = App::open(&config)?;
            let Some(session) = app.sessions().current_session()? else {
                report(&MoodError::NotRegistered);
                return Ok(());
            };
            match HistoryLoader::new(app.api.clone()).load(&session.session_id).await {
                Ok(entries) if entries.is_empty() => println!("No entries yet."),
                Ok(entries) => println!("{}", render::render_trend(&entries)),
                Err(e) => report(&e),
            }
        }
        Commands::Journal => {
            let app = App::open(&config)?;
            journal(app).await?;
        }
    }

    Ok(())
}

async fn journal(app: App) -> anyhow::Result<()> {
    let workflow = MoodWorkflow::new(app.api.clone(), app.store.clone());
    let readiness = match workflow.initialize().await {
        Ok(readiness) => readiness,
        Err(e) => {
            report(&e);
            return Ok(());
        }
    };

    // The greeting only needs the profile, which may outlive a session.
    let gender = match app.sessions().current_profile() {
        Ok(profile) => profile.map(|p| p.gender),
        Err(e) => {
            tracing::warn!("Failed to read stored profile: {}", e);
            None
        }
    };
    println!("{} 👋", dashboard::greeting_now(gender.as_deref()));

    if !readiness.is_ready() {
        report(&MoodError::NotRegistered);
        println!("Run `mood register --age <AGE> --gender <GENDER>` first.");
        return Ok(());
    }

    // History is a side panel: print it whenever it settles, never gate input on it.
    let history_panel = tokio::spawn({
        let workflow = workflow.clone();
        async move {
            if let Some(panel) = render::render_history(&workflow.wait_for_history().await) {
                println!("{}", panel);
            }
        }
    });

    println!("🧠 Journal your thoughts. Empty line to skip, :retry to resend, :q to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let outcome = match line {
            ":q" | ":quit" => break,
            "" => continue,
            ":retry" if !workflow.state().can_retry() => {
                println!("Nothing to retry. Only a dropped connection or an empty reply can be resent.");
                continue;
            }
            ":retry" => workflow.retry().await,
            text => workflow.submit(text).await,
        };
        // Precondition failures leave the previous outcome on screen.
        if let Err(e) = &outcome {
            if matches!(
                e.kind(),
                FailureKind::Validation | FailureKind::NotRegistered | FailureKind::SubmissionInProgress
            ) {
                report(e);
                continue;
            }
        }
        println!("{}", render::render_submission(&workflow.state()));
    }

    history_panel.abort();
    Ok(())
}

fn report(error: &MoodError) {
    eprintln!("{}", error.kind().user_message());
    eprintln!("  {}", error);
}
