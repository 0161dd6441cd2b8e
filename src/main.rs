use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitvoice::assistant::{AssistantSimulator, LatencyProfile, SystemRandom};
use fitvoice::auth::{AuthClient, AuthError, SessionManager};
use fitvoice::config::AppConfig;
use fitvoice::db::SqliteSecureStore;
use fitvoice::models::*;
use fitvoice::storage::CredentialStore;

#[derive(Parser)]
#[command(name = "fitvoice")]
#[command(about = "Fitness routines session and voice-assistant shell")]
struct Cli {
    /// Secure store database (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the stored session and report where the app would route
    Boot,
    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account (does not sign in)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "2")]
        role_id: i64,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored identity
    Whoami,
    /// Fetch the signed-in user's profile
    Profile,
    /// Talk to the simulated voice assistant
    Assistant {
        /// Print the interaction log when the command finishes
        #[arg(long, global = true)]
        history: bool,

        #[command(subcommand)]
        command: AssistantCommand,
    },
    /// Show the effective configuration
    Config {
        /// Save it to the user config file
        #[arg(long)]
        write: bool,
    },
}

#[derive(Subcommand)]
enum AssistantCommand {
    /// Check the connection once
    Status,
    /// Poll the connection status on an interval
    Watch {
        #[arg(long, default_value = "30")]
        interval: u64,
        /// Stop after this many polls
        #[arg(long)]
        count: Option<u32>,
    },
    /// Ask for new activity and routine suggestions
    Poll,
    /// Report a completed activity
    Send {
        title: String,
        #[arg(long, default_value = "30")]
        duration: u32,
        #[arg(long, default_value = "0")]
        calories: u32,
        #[arg(long, default_value = "other")]
        kind: String,
    },
    /// Weekly progress summary
    Progress,
    /// Schedule a reminder
    Remind {
        time: String,
        message: String,
        #[arg(long = "day")]
        days: Vec<String>,
    },
    /// Send a voice command
    Say { command: String },
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "fitvoice=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_sessions(cli: &Cli, config: &AppConfig) -> anyhow::Result<SessionManager> {
    let store = match &cli.db {
        Some(path) => SqliteSecureStore::open(path.clone())?,
        None => SqliteSecureStore::open_default()?,
    };
    store.migrate()?;

    Ok(SessionManager::new(
        AuthClient::from_config(config),
        CredentialStore::new(Arc::new(store)),
    ))
}

fn report(err: AuthError) -> anyhow::Error {
    match err.status() {
        Some(status) => anyhow::anyhow!("{} (status {})", err.message(), status),
        None => anyhow::anyhow!("{}", err.message()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::load();
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }

    match cli.command.as_ref().unwrap_or(&Commands::Boot) {
        Commands::Boot => {
            let sessions = open_sessions(&cli, &config)?;
            match sessions.restore().await {
                SessionState::Authenticated => println!("authenticated: opening home"),
                _ => println!("unauthenticated: opening login"),
            }
        }
        Commands::Login { email, password } => {
            let sessions = open_sessions(&cli, &config)?;
            let response = sessions.login(email, password).await.map_err(report)?;
            println!("{}", response.message);
            if sessions.state() != SessionState::Authenticated {
                tracing::warn!("Session could not be stored completely; please log in again");
            }
        }
        Commands::Register {
            name,
            phone,
            email,
            password,
            role_id,
        } => {
            let sessions = open_sessions(&cli, &config)?;
            let input = RegisterData {
                name: name.clone(),
                phone: phone.clone(),
                email: email.clone(),
                password: password.clone(),
                rol: RoleRef { id: *role_id },
            };
            let response = sessions.register(&input).await.map_err(report)?;
            println!("{}", response.message);
        }
        Commands::Logout => {
            let sessions = open_sessions(&cli, &config)?;
            sessions.logout().await;
            println!("logged out");
        }
        Commands::Whoami => {
            let sessions = open_sessions(&cli, &config)?;
            match (sessions.user_id().await, sessions.role().await) {
                (Some(id), role) => {
                    println!("user {} ({})", id, role.as_deref().unwrap_or("no role"))
                }
                (None, _) => println!("not signed in"),
            }
        }
        Commands::Profile => {
            let sessions = open_sessions(&cli, &config)?;
            let response = sessions.fetch_profile().await.map_err(report)?;
            print_json(&response.data)?;
        }
        Commands::Assistant { history, command } => {
            let latency = if config.simulate_latency {
                LatencyProfile::default()
            } else {
                LatencyProfile::instant()
            };
            let assistant = Arc::new(AssistantSimulator::new(SystemRandom::new(), latency));
            run_assistant(&assistant, command).await?;
            if *history {
                print_json(&assistant.interaction_history())?;
            }
        }
        Commands::Config { write } => {
            print_json(&config)?;
            if *write {
                let path = config.save()?;
                tracing::info!("Configuration saved to {}", path.display());
            }
        }
    }

    Ok(())
}

async fn run_assistant(
    assistant: &AssistantSimulator,
    command: &AssistantCommand,
) -> anyhow::Result<()> {
    match command {
        AssistantCommand::Status => print_json(&assistant.connection_status().await)?,
        AssistantCommand::Watch { interval, count } => {
            let mut ticker = tokio::time::interval(Duration::from_secs((*interval).max(1)));
            let mut polls = 0u32;
            loop {
                ticker.tick().await;
                let status = assistant.connection_status().await;
                println!(
                    "{} connected={} last_sync={} skill={}",
                    Utc::now().to_rfc3339(),
                    status.connected,
                    status.last_sync.to_rfc3339(),
                    status.skill_version
                );
                polls += 1;
                if count.is_some_and(|limit| polls >= limit) {
                    break;
                }
            }
        }
        AssistantCommand::Poll => {
            let (activity, routine) =
                tokio::join!(assistant.receive_activity(), assistant.receive_routine());
            print_json(&serde_json::json!({ "activity": activity, "routine": routine }))?;
        }
        AssistantCommand::Send {
            title,
            duration,
            calories,
            kind,
        } => {
            let kind = ActivityType::from_str(kind)
                .ok_or_else(|| anyhow::anyhow!("Unknown activity type: {}", kind))?;
            let activity = Activity {
                id: Utc::now().timestamp_millis().to_string(),
                title: title.clone(),
                description: String::new(),
                duration: *duration,
                calories: *calories,
                date: Utc::now(),
                kind,
                completed: true,
                source: ActivitySource::Manual,
            };
            let sent = assistant.send_activity(&activity).await;
            println!("{}", if sent { "sent" } else { "not sent, try again" });
        }
        AssistantCommand::Progress => print_json(&assistant.progress().await)?,
        AssistantCommand::Remind {
            time,
            message,
            days,
        } => {
            let reminder = Reminder {
                time: time.clone(),
                message: message.clone(),
                days: days.clone(),
            };
            let set = assistant.set_reminder(&reminder).await;
            println!("{}", if set { "reminder set" } else { "reminder not set, try again" });
        }
        AssistantCommand::Say { command } => {
            print_json(&assistant.process_voice_command(command).await)?
        }
    }
    Ok(())
}
