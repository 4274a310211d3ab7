// ABOUTME: App orchestrator — wires credentials, provider bindings, meeting store, worker, and front end.
// ABOUTME: Sets up subsystems then runs either the terminal UI or the plain line loop.

use std::time::Instant;

use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::agent::pipeline::Panel;
use crate::agent::provider::{Binding, ProviderSet, invoke};
use crate::agent::r#loop::{AgentEvent, MeetingDesk, UserEvent, run_meeting_loop};
use crate::cli;
use crate::config::Config;
use crate::model::Seat;
use crate::session::meeting::MeetingDefaults;
use crate::session::{Meeting, SessionStore, TranscriptLogger};
use crate::tui::runtime;
use crate::tui::state::{ChatMessageKind, TuiState};

/// Front end selection and start-up overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub plain: bool,
    pub single: bool,
    /// Saved meeting to load before the first question.
    pub meeting: Option<String>,
}

/// Load `./.env`, then the per-user secrets file. Existing variables win.
pub fn load_secrets() {
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_path(Config::secrets_env_path());
}

/// Warnings for every seat whose provider is unavailable.
pub fn availability_warnings(panel: &Panel, meeting: &Meeting) -> Vec<String> {
    [Seat::First, Seat::Second]
        .into_iter()
        .filter_map(|seat| match panel.binding(seat)? {
            Binding::Unavailable { reason, .. } => Some(format!(
                "{} is unavailable: {}",
                meeting.role(seat).name,
                reason
            )),
            Binding::Ready(_) => None,
        })
        .collect()
}

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    options: RunOptions,
}

impl App {
    pub fn new(config: Config, options: RunOptions) -> Self {
        Self { config, options }
    }

    /// Run the application until the user quits.
    pub async fn run(self) -> anyhow::Result<()> {
        load_secrets();

        let providers = ProviderSet::from_env(&self.config);
        let single = self.options.single || self.config.meeting.single_role;
        let panel = Panel::seat(&self.config, &providers, single);
        let store = SessionStore::new(self.config.sessions_dir());
        info!(
            sessions = %store.dir().display(),
            first = %panel.binding(Seat::First).map(|b| b.label()).unwrap_or_default(),
            single,
            "meeting assistant starting"
        );

        if self.options.plain {
            self.run_plain(panel, store).await
        } else {
            self.run_tui(panel, store).await
        }
    }

    fn build_desk(&self, meeting: Meeting, panel: Panel, store: SessionStore) -> MeetingDesk {
        let desk = MeetingDesk::new(meeting, panel, store);
        match TranscriptLogger::new() {
            Ok(logger) => desk.with_transcript(logger),
            Err(e) => {
                warn!(error = %e, "failed to open transcript log");
                desk
            }
        }
    }

    async fn run_plain(&self, panel: Panel, store: SessionStore) -> anyhow::Result<()> {
        let mut stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();

        println!("🚀 Starting the meeting assistant...");
        let mut meeting = Meeting::from_config(&self.config);
        for warning in availability_warnings(&panel, &meeting) {
            println!("⚠️  Warning: {}", warning);
        }

        if let Some(name) = &self.options.meeting {
            match meeting.load(&store, name) {
                Ok(()) => println!(
                    "📂 Loaded meeting '{}' ({} history entries)",
                    meeting.name(),
                    meeting.history().len()
                ),
                Err(e) => println!("❌ Could not load '{}': {}", name, e),
            }
        } else {
            let seats: &[Seat] = if panel.is_single() {
                &[Seat::First]
            } else {
                &[Seat::First, Seat::Second]
            };
            let mut defaults = MeetingDefaults::from_config(&self.config);
            for &seat in seats {
                let role =
                    cli::prompt_role(&mut stdin, &mut stdout, seat.number(), meeting.role(seat))
                        .await?;
                match seat {
                    Seat::First => defaults.first = role,
                    Seat::Second => defaults.second = role,
                }
            }
            meeting = Meeting::new(defaults);
        }

        let desk = self.build_desk(meeting, panel, store);
        cli::run(desk, &mut stdin, &mut stdout).await?;
        Ok(())
    }

    async fn run_tui(&self, panel: Panel, store: SessionStore) -> anyhow::Result<()> {
        let mut meeting = Meeting::from_config(&self.config);
        let mut startup = Vec::new();
        for warning in availability_warnings(&panel, &meeting) {
            startup.push((ChatMessageKind::Error, warning));
        }
        if let Some(name) = &self.options.meeting
            && let Err(e) = meeting.load(&store, name)
        {
            startup.push((ChatMessageKind::Error, format!("Load failed: {}", e)));
        }

        let desk = self.build_desk(meeting, panel, store);
        let mut state = TuiState::new(desk.status());
        state.replay_history(desk.meeting().history());
        for (kind, text) in startup {
            state.push_message(kind, text);
        }
        state.push_message(
            ChatMessageKind::System,
            "Ask a question to consult the panel. Type /help for commands.".to_string(),
        );

        let (user_tx, user_rx) = mpsc::channel::<UserEvent>(16);
        let (agent_tx, agent_rx) = mpsc::channel::<AgentEvent>(64);
        let worker = tokio::spawn(run_meeting_loop(desk, user_rx, agent_tx));

        let started = Instant::now();
        let result = runtime::run(state, user_tx.clone(), agent_rx).await;

        // Signal the worker to quit and wait for it.
        let _ = user_tx.send(UserEvent::Quit).await;
        drop(user_tx);
        let desk = worker.await?;

        let state = result?;
        print_exit_screen(&desk, &state, started);
        Ok(())
    }
}

/// Prompt sent by `meet check --ping`.
pub const PING_PROMPT: &str = "Introduce yourself in one sentence.";

/// `meet sessions`: print every saved meeting name.
pub fn list_sessions(config: &Config) -> anyhow::Result<()> {
    let store = SessionStore::new(config.sessions_dir());
    let names = store.list()?;
    if names.is_empty() {
        println!("No saved meetings in {}", store.dir().display());
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}

/// `meet check`: report credential status per provider and optionally ping each one.
pub async fn check_providers(config: &Config, ping: bool) -> anyhow::Result<()> {
    load_secrets();
    let providers = ProviderSet::from_env(config);
    for (name, binding) in providers.iter() {
        match binding {
            Binding::Ready(_) => println!("✅ {}: credential loaded ({})", name, binding.label()),
            Binding::Unavailable { reason, .. } => println!("⚠️  {}: {}", name, reason),
        }
        if ping && binding.is_ready() {
            match invoke(name, PING_PROMPT, binding).await {
                Ok(reply) => println!("   ↳ {}", reply.trim()),
                Err(e) => println!("   ❌ {}", e),
            }
        }
    }
    Ok(())
}

/// Print a farewell summary after the TUI exits.
fn print_exit_screen(desk: &MeetingDesk, state: &TuiState, started: Instant) {
    let elapsed_secs = started.elapsed().as_secs();
    let elapsed = if elapsed_secs >= 3600 {
        format!("{}h {:02}m", elapsed_secs / 3600, (elapsed_secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", elapsed_secs / 60, elapsed_secs % 60)
    };
    let meeting = desk.meeting();
    let questions = meeting.history().iter().filter(|e| e.is_question()).count();

    println!();
    println!("  👋 \x1b[1mThanks for using the meeting assistant!\x1b[0m");
    println!();
    println!(
        "  🕐 Meeting '{}' lasted {} with {} question(s) and {} message(s) on screen.",
        meeting.name(),
        elapsed,
        questions,
        state.messages.len()
    );
    println!(
        "  💾 Saved meetings live in {}",
        desk.store().dir().display()
    );
    println!();
}
