// ABOUTME: Meeting worker — owns the meeting and answers user events on a background task.
// ABOUTME: Runs the two consultation steps in order and reports each step as an AgentEvent.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::agent::pipeline::{Exchange, Observer, Panel, RoleOutcome, Step, Verdict};
use crate::commands::{self, Command};
use crate::model::{HistoryEntry, Seat};
use crate::presenter;
use crate::session::{Meeting, MeetingMode, SessionStore, TranscriptLogger};

/// Events sent from a front end to the meeting worker.
#[derive(Debug)]
pub enum UserEvent {
    /// A question for the panel.
    Ask(String),
    /// A slash command.
    Command(Command),
    /// The front end is shutting down.
    Quit,
}

/// Snapshot of the meeting shown in headers and status bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingStatus {
    pub name: String,
    pub mode: MeetingMode,
    pub first_role: String,
    pub first_provider: String,
    /// `None` in single-role mode.
    pub second_role: Option<(String, String)>,
    pub attachments: usize,
    pub entries: usize,
}

/// Events sent from the meeting worker back to the front end.
#[derive(Debug)]
pub enum AgentEvent {
    /// A role's provider call is about to be issued.
    RoleStarted {
        seat: Seat,
        role: String,
        provider: String,
    },
    RoleAnswered {
        seat: Seat,
        role: String,
        reply: String,
    },
    RoleFailed {
        seat: Seat,
        role: String,
        error: String,
        hints: &'static [&'static str],
    },
    RoleSkipped {
        seat: Seat,
        role: String,
        waiting_on: String,
    },
    /// An exchange finished and was recorded.
    Exchanged { combined: String, transcript: String },
    /// The history was replaced wholesale (load or reset).
    HistoryReplaced(Vec<HistoryEntry>),
    Status(MeetingStatus),
    /// Informational output of a command.
    System(String),
    /// A command failed; the meeting state is unchanged.
    Error(String),
    /// The worker finished processing one user event.
    Done,
}

/// The meeting plus everything needed to consult and persist it.
pub struct MeetingDesk {
    meeting: Meeting,
    panel: Panel,
    store: SessionStore,
    transcript: Option<TranscriptLogger>,
}

impl MeetingDesk {
    pub fn new(meeting: Meeting, panel: Panel, store: SessionStore) -> Self {
        Self {
            meeting,
            panel,
            store,
            transcript: None,
        }
    }

    pub fn with_transcript(mut self, logger: TranscriptLogger) -> Self {
        self.transcript = Some(logger);
        self
    }

    pub fn meeting(&self) -> &Meeting {
        &self.meeting
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn status(&self) -> MeetingStatus {
        let label = |seat| {
            self.panel
                .binding(seat)
                .map(|b| b.label())
                .unwrap_or_default()
        };
        MeetingStatus {
            name: self.meeting.name().to_string(),
            mode: self.meeting.mode(),
            first_role: self.meeting.role(Seat::First).name.clone(),
            first_provider: label(Seat::First),
            second_role: (!self.panel.is_single()).then(|| {
                (
                    self.meeting.role(Seat::Second).name.clone(),
                    label(Seat::Second),
                )
            }),
            attachments: self.meeting.attachments().len(),
            entries: self.meeting.history().len(),
        }
    }

    /// Consult the panel on one question and record the result. Each step is
    /// forwarded to `events` as it happens.
    pub async fn ask(&mut self, question: &str, events: &mpsc::Sender<AgentEvent>) -> Exchange {
        info!(meeting = %self.meeting.name(), "question received");
        let exchange = self.meeting.ask(&self.panel, question, events).await;

        if let Some(logger) = &mut self.transcript
            && let Err(e) = logger.log_entries(self.meeting.name(), &exchange.history_entries())
        {
            warn!(error = %e, "failed to append to transcript log");
        }

        let _ = events
            .send(AgentEvent::Exchanged {
                combined: presenter::combined_reply(&exchange),
                transcript: presenter::transcript(self.meeting.history()),
            })
            .await;
        let _ = events.send(AgentEvent::Status(self.status())).await;
        exchange
    }

    /// Apply one slash command. `Quit` is the caller's business and is ignored here.
    pub async fn run_command(&mut self, command: Command, events: &mpsc::Sender<AgentEvent>) {
        let mut out = Vec::new();
        match command {
            Command::Help => out.push(AgentEvent::System(commands::HELP.to_string())),
            Command::Save(name) => {
                let saved = match name {
                    Some(name) => self.meeting.save_as(&self.store, &name),
                    None => self.meeting.save(&self.store),
                };
                match saved {
                    Ok(path) => {
                        out.push(AgentEvent::System(format!(
                            "Saved meeting '{}' to {}",
                            self.meeting.name(),
                            path.display()
                        )));
                        out.push(AgentEvent::Status(self.status()));
                    }
                    Err(e) => out.push(AgentEvent::Error(format!("Save failed: {}", e))),
                }
            }
            Command::Load(name) => match self.meeting.load(&self.store, &name) {
                Ok(()) => {
                    out.push(AgentEvent::HistoryReplaced(self.meeting.history().to_vec()));
                    out.push(AgentEvent::System(format!(
                        "Loaded meeting '{}' ({} history entries)",
                        self.meeting.name(),
                        self.meeting.history().len()
                    )));
                    out.push(AgentEvent::Status(self.status()));
                }
                Err(e) => out.push(AgentEvent::Error(format!("Load failed: {}", e))),
            },
            Command::List => match self.store.list() {
                Ok(names) if names.is_empty() => out.push(AgentEvent::System(format!(
                    "No saved meetings in {}",
                    self.store.dir().display()
                ))),
                Ok(names) => out.push(AgentEvent::System(format!(
                    "Saved meetings:\n{}",
                    names
                        .iter()
                        .map(|n| format!("  {}", n))
                        .collect::<Vec<_>>()
                        .join("\n")
                ))),
                Err(e) => out.push(AgentEvent::Error(format!("Could not list meetings: {}", e))),
            },
            Command::New => {
                self.meeting.reset();
                out.push(AgentEvent::HistoryReplaced(Vec::new()));
                out.push(AgentEvent::System(format!(
                    "Started a new meeting '{}'",
                    self.meeting.name()
                )));
                out.push(AgentEvent::Status(self.status()));
            }
            Command::Rename(name) => {
                self.meeting.rename(name);
                out.push(AgentEvent::System(format!(
                    "Meeting renamed to '{}'",
                    self.meeting.name()
                )));
                out.push(AgentEvent::Status(self.status()));
            }
            Command::Attach(patterns) => {
                for doc in self.meeting.attach_paths(&patterns) {
                    if doc.ok {
                        out.push(AgentEvent::System(format!(
                            "Attached {} ({} characters)",
                            doc.name,
                            doc.text.chars().count()
                        )));
                    } else {
                        out.push(AgentEvent::Error(doc.text));
                    }
                }
                out.push(AgentEvent::Status(self.status()));
            }
            Command::Detach => {
                let count = self.meeting.attachments().len();
                self.meeting.clear_attachments();
                out.push(AgentEvent::System(format!("Detached {} document(s)", count)));
                out.push(AgentEvent::Status(self.status()));
            }
            Command::Role { seat, field, value } => {
                self.meeting.set_role_field(seat, field, value);
                let mut message = format!("Role {} {} updated", seat.number(), field.as_str());
                if seat == Seat::Second && self.panel.is_single() {
                    message.push_str(" (role 2 is not seated in single-role mode)");
                }
                out.push(AgentEvent::System(message));
                out.push(AgentEvent::Status(self.status()));
            }
            Command::Roles => out.push(AgentEvent::System(presenter::describe_roles(
                self.meeting.role(Seat::First),
                (!self.panel.is_single()).then(|| self.meeting.role(Seat::Second)),
            ))),
            Command::History => {
                let text = presenter::transcript(self.meeting.history());
                out.push(AgentEvent::System(if text.is_empty() {
                    "No questions asked yet".to_string()
                } else {
                    text.trim_end().to_string()
                }));
            }
            Command::Quit => {}
        }
        for event in out {
            let _ = events.send(event).await;
        }
    }
}

#[async_trait]
impl Observer for mpsc::Sender<AgentEvent> {
    async fn step(&self, step: Step<'_>) {
        let event = match step {
            Step::Started {
                seat,
                role,
                provider,
            } => AgentEvent::RoleStarted {
                seat,
                role: role.to_string(),
                provider,
            },
            Step::Finished(outcome) => outcome_event(outcome),
        };
        let _ = self.send(event).await;
    }
}

fn outcome_event(outcome: &RoleOutcome) -> AgentEvent {
    match &outcome.verdict {
        Verdict::Answered(reply) => AgentEvent::RoleAnswered {
            seat: outcome.seat,
            role: outcome.role.clone(),
            reply: reply.clone(),
        },
        Verdict::Failed(e) => AgentEvent::RoleFailed {
            seat: outcome.seat,
            role: outcome.role.clone(),
            error: e.to_string(),
            hints: presenter::hints(e),
        },
        Verdict::Skipped { waiting_on } => AgentEvent::RoleSkipped {
            seat: outcome.seat,
            role: outcome.role.clone(),
            waiting_on: waiting_on.clone(),
        },
    }
}

/// Run the meeting worker until the front end quits or the channel closes.
///
/// Events are handled one at a time; every handled event ends with
/// [`AgentEvent::Done`] so a front end knows when to send the next one.
pub async fn run_meeting_loop(
    mut desk: MeetingDesk,
    mut user_rx: mpsc::Receiver<UserEvent>,
    agent_tx: mpsc::Sender<AgentEvent>,
) -> MeetingDesk {
    while let Some(event) = user_rx.recv().await {
        match event {
            UserEvent::Quit | UserEvent::Command(Command::Quit) => break,
            UserEvent::Ask(question) => {
                desk.ask(&question, &agent_tx).await;
            }
            UserEvent::Command(command) => desk.run_command(command, &agent_tx).await,
        }
        let _ = agent_tx.send(AgentEvent::Done).await;
    }
    info!("meeting worker stopped");
    desk
}
