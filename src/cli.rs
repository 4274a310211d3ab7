// ABOUTME: Plain line-oriented front end — role setup with defaults, then questions until "exit".
// ABOUTME: Drives the same meeting worker as the TUI and blocks on each line until it reports Done.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::agent::r#loop::{AgentEvent, MeetingDesk, UserEvent, run_meeting_loop};
use crate::commands::{self, Command, CommandError, Input};
use crate::model::{RoleConfig, RoleField};

/// Sentinel that ends the loop (case-insensitive).
pub const EXIT_SENTINEL: &str = "exit";

async fn read_line<R: AsyncBufRead + Unpin>(input: &mut R) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Ask for one value, keeping `default` when the answer is blank.
async fn ask_with_default<R, W>(
    input: &mut R,
    out: &mut W,
    label: &str,
    default: &str,
) -> anyhow::Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{} [{}]: ", label, default)?;
    out.flush()?;
    let answer = read_line(input).await?.unwrap_or_default();
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

/// Prompt for every field of a role, showing the current value as the default.
pub async fn prompt_role<R, W>(
    input: &mut R,
    out: &mut W,
    seat_number: u8,
    defaults: &RoleConfig,
) -> anyhow::Result<RoleConfig>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "\nRole {} (press Enter to keep the default)", seat_number)?;
    let mut role = defaults.clone();
    for field in [RoleField::Name, RoleField::Backstory, RoleField::Task] {
        let current = match field {
            RoleField::Name => &defaults.name,
            RoleField::Backstory => &defaults.backstory,
            RoleField::Task => &defaults.task_instruction,
        };
        let value = ask_with_default(input, out, field.as_str(), current).await?;
        role.set_field(field, value);
    }
    Ok(role)
}

fn print_event<W: Write>(out: &mut W, event: &AgentEvent) -> std::io::Result<()> {
    match event {
        AgentEvent::RoleStarted { role, provider, .. } => {
            writeln!(out, "🔄 {} ({}) is working, please wait...", role, provider)
        }
        AgentEvent::RoleAnswered { .. } => Ok(()),
        AgentEvent::RoleFailed {
            role, error, hints, ..
        } => {
            writeln!(out, "\n❌ {} ran into an error:", role)?;
            writeln!(out, "{}", error)?;
            if !hints.is_empty() {
                writeln!(out, "\n💡 Possible fixes:")?;
                for (idx, hint) in hints.iter().enumerate() {
                    writeln!(out, "{}. {}", idx + 1, hint)?;
                }
            }
            Ok(())
        }
        AgentEvent::RoleSkipped {
            role, waiting_on, ..
        } => writeln!(out, "⏭  {} skipped: {} did not answer", role, waiting_on),
        AgentEvent::Exchanged {
            combined,
            transcript,
        } => {
            writeln!(out, "\n✅ Analysis complete:\n")?;
            writeln!(out, "{}", combined)?;
            writeln!(out, "\n📜 Transcript:")?;
            write!(out, "{}", transcript)
        }
        AgentEvent::System(text) => writeln!(out, "{}", text),
        AgentEvent::Error(text) => writeln!(out, "❌ {}", text),
        AgentEvent::HistoryReplaced(_) | AgentEvent::Status(_) | AgentEvent::Done => Ok(()),
    }
}

/// Run the question loop until `exit`, `/quit`, or end of input.
/// Returns the desk so callers can inspect the final meeting.
pub async fn run<R, W>(desk: MeetingDesk, input: &mut R, out: &mut W) -> anyhow::Result<MeetingDesk>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (user_tx, user_rx) = mpsc::channel::<UserEvent>(4);
    let (agent_tx, mut agent_rx) = mpsc::channel::<AgentEvent>(64);
    let worker = tokio::spawn(run_meeting_loop(desk, user_rx, agent_tx));

    loop {
        write!(out, "\nAsk the panel a question (type {} to quit, /help for commands):\n> ", EXIT_SENTINEL)?;
        out.flush()?;
        let Some(line) = read_line(input).await? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case(EXIT_SENTINEL) {
            break;
        }

        let event = match commands::parse(&line) {
            Err(CommandError::Empty) => {
                writeln!(out, "⚠️  Please enter a non-empty question.")?;
                continue;
            }
            Err(e) => {
                writeln!(out, "❌ {}", e)?;
                continue;
            }
            Ok(Input::Command(Command::Quit)) => break,
            Ok(Input::Question(question)) => UserEvent::Ask(question),
            Ok(Input::Command(command)) => UserEvent::Command(command),
        };

        if user_tx.send(event).await.is_err() {
            anyhow::bail!("meeting worker stopped unexpectedly");
        }
        while let Some(event) = agent_rx.recv().await {
            print_event(out, &event)?;
            if matches!(event, AgentEvent::Done) {
                break;
            }
        }
    }

    writeln!(out, "\n👋 Thanks for using the meeting assistant!")?;
    let _ = user_tx.send(UserEvent::Quit).await;
    drop(user_tx);
    Ok(worker.await?)
}
