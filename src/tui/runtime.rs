// ABOUTME: Terminal event loop — multiplexes crossterm key events and meeting-worker events.
// ABOUTME: Redraws after every event; the terminal is restored even when the loop errors.

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::agent::r#loop::{AgentEvent, UserEvent};
use crate::commands::{self, Command, CommandError, Input};
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::{ChatMessageKind, TuiState};
use crate::tui::ui;

/// What a submitted line turns into.
#[derive(Debug)]
pub enum Dispatch {
    Send(UserEvent),
    Quit,
    Nothing,
}

/// Turn a submitted line into an event for the worker, echoing it into the chat.
pub fn prepare(state: &mut TuiState, line: String) -> Dispatch {
    match commands::parse(&line) {
        Err(CommandError::Empty) => Dispatch::Nothing,
        Err(e) => {
            state.push_message(ChatMessageKind::Error, e.to_string());
            Dispatch::Nothing
        }
        Ok(Input::Command(Command::Quit)) => Dispatch::Quit,
        Ok(Input::Question(question)) => {
            state.push_message(ChatMessageKind::User, question.clone());
            state.busy = true;
            Dispatch::Send(UserEvent::Ask(question))
        }
        Ok(Input::Command(command)) => {
            state.push_message(ChatMessageKind::User, line);
            state.busy = true;
            Dispatch::Send(UserEvent::Command(command))
        }
    }
}

/// Run the full-screen UI until the user quits. Returns the final state.
pub async fn run(
    mut state: TuiState,
    user_tx: mpsc::Sender<UserEvent>,
    mut agent_rx: mpsc::Receiver<AgentEvent>,
) -> anyhow::Result<TuiState> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut state, &user_tx, &mut agent_rx).await;
    ratatui::restore();
    result.map(|()| state)
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut TuiState,
    user_tx: &mpsc::Sender<UserEvent>,
    agent_rx: &mut mpsc::Receiver<AgentEvent>,
) -> anyhow::Result<()> {
    let mut terminal_events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, state))?;

        let line = tokio::select! {
            maybe_event = terminal_events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match handle_key(state, key) {
                        InputResult::Quit => return Ok(()),
                        InputResult::Send(line) => Some(line),
                        InputResult::None => None,
                    }
                }
                Some(Ok(_)) => None,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            agent_event = agent_rx.recv() => match agent_event {
                Some(event) => state.apply(event),
                None => {
                    warn!("meeting worker channel closed");
                    return Ok(());
                }
            },
        };

        let Some(line) = line else { continue };
        match prepare(state, line) {
            Dispatch::Quit => return Ok(()),
            Dispatch::Nothing => {}
            Dispatch::Send(event) => {
                debug!(?event, "sending to meeting worker");
                if user_tx.send(event).await.is_err() {
                    state.busy = false;
                    state.push_message(
                        ChatMessageKind::Error,
                        "The meeting worker has stopped".to_string(),
                    );
                }
            }
        }
    }
}
