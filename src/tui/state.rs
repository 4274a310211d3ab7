// ABOUTME: TUI state types — chat messages, input buffer, busy/queued flags, and meeting status.
// ABOUTME: Applies AgentEvents from the meeting worker to what the screen shows.

use crate::agent::r#loop::{AgentEvent, MeetingStatus};
use crate::model::HistoryEntry;
use crate::session::MeetingMode;

/// The kind of a single chat message displayed in the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessageKind {
    User,
    /// A reply from a seated role.
    Role { name: String },
    System,
    Error,
}

/// A single message in the chat history.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub kind: ChatMessageKind,
    pub content: String,
}

/// Full TUI application state.
pub struct TuiState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    /// An event is being processed by the meeting worker.
    pub busy: bool,
    /// Role currently waiting on its provider, for the status bar.
    pub thinking: Option<String>,
    /// One line typed while busy, sent when the worker reports done.
    pub queued: Option<String>,
    pub status: MeetingStatus,
}

impl TuiState {
    pub fn new(status: MeetingStatus) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            busy: false,
            thinking: None,
            queued: None,
            status,
        }
    }

    /// Add a message to the chat history and reset scroll to bottom.
    pub fn push_message(&mut self, kind: ChatMessageKind, content: String) {
        self.messages.push(ChatMessage { kind, content });
        self.scroll_offset = 0;
    }

    /// Replace the chat with a rendering of `history`.
    pub fn replay_history(&mut self, history: &[HistoryEntry]) {
        self.messages.clear();
        for entry in history {
            if entry.is_question() {
                self.push_message(ChatMessageKind::User, entry.user.clone());
            } else {
                self.push_message(
                    ChatMessageKind::Role {
                        name: entry.agent.clone(),
                    },
                    entry.reply.clone(),
                );
            }
        }
    }

    /// Apply one event from the meeting worker. Returns a queued line that
    /// should now be sent, if the worker just became idle.
    pub fn apply(&mut self, event: AgentEvent) -> Option<String> {
        match event {
            AgentEvent::RoleStarted { role, provider, .. } => {
                self.thinking = Some(format!("{} ({})", role, provider));
            }
            AgentEvent::RoleAnswered { role, reply, .. } => {
                self.thinking = None;
                self.push_message(ChatMessageKind::Role { name: role }, reply);
            }
            AgentEvent::RoleFailed { role, error, .. } => {
                self.thinking = None;
                self.push_message(
                    ChatMessageKind::Error,
                    format!("{} could not answer: {}", role, error),
                );
            }
            AgentEvent::RoleSkipped {
                role, waiting_on, ..
            } => {
                self.push_message(
                    ChatMessageKind::System,
                    format!("{} skipped: {} did not answer", role, waiting_on),
                );
            }
            AgentEvent::Exchanged { .. } => {}
            AgentEvent::HistoryReplaced(history) => self.replay_history(&history),
            AgentEvent::Status(status) => self.status = status,
            AgentEvent::System(text) => self.push_message(ChatMessageKind::System, text),
            AgentEvent::Error(text) => self.push_message(ChatMessageKind::Error, text),
            AgentEvent::Done => {
                self.busy = false;
                self.thinking = None;
                return self.queued.take();
            }
        }
        None
    }

    /// Submit the current input buffer. Returns the trimmed text if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        self.input.clear();
        self.cursor_pos = 0;
        Some(trimmed)
    }

    pub fn mode_label(&self) -> &'static str {
        match self.status.mode {
            MeetingMode::New => "new meeting",
            MeetingMode::Loaded => "loaded meeting",
        }
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor.
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}

#[cfg(test)]
pub(crate) fn test_status() -> MeetingStatus {
    MeetingStatus {
        name: "meeting".to_string(),
        mode: MeetingMode::New,
        first_role: "Accountant".to_string(),
        first_provider: "openai/gpt-4".to_string(),
        second_role: Some(("Lawyer".to_string(), "gemini/gemini-1.5-pro".to_string())),
        attachments: 0,
        entries: 0,
    }
}
