// ABOUTME: TUI module — ratatui full-screen chat for the meeting.
// ABOUTME: Chat transcript, input line with queueing, status bar, and the terminal event loop.

pub mod input;
pub mod runtime;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
