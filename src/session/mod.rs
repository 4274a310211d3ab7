// ABOUTME: Session module — meeting state, JSON meeting files, and JSONL transcript logging.
// ABOUTME: A meeting is saved and loaded wholesale; the transcript log only ever appends.

pub mod log;
pub mod meeting;
pub mod store;

pub use log::TranscriptLogger;
pub use meeting::{Meeting, MeetingMode};
pub use store::{SessionStore, sanitize_name};
