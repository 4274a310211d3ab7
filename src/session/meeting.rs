// ABOUTME: Meeting state machine — history, seated roles, attachments, and New/Loaded mode.
// ABOUTME: Load replaces state wholesale, reset restores defaults; errors never change the mode.

use std::path::PathBuf;

use tracing::info;

use crate::agent::pipeline::{Consultation, Exchange, Observer, Panel};
use crate::config::Config;
use crate::documents::{self, Extracted};
use crate::error::Result;
use crate::model::{HistoryEntry, RoleConfig, RoleField, Seat, SessionRecord};
use crate::session::store::SessionStore;

/// Whether the meeting was started fresh or loaded from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingMode {
    New,
    Loaded,
}

impl MeetingMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Loaded => "loaded",
        }
    }
}

/// Values a reset returns to.
#[derive(Debug, Clone)]
pub struct MeetingDefaults {
    pub name: String,
    pub first: RoleConfig,
    pub second: RoleConfig,
}

impl MeetingDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.meeting.default_name.clone(),
            first: config.roles.first.clone(),
            second: config.roles.second.clone(),
        }
    }
}

impl Default for MeetingDefaults {
    fn default() -> Self {
        Self {
            name: "meeting".to_string(),
            first: RoleConfig::accountant(),
            second: RoleConfig::lawyer(),
        }
    }
}

/// The in-memory meeting a front end operates on.
#[derive(Debug, Clone)]
pub struct Meeting {
    name: String,
    mode: MeetingMode,
    history: Vec<HistoryEntry>,
    first: RoleConfig,
    second: RoleConfig,
    attachments: Vec<Extracted>,
    defaults: MeetingDefaults,
}

impl Meeting {
    pub fn new(defaults: MeetingDefaults) -> Self {
        Self {
            name: defaults.name.clone(),
            mode: MeetingMode::New,
            history: Vec::new(),
            first: defaults.first.clone(),
            second: defaults.second.clone(),
            attachments: Vec::new(),
            defaults,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(MeetingDefaults::from_config(config))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> MeetingMode {
        self.mode
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn role(&self, seat: Seat) -> &RoleConfig {
        match seat {
            Seat::First => &self.first,
            Seat::Second => &self.second,
        }
    }

    pub fn attachments(&self) -> &[Extracted] {
        &self.attachments
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_role_field(&mut self, seat: Seat, field: RoleField, value: impl Into<String>) {
        match seat {
            Seat::First => self.first.set_field(field, value),
            Seat::Second => self.second.set_field(field, value),
        }
    }

    /// Add extracted documents to the context sent with every question.
    pub fn attach(&mut self, extracted: Vec<Extracted>) {
        self.attachments.extend(extracted);
    }

    /// Read files from disk (globs expanded) and attach them. Arguments that
    /// cannot be read are attached as placeholders.
    pub fn attach_paths(&mut self, patterns: &[String]) -> Vec<Extracted> {
        let extracted = documents::ingest_patterns(patterns);
        self.attach(extracted.clone());
        extracted
    }

    pub fn clear_attachments(&mut self) {
        self.attachments.clear();
    }

    /// All attachment sections concatenated, or `None` with no attachments.
    pub fn document_context(&self) -> Option<String> {
        if self.attachments.is_empty() {
            return None;
        }
        Some(documents::context(&self.attachments))
    }

    /// Consultation inputs for `question` over the current history.
    pub fn consultation<'a>(&'a self, question: &'a str, context: Option<&'a str>) -> Consultation<'a> {
        Consultation {
            question,
            history: &self.history,
            context,
        }
    }

    /// Append the entries produced by an exchange and return them.
    pub fn record(&mut self, exchange: &Exchange) -> Vec<HistoryEntry> {
        let entries = exchange.history_entries();
        self.history.extend(entries.iter().cloned());
        entries
    }

    /// Run one full exchange through `panel`, reporting each step to
    /// `observer`, and record it.
    pub async fn ask(&mut self, panel: &Panel, question: &str, observer: &dyn Observer) -> Exchange {
        let context = self.document_context();
        let exchange = panel
            .consult(
                &self.first,
                &self.second,
                self.consultation(question, context.as_deref()),
                observer,
            )
            .await;
        self.record(&exchange);
        exchange
    }

    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            meeting_name: self.name.clone(),
            chat_history: self.history.clone(),
            role1_cfg: self.first.clone(),
            role2_cfg: self.second.clone(),
        }
    }

    /// Save under the current meeting name.
    pub fn save(&self, store: &SessionStore) -> Result<PathBuf> {
        store.save(&self.name, &self.to_record())
    }

    /// Save under `name`, adopting it as the meeting name only once the
    /// write has succeeded.
    pub fn save_as(&mut self, store: &SessionStore, name: &str) -> Result<PathBuf> {
        let mut record = self.to_record();
        record.meeting_name = name.to_string();
        let path = store.save(name, &record)?;
        self.name = record.meeting_name;
        Ok(path)
    }

    /// Load a saved meeting, replacing history, roles, and name. On error the
    /// current state is left untouched.
    pub fn load(&mut self, store: &SessionStore, name: &str) -> Result<()> {
        let record = store.load(name)?;
        self.apply_record(record, name);
        Ok(())
    }

    fn apply_record(&mut self, record: SessionRecord, requested: &str) {
        self.name = if record.meeting_name.trim().is_empty() {
            requested.to_string()
        } else {
            record.meeting_name
        };
        self.history = record.chat_history;
        self.first = record.role1_cfg;
        self.second = record.role2_cfg;
        self.mode = MeetingMode::Loaded;
        info!(meeting = %self.name, "meeting state replaced from file");
    }

    /// Return to a fresh meeting with the configured defaults.
    pub fn reset(&mut self) {
        *self = Self::new(self.defaults.clone());
        info!(meeting = %self.name, "meeting reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::pipeline::{RoleOutcome, Verdict};
    use crate::documents::Upload;

    fn exchange(question: &str, role: &str, reply: &str) -> Exchange {
        Exchange {
            question: question.to_string(),
            first: RoleOutcome {
                seat: Seat::First,
                role: role.to_string(),
                verdict: Verdict::Answered(reply.to_string()),
            },
            second: None,
        }
    }

    #[test]
    fn new_meeting_uses_defaults() {
        let meeting = Meeting::new(MeetingDefaults::default());
        assert_eq!(meeting.mode(), MeetingMode::New);
        assert_eq!(meeting.name(), "meeting");
        assert_eq!(meeting.role(Seat::First).name, "Accountant");
        assert_eq!(meeting.role(Seat::Second).name, "Lawyer");
        assert!(meeting.history().is_empty());
        assert!(meeting.document_context().is_none());
    }

    #[test]
    fn record_appends_in_order() {
        let mut meeting = Meeting::new(MeetingDefaults::default());
        meeting.record(&exchange("A?", "CFO", "B"));
        meeting.record(&exchange("C?", "CFO", "D"));
        let agents: Vec<&str> = meeting.history().iter().map(|e| e.agent.as_str()).collect();
        assert_eq!(agents, vec!["user", "CFO", "user", "CFO"]);
        assert_eq!(meeting.history()[3].reply, "D");
    }

    #[test]
    fn load_switches_to_loaded_and_reset_returns_to_new() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());

        let mut original = Meeting::new(MeetingDefaults::default());
        original.rename("Q1");
        original.set_role_field(Seat::First, RoleField::Name, "CFO");
        original.record(&exchange("A?", "CFO", "B"));
        original.save(&store).unwrap();

        let mut meeting = Meeting::new(MeetingDefaults::default());
        meeting.load(&store, "Q1").unwrap();
        assert_eq!(meeting.mode(), MeetingMode::Loaded);
        assert_eq!(meeting.name(), "Q1");
        assert_eq!(meeting.history().len(), 2);
        assert_eq!(meeting.role(Seat::First).name, "CFO");

        meeting.reset();
        assert_eq!(meeting.mode(), MeetingMode::New);
        assert!(meeting.history().is_empty());
        assert_eq!(meeting.role(Seat::First).name, "Accountant");
        assert_eq!(meeting.name(), "meeting");
    }

    #[test]
    fn failed_load_keeps_state_and_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());
        let mut meeting = Meeting::new(MeetingDefaults::default());
        meeting.record(&exchange("A?", "CFO", "B"));

        assert!(meeting.load(&store, "missing").is_err());
        assert_eq!(meeting.mode(), MeetingMode::New);
        assert_eq!(meeting.history().len(), 2);
    }

    #[test]
    fn document_context_joins_sections() {
        let mut meeting = Meeting::new(MeetingDefaults::default());
        meeting.attach(vec![
            documents::extract(&Upload::new("notes.txt", Vec::new())),
            documents::extract(&Upload::new("other.md", Vec::new())),
        ]);
        let context = meeting.document_context().unwrap();
        assert!(context.starts_with("=== notes.txt ==="));
        assert!(context.contains("\n\n=== other.md ==="));

        meeting.clear_attachments();
        assert!(meeting.document_context().is_none());
    }

    #[test]
    fn save_as_renames_only_after_a_successful_write() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let broken = SessionStore::new(blocker.join("meetings"));

        let mut meeting = Meeting::new(MeetingDefaults::default());
        assert!(meeting.save_as(&broken, "Q1").is_err());
        assert_eq!(meeting.name(), "meeting");

        let store = SessionStore::new(tmp.path().join("meetings"));
        meeting.save_as(&store, "Q1").unwrap();
        assert_eq!(meeting.name(), "Q1");
        assert_eq!(store.load("Q1").unwrap().meeting_name, "Q1");
    }

    #[test]
    fn reset_clears_attachments() {
        let mut meeting = Meeting::new(MeetingDefaults::default());
        meeting.attach(vec![documents::extract(&Upload::new("notes.txt", Vec::new()))]);
        meeting.reset();
        assert!(meeting.attachments().is_empty());
    }
}
