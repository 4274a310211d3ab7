// ABOUTME: Core data model — role definitions, history entries, and the persisted session record.
// ABOUTME: Serde defaults make every persisted key optional so old or partial files still load.

use serde::{Deserialize, Serialize};

/// A named persona consulted for each question.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    pub name: String,
    pub backstory: String,
    #[serde(rename = "task")]
    pub task_instruction: String,
}

impl RoleConfig {
    pub fn new(
        name: impl Into<String>,
        backstory: impl Into<String>,
        task_instruction: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backstory: backstory.into(),
            task_instruction: task_instruction.into(),
        }
    }

    /// Default first seat.
    pub fn accountant() -> Self {
        Self::new(
            "Accountant",
            "A certified public accountant with twenty years of experience in corporate \
             finance, tax planning, and audit. You explain numbers plainly and flag \
             financial risk early.",
            "Analyse the question \"{question}\" from a financial and tax perspective. \
             List the key figures to check, the costs and risks involved, and give a \
             concrete recommendation.",
        )
    }

    /// Default second seat.
    pub fn lawyer() -> Self {
        Self::new(
            "Lawyer",
            "A corporate lawyer specialising in contracts, compliance, and employment \
             law. You read the fine print so the client does not have to.",
            "Review the question \"{question}\" and the accountant's analysis from a \
             legal perspective. Point out legal risks, obligations, and the documents \
             or clauses that need attention.",
        )
    }

    /// A role can be consulted only with a name and a task.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.task_instruction.trim().is_empty()
    }

    /// Replace one field by its persisted key name.
    pub fn set_field(&mut self, field: RoleField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RoleField::Name => self.name = value,
            RoleField::Backstory => self.backstory = value,
            RoleField::Task => self.task_instruction = value,
        }
    }
}

/// Editable fields of a [`RoleConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleField {
    Name,
    Backstory,
    Task,
}

impl RoleField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "backstory" => Some(Self::Backstory),
            "task" => Some(Self::Task),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Backstory => "backstory",
            Self::Task => "task",
        }
    }
}

/// Which of the two seats a role occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1" => Some(Self::First),
            "2" => Some(Self::Second),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// One recorded exchange. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub user: String,
    pub agent: String,
    pub reply: String,
}

impl HistoryEntry {
    /// Sentinel agent name for the user's own question.
    pub const USER_AGENT: &'static str = "user";

    pub fn question(question: impl Into<String>) -> Self {
        Self {
            user: question.into(),
            agent: Self::USER_AGENT.to_string(),
            reply: String::new(),
        }
    }

    pub fn reply(
        question: impl Into<String>,
        role: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        Self {
            user: question.into(),
            agent: role.into(),
            reply: reply.into(),
        }
    }

    pub fn is_question(&self) -> bool {
        self.agent == Self::USER_AGENT
    }
}

/// The on-disk form of a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub meeting_name: String,
    #[serde(default)]
    pub chat_history: Vec<HistoryEntry>,
    #[serde(default = "RoleConfig::accountant")]
    pub role1_cfg: RoleConfig,
    #[serde(default = "RoleConfig::lawyer")]
    pub role2_cfg: RoleConfig,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            meeting_name: String::new(),
            chat_history: Vec::new(),
            role1_cfg: RoleConfig::accountant(),
            role2_cfg: RoleConfig::lawyer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_task_serializes_under_task_key() {
        let role = RoleConfig::new("CFO", "numbers person", "check {question}");
        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["task"], "check {question}");
        assert!(json.get("task_instruction").is_none());
    }

    #[test]
    fn missing_session_keys_are_default_filled() {
        let record: SessionRecord = serde_json::from_str(r#"{"meeting_name":"Q1"}"#).unwrap();
        assert_eq!(record.meeting_name, "Q1");
        assert!(record.chat_history.is_empty());
        assert_eq!(record.role1_cfg, RoleConfig::accountant());
        assert_eq!(record.role2_cfg, RoleConfig::lawyer());
    }

    #[test]
    fn partial_role_fills_empty_strings() {
        let record: SessionRecord =
            serde_json::from_str(r#"{"role1_cfg":{"name":"CFO"}}"#).unwrap();
        assert_eq!(record.role1_cfg.name, "CFO");
        assert_eq!(record.role1_cfg.backstory, "");
        assert!(!record.role1_cfg.is_complete());
    }

    #[test]
    fn question_entry_uses_user_sentinel() {
        let entry = HistoryEntry::question("A?");
        assert_eq!(entry.agent, "user");
        assert_eq!(entry.reply, "");
        assert!(entry.is_question());
        assert!(!HistoryEntry::reply("A?", "CFO", "B").is_question());
    }

    #[test]
    fn set_field_replaces_one_field() {
        let mut role = RoleConfig::accountant();
        role.set_field(RoleField::parse("NAME").unwrap(), "CFO");
        assert_eq!(role.name, "CFO");
        assert_eq!(role.task_instruction, RoleConfig::accountant().task_instruction);
    }

    #[test]
    fn seat_parse() {
        assert_eq!(Seat::parse("1"), Some(Seat::First));
        assert_eq!(Seat::parse("2"), Some(Seat::Second));
        assert_eq!(Seat::parse("3"), None);
    }
}
