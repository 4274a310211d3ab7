// ABOUTME: Slash-command parser shared by the terminal UI and the plain CLI loop.
// ABOUTME: Lines starting with '/' are commands; everything else is a question for the panel.

use thiserror::Error;

use crate::model::{RoleField, Seat};

/// A meeting command typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Save(Option<String>),
    Load(String),
    List,
    New,
    Rename(String),
    Attach(Vec<String>),
    Detach,
    Role {
        seat: Seat,
        field: RoleField,
        value: String,
    },
    Roles,
    History,
    Quit,
}

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Question(String),
    Command(Command),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("input is empty")]
    Empty,
    #[error("unknown command '/{0}'. Type /help for the list of commands")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
/help                               show this help
/save [name]                        save the meeting (optionally under a new name)
/load <name>                        load a saved meeting
/list                               list saved meetings
/new                                start a fresh meeting with default roles
/rename <name>                      rename the current meeting
/attach <path-or-glob>...           add PDF/DOCX/XLSX files as reference documents
/detach                             drop all attached documents
/role <1|2> <name|backstory|task> <text>
                                    edit a role
/roles                              show both roles
/history                            show the numbered transcript
/quit                               leave";

/// Parse a line of user input.
pub fn parse(line: &str) -> Result<Input, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let Some(body) = line.strip_prefix('/') else {
        return Ok(Input::Question(line.to_string()));
    };

    let (name, rest) = split_word(body);
    let command = match name.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "save" => Command::Save(non_empty(rest)),
        "load" => Command::Load(non_empty(rest).ok_or(CommandError::Usage("/load <name>"))?),
        "list" | "sessions" => Command::List,
        "new" | "reset" => Command::New,
        "rename" => {
            Command::Rename(non_empty(rest).ok_or(CommandError::Usage("/rename <name>"))?)
        }
        "attach" => {
            let paths: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
            if paths.is_empty() {
                return Err(CommandError::Usage("/attach <path-or-glob>..."));
            }
            Command::Attach(paths)
        }
        "detach" => Command::Detach,
        "role" => parse_role(rest)?,
        "roles" => Command::Roles,
        "history" => Command::History,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Input::Command(command))
}

fn parse_role(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "/role <1|2> <name|backstory|task> <text>";
    let (seat, rest) = split_word(rest);
    let (field, value) = split_word(rest);
    let seat = Seat::parse(seat).ok_or(CommandError::Usage(USAGE))?;
    let field = RoleField::parse(field).ok_or(CommandError::Usage(USAGE))?;
    let value = non_empty(value).ok_or(CommandError::Usage(USAGE))?;
    Ok(Command::Role { seat, field, value })
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
