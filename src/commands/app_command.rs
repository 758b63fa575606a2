use crate::console::{Level, ScreenKind, Target};
use std::str::FromStr;

pub const HELP: &str = "Commands: screen <leagues|teams|standings|titles|players> | league <id|none> | team <id|none> | player <id|none> | add [title|history] | edit <id> | set <field> <value...> | save | cancel | delete [title|history] <id> | yes | no | reload | theme | help | quit";

/// Words offered by Tab completion, in order of preference.
pub const COMMAND_WORDS: [&str; 17] = [
    "screen", "league", "team", "player", "add", "edit", "set", "save", "cancel", "delete",
    "yes", "no", "reload", "theme", "help", "quit", "none",
];

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Screen(ScreenKind),
    Select { level: Level, id: Option<i64> },
    Add(Target),
    Edit { id: i64 },
    Set { field: String, value: String },
    Save,
    Cancel,
    Delete { target: Target, id: i64 },
    Confirm,
    Decline,
    Reload,
    Theme,
    Help,
    Quit,
    Unknown(String),
}

fn parse_target(word: Option<&&str>) -> Option<Target> {
    match word.map(|w| w.to_ascii_lowercase()).as_deref() {
        Some("title") | Some("titles") | Some("titulo") => Some(Target::Title),
        Some("history") | Some("historial") => Some(Target::History),
        _ => None,
    }
}

fn parse_id(word: Option<&&str>) -> Option<i64> {
    word.and_then(|s| s.parse::<i64>().ok()).filter(|id| *id > 0)
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        match parts[0] {
            "screen" | "go" => match parts.get(1).map(|s| s.parse::<ScreenKind>()) {
                Some(Ok(kind)) => Ok(AppCommand::Screen(kind)),
                Some(Err(msg)) => Ok(AppCommand::Unknown(msg)),
                None => Ok(AppCommand::Unknown(
                    "Usage: screen <leagues|teams|standings|titles|players>".to_string(),
                )),
            },
            "league" | "team" | "player" => {
                let level = match parts[0] {
                    "league" => Level::League,
                    "team" => Level::Team,
                    _ => Level::Player,
                };
                match parts.get(1).copied() {
                    Some("none") | Some("-") => Ok(AppCommand::Select { level, id: None }),
                    _ => match parse_id(parts.get(1)) {
                        Some(id) => Ok(AppCommand::Select {
                            level,
                            id: Some(id),
                        }),
                        None => Ok(AppCommand::Unknown(format!("Usage: {} <id|none>", parts[0]))),
                    },
                }
            }
            "add" | "new" => match parts.get(1) {
                None => Ok(AppCommand::Add(Target::Primary)),
                some => match parse_target(some) {
                    Some(t) => Ok(AppCommand::Add(t)),
                    None => Ok(AppCommand::Unknown("Usage: add [title|history]".to_string())),
                },
            },
            "edit" => match parse_id(parts.get(1)) {
                Some(id) => Ok(AppCommand::Edit { id }),
                None => Ok(AppCommand::Unknown("Usage: edit <id>".to_string())),
            },
            "set" => match parts.get(1) {
                Some(field) => Ok(AppCommand::Set {
                    field: field.to_string(),
                    value: parts[2..].join(" "),
                }),
                None => Ok(AppCommand::Unknown("Usage: set <field> <value...>".to_string())),
            },
            "save" | "submit" => Ok(AppCommand::Save),
            "cancel" | "close" => Ok(AppCommand::Cancel),
            "delete" | "del" | "rm" => {
                let (target, id_word) = match parse_target(parts.get(1)) {
                    Some(t) => (t, parts.get(2)),
                    None => (Target::Primary, parts.get(1)),
                };
                match parse_id(id_word) {
                    Some(id) => Ok(AppCommand::Delete { target, id }),
                    None => Ok(AppCommand::Unknown(
                        "Usage: delete [title|history] <id>".to_string(),
                    )),
                }
            }
            "yes" | "y" => Ok(AppCommand::Confirm),
            "no" | "n" => Ok(AppCommand::Decline),
            "reload" | "refresh" => Ok(AppCommand::Reload),
            "theme" => Ok(AppCommand::Theme),
            "help" | "h" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Quit),
            _ => Ok(AppCommand::Unknown(format!("Unknown command: {}", parts[0]))),
        }
    }
}
