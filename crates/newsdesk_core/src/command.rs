use crate::{Category, NotificationId, SavedId, SortKey};

pub const HELP_TEXT: &str = "Available commands: help, next, prev, save, clear, \
search <query>, category <name>, refresh, articles, saved, find <text>, tag <label>, \
tags <id> <a,b>, sort <date|title|source>, remove <id>, share [id], export, layout, \
dismiss <id>, quit";

/// An action typed into the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Next,
    Previous,
    Save,
    Clear,
    /// Search the news API; an empty query returns to headlines.
    Search(String),
    Category(Category),
    Refresh,
    ShowArticles,
    ShowSaved,
    /// Free-text search over saved articles (debounced).
    Find(String),
    ToggleTag(String),
    EditTags { id: SavedId, tags: Vec<String> },
    Sort(SortKey),
    Remove(SavedId),
    /// Share a saved article, or the current one when no id is given.
    Share(Option<SavedId>),
    Export,
    ToggleLayout,
    Dismiss(NotificationId),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command. Type \"help\" for available commands")]
    Unknown(String),
    #[error("Command \"{command}\" needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("Invalid argument for \"{command}\": {value}")]
    InvalidArgument { command: &'static str, value: String },
}

/// Parses one line of command input. Blank input yields `Ok(None)`.
///
/// The verb is case-insensitive; arguments keep their case.
pub fn parse_command(input: &str) -> Result<Option<Command>, CommandError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match input.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (input, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "help" => Command::Help,
        "next" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "save" => Command::Save,
        "clear" => Command::Clear,
        "search" => Command::Search(rest.to_string()),
        "category" => {
            let name = required(rest, "category", "a category name")?;
            let category = name
                .parse::<Category>()
                .map_err(|err| invalid("category", err.0))?;
            Command::Category(category)
        }
        "refresh" => Command::Refresh,
        "articles" => Command::ShowArticles,
        "saved" => Command::ShowSaved,
        "find" => Command::Find(rest.to_string()),
        "tag" => Command::ToggleTag(required(rest, "tag", "a tag label")?.to_string()),
        "tags" => {
            let args = required(rest, "tags", "an article id")?;
            let (id, labels) = match args.split_once(char::is_whitespace) {
                Some((id, labels)) => (id, labels),
                None => (args, ""),
            };
            Command::EditTags {
                id: parse_id("tags", id)?,
                tags: labels.split(',').map(|tag| tag.trim().to_string()).collect(),
            }
        }
        "sort" => {
            let key = required(rest, "sort", "date, title or source")?;
            Command::Sort(key.parse::<SortKey>().map_err(|err| invalid("sort", err.0))?)
        }
        "remove" => Command::Remove(parse_id(
            "remove",
            required(rest, "remove", "an article id")?,
        )?),
        "share" => {
            if rest.is_empty() {
                Command::Share(None)
            } else {
                Command::Share(Some(parse_id("share", rest)?))
            }
        }
        "export" => Command::Export,
        "layout" => Command::ToggleLayout,
        "dismiss" => Command::Dismiss(parse_id(
            "dismiss",
            required(rest, "dismiss", "a notification id")?,
        )?),
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(input.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn parse_id(command: &'static str, raw: &str) -> Result<u64, CommandError> {
    raw.trim().parse::<u64>().map_err(|_| invalid(command, raw))
}

fn invalid(command: &'static str, value: impl Into<String>) -> CommandError {
    CommandError::InvalidArgument {
        command,
        value: value.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_verbs_parse() {
        assert_eq!(parse_command("help"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("  NEXT "), Ok(Some(Command::Next)));
        assert_eq!(parse_command("prev"), Ok(Some(Command::Previous)));
        assert_eq!(parse_command("previous"), Ok(Some(Command::Previous)));
        assert_eq!(parse_command("save"), Ok(Some(Command::Save)));
        assert_eq!(parse_command("clear"), Ok(Some(Command::Clear)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn arguments_keep_case() {
        assert_eq!(
            parse_command("search Rust Lang"),
            Ok(Some(Command::Search("Rust Lang".to_string())))
        );
        assert_eq!(
            parse_command("tags 42 Tech, Daily ,"),
            Ok(Some(Command::EditTags {
                id: 42,
                tags: vec!["Tech".to_string(), "Daily".to_string(), String::new()],
            }))
        );
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(
            parse_command("dance"),
            Err(CommandError::Unknown(_))
        ));
        assert!(matches!(
            parse_command("remove"),
            Err(CommandError::MissingArgument { command: "remove", .. })
        ));
        assert!(matches!(
            parse_command("remove abc"),
            Err(CommandError::InvalidArgument { command: "remove", .. })
        ));
        assert!(matches!(
            parse_command("sort popularity"),
            Err(CommandError::InvalidArgument { command: "sort", .. })
        ));
        assert_eq!(
            CommandError::Unknown("dance".into()).to_string(),
            "Unknown command. Type \"help\" for available commands"
        );
    }
}
