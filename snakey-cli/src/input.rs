//! Parsing of the commands typed on stdin.
//!
//! The terminal stands in for the overlay's right-click menu and dialogs:
//! each line is one menu pick or dialog answer.

use snakey_core::MenuAction;
use std::path::PathBuf;

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  joke                 Tell me a joke!
  say <text>           Talk! (speak free text)
  web                  Surf the Web!
  image <path>         Settings: image when not moving
  moving-image <path>  Settings: image when moving
  clear-data yes       Settings: clear collected data and quit
  name <your name>     answer the name question
  drag <dx> <dy>       drag the pet by an offset
  where                show where the pet is
  help                 show this help
  quit                 Quit";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A context menu action.
    Menu(MenuAction),
    /// The user's answer to the name question.
    Name(String),
    /// Drag the overlay.
    Drag(i32, i32),
    /// Print the pet's position.
    Where,
    /// Print the help text.
    Help,
    /// Nothing to do (blank line).
    Nothing,
}

/// Parse one line of input.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Nothing,
        "joke" => Command::Menu(MenuAction::TellJoke),
        "say" | "talk" => {
            if rest.is_empty() {
                return Err("say what? usage: say <text>".to_string());
            }
            Command::Menu(MenuAction::Talk(rest.to_string()))
        }
        "web" | "surf" => Command::Menu(MenuAction::SurfWeb),
        "image" => Command::Menu(MenuAction::SelectIdleImage(path_arg(rest, "image")?)),
        "moving-image" => Command::Menu(MenuAction::SelectMovingImage(path_arg(
            rest,
            "moving-image",
        )?)),
        "clear-data" => {
            if rest != "yes" {
                return Err(
                    "this forgets everything and quits; type 'clear-data yes' to confirm"
                        .to_string(),
                );
            }
            Command::Menu(MenuAction::ClearData)
        }
        "name" => {
            if rest.is_empty() {
                return Err("usage: name <your name>".to_string());
            }
            Command::Name(rest.to_string())
        }
        "drag" => {
            let mut parts = rest.split_whitespace();
            let (Some(dx), Some(dy), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err("usage: drag <dx> <dy>".to_string());
            };
            let dx = dx.parse().map_err(|e| format!("invalid dx '{}': {}", dx, e))?;
            let dy = dy.parse().map_err(|e| format!("invalid dy '{}': {}", dy, e))?;
            Command::Drag(dx, dy)
        }
        "where" => Command::Where,
        "help" | "menu" | "?" => Command::Help,
        "quit" | "exit" => Command::Menu(MenuAction::Quit),
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(command)
}

fn path_arg(rest: &str, command: &str) -> Result<PathBuf, String> {
    if rest.is_empty() {
        return Err(format!("usage: {} <path>", command));
    }
    Ok(PathBuf::from(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_commands() {
        assert_eq!(parse("joke"), Ok(Command::Menu(MenuAction::TellJoke)));
        assert_eq!(parse("  WEB "), Ok(Command::Menu(MenuAction::SurfWeb)));
        assert_eq!(parse("quit"), Ok(Command::Menu(MenuAction::Quit)));
        assert_eq!(
            parse("say hello   there"),
            Ok(Command::Menu(MenuAction::Talk("hello   there".to_string())))
        );
        assert_eq!(
            parse("image /pics/my snake.png"),
            Ok(Command::Menu(MenuAction::SelectIdleImage(PathBuf::from(
                "/pics/my snake.png"
            ))))
        );
        assert_eq!(
            parse("moving-image run.jpg"),
            Ok(Command::Menu(MenuAction::SelectMovingImage(PathBuf::from(
                "run.jpg"
            ))))
        );
    }

    #[test]
    fn test_clear_data_needs_confirmation() {
        assert!(parse("clear-data").is_err());
        assert_eq!(
            parse("clear-data yes"),
            Ok(Command::Menu(MenuAction::ClearData))
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(parse(""), Ok(Command::Nothing));
        assert_eq!(parse("name Ada Lovelace"), Ok(Command::Name("Ada Lovelace".to_string())));
        assert_eq!(parse("drag -10 25"), Ok(Command::Drag(-10, 25)));
        assert_eq!(parse("where"), Ok(Command::Where));
        assert_eq!(parse("help"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("say").is_err());
        assert!(parse("name").is_err());
        assert!(parse("image").is_err());
        assert!(parse("drag 1").is_err());
        assert!(parse("drag 1 2 3").is_err());
        assert!(parse("drag a b").is_err());
        assert!(parse("dance").unwrap_err().contains("unknown command"));
    }
}
