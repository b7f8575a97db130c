use anyhow::{bail, Context, Result};
use log::debug;
use regex::Regex;

use crate::game::node::{ActionKind, Approach};

// ---------------------------------------------------------------------------
// Console commands
// ---------------------------------------------------------------------------

/// One line of player input at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    Act(ActionKind, String),
    Hub,
    State,
    Restart,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  select <suspect>     start interrogating a suspect
  probe | pry | provoke
  present <evidence>   show an evidence item (alias: evidence)
  back                 return to the suspect list (alias: hub)
  state                print the current snapshot as JSON
  restart              start a fresh session
  quit                 leave the game";

/// Parse a console line. Case and surrounding whitespace are ignored.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim().to_lowercase();

    let re = Regex::new(r"^(?P<verb>[a-z]+)(?:\s+(?P<arg>[a-z0-9_\-]+))?$")
        .context("failed to build command pattern")?;
    let caps = re
        .captures(&line)
        .with_context(|| format!("unrecognised input '{line}'"))?;

    let verb = caps.name("verb").map_or("", |m| m.as_str());
    let arg = caps.name("arg").map(|m| m.as_str().to_string());
    debug!("Parsed command verb={verb} arg={arg:?}");

    let command = match (verb, arg) {
        ("select" | "talk", Some(id)) => Command::Select(id),
        ("present" | "evidence" | "show", Some(id)) => Command::Act(ActionKind::Evidence, id),
        (v, None) if v.parse::<Approach>().is_ok() => {
            Command::Act(ActionKind::Approach, v.to_string())
        }
        ("back" | "hub", None) => Command::Hub,
        ("state", None) => Command::State,
        ("restart", None) => Command::Restart,
        ("help", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        ("select" | "talk" | "present" | "evidence" | "show", None) => {
            bail!("'{verb}' needs an id")
        }
        (v, _) => bail!("unknown command '{v}'"),
    };
    Ok(command)
}
