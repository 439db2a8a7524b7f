//! Command-line parsing for the interactive prompt.

use anyhow::{anyhow, bail, Result};

use fruitbowl_core::models::FruitInput;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Login(Option<String>),
    Logout,
    Go(String),
    Routes,
    List,
    Add(FruitInput),
    Edit(i64, FruitInput),
    Remove(i64),
    Search(String),
    WhoAmI,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login [email]              Log in (password is prompted)
  logout                     End the session
  go <path>                  Navigate to a route
  routes                     List declared routes
  list                       Show the fruit catalog
  add <name> [key=value ...] Add a fruit
  edit <id> <name> [k=v ...] Replace a fruit
  rm <id>                    Delete a fruit
  search <query>             Search the catalog
  whoami                     Show the current session
  help                       Show this help
  quit                       Exit";

pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Empty);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_lowercase().as_str() {
        "login" => match rest.as_slice() {
            [] => Command::Login(None),
            [email] if is_valid_email(email) => Command::Login(Some(email.to_string())),
            [email] => bail!("Not a valid email: {}", email),
            _ => bail!("Usage: login [email]"),
        },
        "logout" => Command::Logout,
        "go" | "cd" => match rest.as_slice() {
            [path] => Command::Go(normalize_path(path)),
            _ => bail!("Usage: go <path>"),
        },
        "routes" => Command::Routes,
        "list" | "ls" => Command::List,
        "add" => match rest.split_first() {
            Some((name, details)) => Command::Add(fruit_input(name, details)?),
            None => bail!("Usage: add <name> [key=value ...]"),
        },
        "edit" => match rest.as_slice() {
            [id, name, details @ ..] => Command::Edit(parse_id(id)?, fruit_input(name, details)?),
            _ => bail!("Usage: edit <id> <name> [key=value ...]"),
        },
        "rm" | "delete" => match rest.as_slice() {
            [id] => Command::Remove(parse_id(id)?),
            _ => bail!("Usage: rm <id>"),
        },
        "search" => {
            if rest.is_empty() {
                bail!("Usage: search <query>");
            }
            Command::Search(rest.join(" "))
        }
        "whoami" => Command::WhoAmI,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command: {} (type `help`)", other),
    };
    Ok(command)
}

fn parse_id(s: &str) -> Result<i64> {
    s.parse().map_err(|_| anyhow!("Not a valid id: {}", s))
}

fn fruit_input(name: &str, details: &[&str]) -> Result<FruitInput> {
    let mut input = FruitInput::new(name);
    for pair in details {
        let (key, value) = pair
            .split_once('=')
            .filter(|(k, _)| !k.is_empty() && *k != "id" && *k != "name")
            .ok_or_else(|| anyhow!("Expected key=value, got: {}", pair))?;
        input = input.with_detail(key, value);
    }
    Ok(input)
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

pub fn is_valid_email(s: &str) -> bool {
    if s.len() > MAX_EMAIL_LENGTH || s.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
