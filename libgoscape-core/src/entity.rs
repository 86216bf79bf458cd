use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Encode,
    Decode,
}

/// Web-data representation a transform works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Html,
    Url,
    Base64,
    Json,
}

pub static COMMANDS: &[(&str, Command)] = &[
    ("e", Command::Encode),
    ("encode", Command::Encode),
    ("d", Command::Decode),
    ("decode", Command::Decode),
];

pub static ENTITY_TYPES: &[(&str, EntityType)] = &[
    ("html", EntityType::Html),
    ("url", EntityType::Url),
    ("base64", EntityType::Base64),
    ("json", EntityType::Json),
];

/// Resolves a command token (`e`, `encode`, `d`, `decode`). Matching is case-sensitive.
pub fn resolve_command(token: &str) -> Result<Command> {
    COMMANDS
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, command)| *command)
        .ok_or_else(|| Error::UnknownCommand(token.to_string()))
}

/// Resolves an entity key (`html`, `url`, `base64`, `json`). Matching is case-sensitive.
pub fn resolve_entity(token: &str) -> Result<EntityType> {
    ENTITY_TYPES
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, entity)| *entity)
        .ok_or_else(|| Error::UnknownEntity(token.to_string()))
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve_command(s)
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve_entity(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Encode => write!(f, "encode"),
            Command::Decode => write!(f, "decode"),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = ENTITY_TYPES
            .iter()
            .find(|(_, entity)| entity == self)
            .map_or("?", |(key, _)| *key);
        f.write_str(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_command_aliases() {
        assert_eq!(resolve_command("e").unwrap(), Command::Encode);
        assert_eq!(resolve_command("encode").unwrap(), Command::Encode);
        assert_eq!(resolve_command("d").unwrap(), Command::Decode);
        assert_eq!(resolve_command("decode").unwrap(), Command::Decode);
    }

    #[test]
    fn test_resolve_command_unknown() {
        match resolve_command("x") {
            Err(Error::UnknownCommand(token)) => assert_eq!(token, "x"),
            other => panic!("expected UnknownCommand, got {:?}", other),
        }
        assert!(matches!(
            resolve_command("Encode"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(resolve_command(""), Err(Error::UnknownCommand(_))));
    }

    #[test]
    fn test_resolve_entity_keys() {
        assert_eq!(resolve_entity("html").unwrap(), EntityType::Html);
        assert_eq!(resolve_entity("url").unwrap(), EntityType::Url);
        assert_eq!(resolve_entity("base64").unwrap(), EntityType::Base64);
        assert_eq!(resolve_entity("json").unwrap(), EntityType::Json);
    }

    #[test]
    fn test_resolve_entity_unknown() {
        match resolve_entity("x") {
            Err(Error::UnknownEntity(token)) => assert_eq!(token, "x"),
            other => panic!("expected UnknownEntity, got {:?}", other),
        }
        assert!(matches!(resolve_entity("HTML"), Err(Error::UnknownEntity(_))));
    }

    #[test]
    fn test_from_str_and_display() {
        let entity: EntityType = "base64".parse().unwrap();
        assert_eq!(entity.to_string(), "base64");
        let command: Command = "d".parse().unwrap();
        assert_eq!(command.to_string(), "decode");
        assert_eq!(
            Error::UnknownEntity("xml".to_string()).to_string(),
            "unknown entity type xml"
        );
    }
}
