use thiserror::Error;

use crate::EntityType;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("unknown entity type {0}")]
    UnknownEntity(String),

    #[error("unknown type {0}")]
    UnknownType(EntityType),

    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    #[error("illegal base64 data")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[cfg(feature = "json")]
    #[error("invalid JSON string")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
