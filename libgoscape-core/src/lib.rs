//! Encoding and decoding of web-specific values: HTML entities, URL query strings, Base64
//! and JSON string literals.

pub mod b64;
mod entities;
pub mod entity;
pub mod error;
pub mod html;
#[cfg(feature = "json")]
pub mod json;
pub mod transform;
pub mod url;

pub use entity::{resolve_command, resolve_entity, Command, EntityType, COMMANDS, ENTITY_TYPES};
pub use error::{Error, Result};
pub use transform::{decode, encode, transform};
