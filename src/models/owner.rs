use std::fmt;

use uuid::Uuid;

use crate::{error::Result, validation::auth::validate_guest_id};

/// An opaque identifier a browser generates for itself before signing up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuestKey(String);

impl GuestKey {
    /// Parses the value of an `X-Guest-Id` header.
    pub fn parse(raw: &str) -> Result<Self> {
        validate_guest_id(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whoever a timer snapshot or focus session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    User(Uuid),
    Guest(GuestKey),
}

impl Owner {
    /// The key the owner's records are stored under in flat key spaces (Redis, memory maps).
    pub fn storage_key(&self) -> String {
        match self {
            Owner::User(id) => format!("user:{}", id),
            Owner::Guest(key) => format!("guest:{}", key.as_str()),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Owner::User(id) => Some(*id),
            Owner::Guest(_) => None,
        }
    }

    pub fn guest_key(&self) -> Option<&str> {
        match self {
            Owner::User(_) => None,
            Owner::Guest(key) => Some(key.as_str()),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}
