use std::fmt;
use std::str::FromStr;

use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// The kind of focus activity a timer or session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "lowercase")]
#[postgres(name = "session_mode", rename_all = "lowercase")]
pub enum SessionMode {
    Study,
    Deepwork,
    Yoga,
    Zen,
}

impl SessionMode {
    /// Wire names, in declaration order.
    pub const NAMES: &'static [&'static str] = &["study", "deepwork", "yoga", "zen"];

    pub const ALL: [SessionMode; 4] = [
        SessionMode::Study,
        SessionMode::Deepwork,
        SessionMode::Yoga,
        SessionMode::Zen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Study => "study",
            SessionMode::Deepwork => "deepwork",
            SessionMode::Yoga => "yoga",
            SessionMode::Zen => "zen",
        }
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown session mode '{}'", s))
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work or break sub-state of a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub const NAMES: &'static [&'static str] = &["work", "break"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "lowercase")]
#[postgres(name = "theme", rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub const NAMES: &'static [&'static str] = &["light", "dark", "system"];
}

/// Background sound played during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "lowercase")]
#[postgres(name = "ambient_sound", rename_all = "lowercase")]
pub enum AmbientSound {
    #[default]
    Silence,
    Rain,
    Forest,
    Ocean,
    Cafe,
    Whitenoise,
}

impl AmbientSound {
    pub const NAMES: &'static [&'static str] =
        &["silence", "rain", "forest", "ocean", "cafe", "whitenoise"];
}
