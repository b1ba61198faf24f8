use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AmbientSound, SessionMode, Theme};

/// Per-user settings. One record per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: Uuid,
    pub theme: Theme,
    pub default_session_mode: SessionMode,
    pub ambient_sound: AmbientSound,
    /// 0..=100.
    pub ambient_volume: u8,
    pub notifications: bool,
    pub auto_start_breaks: bool,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /api/users/me/preferences`. Every field is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub theme: Theme,
    pub default_session_mode: SessionMode,
    pub ambient_sound: AmbientSound,
    pub ambient_volume: u8,
    pub notifications: bool,
    pub auto_start_breaks: bool,
}

impl UserPreferences {
    /// The settings a freshly registered user starts with.
    pub fn defaults(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            theme: Theme::System,
            default_session_mode: SessionMode::Study,
            ambient_sound: AmbientSound::Silence,
            ambient_volume: 50,
            notifications: true,
            auto_start_breaks: false,
            updated_at: now,
        }
    }

    pub fn replaced(user_id: Uuid, req: UpdatePreferencesRequest, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            theme: req.theme,
            default_session_mode: req.default_session_mode,
            ambient_sound: req.ambient_sound,
            ambient_volume: req.ambient_volume.min(100),
            notifications: req.notifications,
            auto_start_breaks: req.auto_start_breaks,
            updated_at: now,
        }
    }
}
