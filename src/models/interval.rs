use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::SessionMode;

/// A user-defined work/break pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomInterval {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Minutes, 1..=180.
    pub work_duration: u32,
    /// Minutes, 0..=60.
    pub break_duration: u32,
    pub session_mode: SessionMode,
    pub is_active: bool,
    pub usage_count: u32,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_mode() -> SessionMode {
    SessionMode::Study
}

fn default_active() -> bool {
    true
}

/// Body of `POST /api/custom-intervals`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntervalRequest {
    pub name: String,
    pub work_duration: u32,
    pub break_duration: u32,
    #[serde(default = "default_mode")]
    pub session_mode: SessionMode,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Body of `PUT /api/custom-intervals/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntervalRequest {
    pub name: Option<String>,
    pub work_duration: Option<u32>,
    pub break_duration: Option<u32>,
    pub session_mode: Option<SessionMode>,
    pub is_active: Option<bool>,
}

impl CustomInterval {
    pub fn new(user_id: Uuid, req: CreateIntervalRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: req.name.trim().to_string(),
            work_duration: req.work_duration,
            break_duration: req.break_duration,
            session_mode: req.session_mode,
            is_active: req.is_active,
            usage_count: 0,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: UpdateIntervalRequest, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(work) = patch.work_duration {
            self.work_duration = work;
        }
        if let Some(brk) = patch.break_duration {
            self.break_duration = brk;
        }
        if let Some(mode) = patch.session_mode {
            self.session_mode = mode;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
    }

    /// Records one more use of the interval.
    pub fn mark_used(&mut self, now: DateTime<Utc>) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_used_at = Some(now);
        self.updated_at = now;
    }
}
