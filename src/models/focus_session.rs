use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::enums::{AmbientSound, SessionMode};
use super::owner::Owner;
use crate::{
    error::{AppError, Result},
    validation::predicates::{end_of_day, in_range, is_member, parse_datetime},
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

fn serialize_owner<S: Serializer>(owner: &Owner, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    owner.user_id().serialize(serializer)
}

/// One completed or interrupted focus session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: Uuid,
    /// Serialized as `userId`, which is `null` for guests.
    #[serde(rename = "userId", serialize_with = "serialize_owner")]
    pub owner: Owner,
    pub mode: SessionMode,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Minutes.
    pub planned_duration: u32,
    /// Seconds.
    pub actual_duration: u32,
    pub completed_fully: bool,
    pub pause_count: u32,
    /// Seconds.
    pub total_pause_time: u32,
    pub ambient_sound: AmbientSound,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/sessions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub mode: SessionMode,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub planned_duration: u32,
    #[serde(default)]
    pub actual_duration: u32,
    #[serde(default)]
    pub completed_fully: bool,
    #[serde(default)]
    pub pause_count: u32,
    #[serde(default)]
    pub total_pause_time: u32,
    #[serde(default)]
    pub ambient_sound: AmbientSound,
    pub notes: Option<String>,
}

/// Body of `PUT /api/sessions/{id}`. Absent fields keep their value; `notes: null` clears.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub mode: Option<SessionMode>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub planned_duration: Option<u32>,
    pub actual_duration: Option<u32>,
    pub completed_fully: Option<bool>,
    pub pause_count: Option<u32>,
    pub total_pause_time: Option<u32>,
    pub ambient_sound: Option<AmbientSound>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

fn parse_time(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    parse_datetime(raw)
        .ok_or_else(|| AppError::Validation(format!("{} must be an ISO-8601 datetime", field)))
}

impl FocusSession {
    pub fn new(owner: Owner, req: CreateSessionRequest, now: DateTime<Utc>) -> Result<Self> {
        let start_time = match req.start_time.as_deref() {
            Some(raw) => parse_time("startTime", raw)?,
            None => now,
        };
        let end_time = req
            .end_time
            .as_deref()
            .map(|raw| parse_time("endTime", raw))
            .transpose()?;

        let session = Self {
            id: Uuid::new_v4(),
            owner,
            mode: req.mode,
            start_time,
            end_time,
            planned_duration: req.planned_duration,
            actual_duration: req.actual_duration,
            completed_fully: req.completed_fully,
            pause_count: req.pause_count,
            total_pause_time: req.total_pause_time,
            ambient_sound: req.ambient_sound,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };
        session.check_consistency()?;
        Ok(session)
    }

    /// Applies `patch` and re-checks the cross-field rules on the merged record.
    pub fn apply(&mut self, patch: UpdateSessionRequest, now: DateTime<Utc>) -> Result<()> {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(raw) = patch.start_time.as_deref() {
            self.start_time = parse_time("startTime", raw)?;
        }
        if let Some(raw) = patch.end_time.as_deref() {
            self.end_time = Some(parse_time("endTime", raw)?);
        }
        if let Some(planned) = patch.planned_duration {
            self.planned_duration = planned;
        }
        if let Some(actual) = patch.actual_duration {
            self.actual_duration = actual;
        }
        if let Some(completed) = patch.completed_fully {
            self.completed_fully = completed;
        }
        if let Some(pauses) = patch.pause_count {
            self.pause_count = pauses;
        }
        if let Some(paused) = patch.total_pause_time {
            self.total_pause_time = paused;
        }
        if let Some(sound) = patch.ambient_sound {
            self.ambient_sound = sound;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = now;
        self.check_consistency()
    }

    fn check_consistency(&self) -> Result<()> {
        if let Some(end) = self.end_time {
            if end <= self.start_time {
                return Err(AppError::Validation(
                    "endTime must be after startTime".to_string(),
                ));
            }
        }
        if self.total_pause_time > self.actual_duration {
            return Err(AppError::Validation(
                "totalPauseTime cannot exceed actualDuration".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query parameters of `GET /api/sessions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFilter {
    pub limit: u32,
    pub offset: u32,
    pub mode: Option<SessionMode>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            mode: None,
            from: None,
            to: None,
        }
    }
}

fn parse_count(params: &HashMap<String, String>, name: &str, min: i64, max: i64) -> Result<Option<u32>> {
    let Some(raw) = params.get(name) else {
        return Ok(None);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer", name)))?;
    if !in_range(value, min, max) {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(Some(value as u32))
}

impl SessionFilter {
    /// Parses and validates the raw query string pairs, first error wins.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self> {
        let defaults = SessionFilter::default();
        let limit = parse_count(params, "limit", 1, MAX_PAGE_SIZE as i64)?.unwrap_or(defaults.limit);
        let offset = parse_count(params, "offset", 0, u32::MAX as i64)?.unwrap_or(defaults.offset);

        let mode = match params.get("mode") {
            Some(raw) if is_member(raw, SessionMode::NAMES) => raw.parse().ok(),
            Some(_) => {
                return Err(AppError::Validation(format!(
                    "mode must be one of: {}",
                    SessionMode::NAMES.join(", ")
                )));
            }
            None => None,
        };

        let from = params
            .get("fromDate")
            .map(|raw| parse_time("fromDate", raw))
            .transpose()?;
        let to = params
            .get("toDate")
            .map(|raw| end_of_day(raw).map_or_else(|| parse_time("toDate", raw), Ok))
            .transpose()?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::Validation(
                    "fromDate must not be after toDate".to_string(),
                ));
            }
        }

        Ok(Self {
            limit,
            offset,
            mode,
            from,
            to,
        })
    }

    /// Whether `session` passes the mode and date filters (paging aside).
    pub fn matches(&self, session: &FocusSession) -> bool {
        self.mode.is_none_or(|mode| session.mode == mode)
            && self.from.is_none_or(|from| session.start_time >= from)
            && self.to.is_none_or(|to| session.start_time <= to)
    }
}

/// Response of `GET /api/sessions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPage {
    pub sessions: Vec<FocusSession>,
    pub total: u64,
    pub has_more: bool,
}

impl SessionPage {
    pub fn new(sessions: Vec<FocusSession>, total: u64, filter: &SessionFilter) -> Self {
        let has_more = (filter.offset as u64 + sessions.len() as u64) < total;
        Self {
            sessions,
            total,
            has_more,
        }
    }
}
