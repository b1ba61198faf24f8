//! Constraint tables, one per request body.

use super::schema::{FieldRule, Kind, UNBOUNDED};
use crate::models::enums::{AmbientSound, Phase, SessionMode, Theme};

const MODE: Kind = Kind::Enum(SessionMode::NAMES);
const SOUND: Kind = Kind::Enum(AmbientSound::NAMES);
const COUNTER: Kind = Kind::Int { min: 0, max: UNBOUNDED };

pub const TIMER_STATE: &[FieldRule] = &[
    FieldRule::required("mode", MODE),
    FieldRule::required("phase", Kind::Enum(Phase::NAMES)),
    FieldRule::optional("isActive", Kind::Bool),
    FieldRule::optional("isPaused", Kind::Bool),
    FieldRule::required("timeRemaining", COUNTER),
    FieldRule::optional("totalElapsed", COUNTER),
    FieldRule::optional("currentCycle", Kind::Int { min: 1, max: UNBOUNDED }),
];

/// Minutes in a day. No single session is planned to run longer.
pub const MAX_PLANNED_MINUTES: i64 = 24 * 60;

const PLANNED_DURATION: Kind = Kind::Int { min: 1, max: MAX_PLANNED_MINUTES };
const NOTES: Kind = Kind::Str { min_len: 0, max_len: 500 };

pub const SESSION_CREATE: &[FieldRule] = &[
    FieldRule::required("mode", MODE),
    FieldRule::optional("startTime", Kind::DateTime).nullable(),
    FieldRule::optional("endTime", Kind::DateTime).nullable(),
    FieldRule::required("plannedDuration", PLANNED_DURATION),
    FieldRule::optional("actualDuration", COUNTER),
    FieldRule::optional("completedFully", Kind::Bool),
    FieldRule::optional("pauseCount", COUNTER),
    FieldRule::optional("totalPauseTime", COUNTER),
    FieldRule::optional("ambientSound", SOUND),
    FieldRule::optional("notes", NOTES).nullable(),
];

pub const SESSION_UPDATE: &[FieldRule] = &[
    FieldRule::optional("mode", MODE),
    FieldRule::optional("startTime", Kind::DateTime),
    FieldRule::optional("endTime", Kind::DateTime),
    FieldRule::optional("plannedDuration", PLANNED_DURATION),
    FieldRule::optional("actualDuration", COUNTER),
    FieldRule::optional("completedFully", Kind::Bool),
    FieldRule::optional("pauseCount", COUNTER),
    FieldRule::optional("totalPauseTime", COUNTER),
    FieldRule::optional("ambientSound", SOUND),
    FieldRule::optional("notes", NOTES).nullable(),
];

const INTERVAL_NAME: Kind = Kind::Str { min_len: 1, max_len: 50 };
const WORK_DURATION: Kind = Kind::Int { min: 1, max: 180 };
const BREAK_DURATION: Kind = Kind::Int { min: 0, max: 60 };

pub const INTERVAL_CREATE: &[FieldRule] = &[
    FieldRule::required("name", INTERVAL_NAME),
    FieldRule::required("workDuration", WORK_DURATION),
    FieldRule::required("breakDuration", BREAK_DURATION),
    FieldRule::optional("sessionMode", MODE),
    FieldRule::optional("isActive", Kind::Bool),
];

pub const INTERVAL_UPDATE: &[FieldRule] = &[
    FieldRule::optional("name", INTERVAL_NAME),
    FieldRule::optional("workDuration", WORK_DURATION),
    FieldRule::optional("breakDuration", BREAK_DURATION),
    FieldRule::optional("sessionMode", MODE),
    FieldRule::optional("isActive", Kind::Bool),
];

pub const PREFERENCES: &[FieldRule] = &[
    FieldRule::required("theme", Kind::Enum(Theme::NAMES)),
    FieldRule::required("defaultSessionMode", MODE),
    FieldRule::required("ambientSound", SOUND),
    FieldRule::required("ambientVolume", Kind::Int { min: 0, max: 100 }),
    FieldRule::required("notifications", Kind::Bool),
    FieldRule::required("autoStartBreaks", Kind::Bool),
];

const EMAIL: Kind = Kind::Str { min_len: 1, max_len: 254 };
const PASSWORD: Kind = Kind::Str { min_len: 1, max_len: 128 };

pub const REGISTER: &[FieldRule] = &[
    FieldRule::required("email", EMAIL),
    FieldRule::required("password", PASSWORD),
    FieldRule::optional("name", Kind::Str { min_len: 1, max_len: 100 }).nullable(),
];

pub const LOGIN: &[FieldRule] = &[
    FieldRule::required("email", EMAIL),
    FieldRule::required("password", PASSWORD),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, validation::schema::validate};

    fn check(rules: &[FieldRule], json: &str) -> Result<(), String> {
        let value: sonic_rs::Value = sonic_rs::from_str(json).unwrap();
        validate(&value, rules).map_err(|e| match e {
            AppError::Validation(msg) => msg,
            other => other.to_string(),
        })
    }

    #[test]
    fn timer_rejects_unknown_mode_and_phase() {
        check(TIMER_STATE, r#"{"mode":"zen","phase":"break","timeRemaining":0}"#).unwrap();
        assert!(check(TIMER_STATE, r#"{"mode":"nap","phase":"work","timeRemaining":0}"#)
            .unwrap_err()
            .starts_with("mode"));
        assert!(check(TIMER_STATE, r#"{"mode":"zen","phase":"rest","timeRemaining":0}"#)
            .unwrap_err()
            .starts_with("phase"));
        assert!(check(TIMER_STATE, r#"{"mode":"zen","phase":"work","timeRemaining":0,"currentCycle":0}"#)
            .unwrap_err()
            .starts_with("currentCycle"));
    }

    #[test]
    fn interval_duration_boundaries() {
        let body = |work: i64, brk: i64| {
            format!(r#"{{"name":"n","workDuration":{},"breakDuration":{}}}"#, work, brk)
        };
        assert!(check(INTERVAL_CREATE, &body(1, 0)).is_ok());
        assert!(check(INTERVAL_CREATE, &body(180, 60)).is_ok());
        assert!(check(INTERVAL_CREATE, &body(0, 0)).is_err());
        assert!(check(INTERVAL_CREATE, &body(181, 0)).is_err());
        assert!(check(INTERVAL_CREATE, &body(25, 61)).is_err());
        assert!(check(INTERVAL_CREATE, &body(25, -1)).is_err());
    }

    #[test]
    fn interval_name_length() {
        let name = |n: &str| format!(r#"{{"name":"{}","workDuration":25,"breakDuration":5}}"#, n);
        assert!(check(INTERVAL_CREATE, &name(&"x".repeat(50))).is_ok());
        assert!(check(INTERVAL_CREATE, &name(&"x".repeat(51))).is_err());
        assert!(check(INTERVAL_CREATE, &name("")).is_err());
        assert!(check(INTERVAL_UPDATE, "{}").is_ok());
    }

    #[test]
    fn preferences_require_every_field() {
        let full = r#"{"theme":"dark","defaultSessionMode":"zen","ambientSound":"rain",
            "ambientVolume":100,"notifications":false,"autoStartBreaks":true}"#;
        check(PREFERENCES, full).unwrap();
        assert_eq!(
            check(PREFERENCES, r#"{"theme":"dark"}"#).unwrap_err(),
            "defaultSessionMode is required"
        );
    }

    #[test]
    fn planned_duration_is_capped_at_one_day() {
        let body = |minutes: i64| format!(r#"{{"mode":"zen","plannedDuration":{}}}"#, minutes);
        assert!(check(SESSION_CREATE, &body(1)).is_ok());
        assert!(check(SESSION_CREATE, &body(1440)).is_ok());
        assert_eq!(
            check(SESSION_CREATE, &body(1441)).unwrap_err(),
            "plannedDuration must be between 1 and 1440"
        );
        assert!(check(SESSION_UPDATE, &body(0)).is_err());
    }

    #[test]
    fn session_notes_limit() {
        let body = format!(r#"{{"mode":"study","plannedDuration":25,"notes":"{}"}}"#, "n".repeat(501));
        assert_eq!(
            check(SESSION_CREATE, &body).unwrap_err(),
            "notes must be at most 500 characters"
        );
        assert!(check(SESSION_CREATE, r#"{"plannedDuration":25}"#).is_err());
    }
}
