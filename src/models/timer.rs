use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Phase, SessionMode};
use super::interval::CustomInterval;
use super::session_mode::mode_info;

/// The snapshot of an owner's current timer.
///
/// The server never counts down on its own; clients save whatever they display.
/// `time_remaining` and `total_elapsed` are tracked independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: SessionMode,
    pub phase: Phase,
    pub is_active: bool,
    pub is_paused: bool,
    /// Seconds left in the current phase.
    pub time_remaining: u32,
    /// Seconds spent in the timer across all phases.
    pub total_elapsed: u32,
    /// One-based pomodoro cycle counter.
    pub current_cycle: u32,
    pub updated_at: DateTime<Utc>,
}

fn first_cycle() -> u32 {
    1
}

/// Body of `POST /api/timer/state`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTimerRequest {
    pub mode: SessionMode,
    pub phase: Phase,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_paused: bool,
    pub time_remaining: u32,
    #[serde(default)]
    pub total_elapsed: u32,
    #[serde(default = "first_cycle")]
    pub current_cycle: u32,
}

impl SaveTimerRequest {
    pub fn into_state(self, now: DateTime<Utc>) -> TimerState {
        TimerState {
            mode: self.mode,
            phase: self.phase,
            is_active: self.is_active,
            is_paused: self.is_paused,
            time_remaining: self.time_remaining,
            total_elapsed: self.total_elapsed,
            current_cycle: self.current_cycle,
            updated_at: now,
        }
    }
}

/// Work and break lengths, in seconds, used when a phase completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePlan {
    pub work_seconds: u32,
    pub break_seconds: u32,
}

impl PhasePlan {
    pub fn from_minutes(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work_seconds: work_minutes * 60,
            break_seconds: break_minutes * 60,
        }
    }

    /// The catalog defaults for `mode`.
    pub fn for_mode(mode: SessionMode) -> Self {
        let info = mode_info(mode);
        Self::from_minutes(info.default_work_duration, info.default_break_duration)
    }

    pub fn for_interval(interval: &CustomInterval) -> Self {
        Self::from_minutes(interval.work_duration, interval.break_duration)
    }
}

impl TimerState {
    /// Completes the current phase and returns the snapshot of the next one.
    ///
    /// A work phase is followed by a break when the plan has one; otherwise the
    /// next work phase starts straight away. Leaving any phase for work counts a
    /// new cycle. Breaks wait paused unless `auto_start_breaks` is set, and work
    /// after a break always waits for the user.
    pub fn advance(&self, plan: PhasePlan, auto_start_breaks: bool, now: DateTime<Utc>) -> TimerState {
        let (phase, time_remaining, current_cycle, is_paused) = match self.phase {
            Phase::Work if plan.break_seconds > 0 => (
                Phase::Break,
                plan.break_seconds,
                self.current_cycle,
                !auto_start_breaks,
            ),
            Phase::Work => (
                Phase::Work,
                plan.work_seconds,
                self.current_cycle.saturating_add(1),
                self.is_paused,
            ),
            Phase::Break => (
                Phase::Work,
                plan.work_seconds,
                self.current_cycle.saturating_add(1),
                true,
            ),
        };

        TimerState {
            mode: self.mode,
            phase,
            is_active: true,
            is_paused,
            time_remaining,
            total_elapsed: self.total_elapsed,
            current_cycle,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn working(mode: SessionMode, cycle: u32) -> TimerState {
        TimerState {
            mode,
            phase: Phase::Work,
            is_active: true,
            is_paused: false,
            time_remaining: 0,
            total_elapsed: 1500,
            current_cycle: cycle,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn study_work_moves_to_a_paused_break_in_the_same_cycle() {
        let next = working(SessionMode::Study, 1).advance(
            PhasePlan::for_mode(SessionMode::Study),
            false,
            Utc::now(),
        );
        assert_eq!(next.phase, Phase::Break);
        assert_eq!(next.time_remaining, 300);
        assert_eq!(next.current_cycle, 1);
        assert!(next.is_paused);
        assert_eq!(next.total_elapsed, 1500);
    }

    #[test]
    fn auto_start_breaks_leaves_break_running() {
        let next = working(SessionMode::Study, 2).advance(
            PhasePlan::for_mode(SessionMode::Study),
            true,
            Utc::now(),
        );
        assert!(!next.is_paused);
        assert!(next.is_active);
    }

    #[test]
    fn break_moves_to_work_and_counts_a_cycle() {
        let mut state = working(SessionMode::Deepwork, 3);
        state.phase = Phase::Break;
        let next = state.advance(PhasePlan::for_mode(SessionMode::Deepwork), true, Utc::now());
        assert_eq!(next.phase, Phase::Work);
        assert_eq!(next.current_cycle, 4);
        assert_eq!(next.time_remaining, 90 * 60);
        assert!(next.is_paused);
    }

    #[test]
    fn open_ended_modes_skip_the_break() {
        let next = working(SessionMode::Zen, 1).advance(
            PhasePlan::for_mode(SessionMode::Zen),
            true,
            Utc::now(),
        );
        assert_eq!(next.phase, Phase::Work);
        assert_eq!(next.current_cycle, 2);
        assert_eq!(next.time_remaining, 20 * 60);
    }

    #[test]
    fn save_request_fills_defaults() {
        let req: SaveTimerRequest =
            sonic_rs::from_str(r#"{"mode":"yoga","phase":"work","timeRemaining":60}"#).unwrap();
        let state = req.into_state(Utc::now());
        assert_eq!(state.current_cycle, 1);
        assert_eq!(state.total_elapsed, 0);
        assert!(!state.is_active);
        assert!(!state.is_paused);
    }
}
