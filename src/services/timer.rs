use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::owner::Owner;
use crate::models::timer::{PhasePlan, SaveTimerRequest, TimerState};
use crate::state::AppState;

/// Returns the owner's timer snapshot.
pub async fn get(state: &AppState, owner: &Owner) -> Result<TimerState> {
    state.timers.get(owner).await?.ok_or(AppError::NotFound)
}

/// Replaces the owner's snapshot with `req`.
pub async fn save(state: &AppState, owner: &Owner, req: SaveTimerRequest) -> Result<TimerState> {
    let timer = req.into_state(Utc::now());
    state.timers.save(owner, &timer).await?;
    Ok(timer)
}

pub async fn clear(state: &AppState, owner: &Owner) -> Result<()> {
    state.timers.clear(owner).await?;
    tracing::debug!("🧹 Timer cleared for {}", owner);
    Ok(())
}

/// Completes the current phase of the owner's timer.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `owner` - Whose timer to advance.
/// * `interval_id` - A custom interval whose durations replace the mode defaults.
///   Guests own no intervals, so any id they pass is not found.
///
/// # Returns
///
/// A `Result` containing the saved snapshot of the next phase.
pub async fn advance(
    state: &AppState,
    owner: &Owner,
    interval_id: Option<Uuid>,
) -> Result<TimerState> {
    let current = get(state, owner).await?;

    let plan = match (interval_id, owner.user_id()) {
        (None, _) => PhasePlan::for_mode(current.mode),
        (Some(id), Some(user_id)) => {
            let interval = state
                .intervals
                .find(user_id, id)
                .await?
                .ok_or(AppError::NotFound)?;
            PhasePlan::for_interval(&interval)
        }
        (Some(_), None) => return Err(AppError::NotFound),
    };

    let auto_start_breaks = match owner.user_id() {
        Some(user_id) => state
            .preferences
            .get(user_id)
            .await?
            .is_some_and(|prefs| prefs.auto_start_breaks),
        None => false,
    };

    let next = current.advance(plan, auto_start_breaks, Utc::now());
    state.timers.save(owner, &next).await?;
    tracing::debug!(
        "⏭️ Timer for {} advanced to {:?} (cycle {})",
        owner,
        next.phase,
        next.current_cycle
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::enums::{Phase, SessionMode};
    use crate::models::interval::{CreateIntervalRequest, CustomInterval};
    use crate::models::owner::GuestKey;
    use crate::models::preferences::UserPreferences;

    fn guest() -> Owner {
        Owner::Guest(GuestKey::parse("guest-timer-1").unwrap())
    }

    fn request(json: &str) -> SaveTimerRequest {
        sonic_rs::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn missing_timer_is_not_found_and_clear_is_idempotent() {
        let state = AppState::in_memory(Config::default());
        assert!(matches!(get(&state, &guest()).await, Err(AppError::NotFound)));
        clear(&state, &guest()).await.unwrap();
        clear(&state, &guest()).await.unwrap();
    }

    #[tokio::test]
    async fn guest_advance_waits_for_the_break() {
        let state = AppState::in_memory(Config::default());
        save(
            &state,
            &guest(),
            request(r#"{"mode":"study","phase":"work","timeRemaining":0,"totalElapsed":1500}"#),
        )
        .await
        .unwrap();

        let next = advance(&state, &guest(), None).await.unwrap();
        assert_eq!(next.phase, Phase::Break);
        assert_eq!(next.time_remaining, 300);
        assert_eq!(next.current_cycle, 1);
        assert!(next.is_paused);
        assert_eq!(next.total_elapsed, 1500);
        assert_eq!(get(&state, &guest()).await.unwrap(), next);
    }

    #[tokio::test]
    async fn user_interval_and_preferences_shape_the_next_phase() {
        let state = AppState::in_memory(Config::default());
        let user_id = Uuid::new_v4();
        let owner = Owner::User(user_id);
        let now = Utc::now();

        let mut prefs = UserPreferences::defaults(user_id, now);
        prefs.auto_start_breaks = true;
        state.preferences.upsert(&prefs).await.unwrap();

        let req: CreateIntervalRequest =
            sonic_rs::from_str(r#"{"name":"Long","workDuration":50,"breakDuration":10}"#).unwrap();
        let interval = CustomInterval::new(user_id, req, now);
        state.intervals.insert(&interval).await.unwrap();

        save(
            &state,
            &owner,
            request(r#"{"mode":"deepwork","phase":"work","timeRemaining":0}"#),
        )
        .await
        .unwrap();

        let next = advance(&state, &owner, Some(interval.id)).await.unwrap();
        assert_eq!(next.mode, SessionMode::Deepwork);
        assert_eq!(next.phase, Phase::Break);
        assert_eq!(next.time_remaining, 600);
        assert!(!next.is_paused);
    }

    #[tokio::test]
    async fn guests_cannot_use_intervals() {
        let state = AppState::in_memory(Config::default());
        save(
            &state,
            &guest(),
            request(r#"{"mode":"zen","phase":"work","timeRemaining":0}"#),
        )
        .await
        .unwrap();

        let err = advance(&state, &guest(), Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
