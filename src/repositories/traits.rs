//! Persistence seams. Services only ever see these traits; `AppState` decides
//! which backend sits behind them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        auth_session::AuthSession,
        focus_session::{FocusSession, SessionFilter},
        interval::CustomInterval,
        owner::Owner,
        preferences::UserPreferences,
        timer::TimerState,
        user::User,
    },
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; fails with `EmailExists` when the email is taken.
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn store(&self, digest: &str, session: &AuthSession) -> Result<()>;
    async fn find(&self, digest: &str) -> Result<Option<AuthSession>>;
    async fn revoke(&self, digest: &str) -> Result<()>;
    /// Drops expired sessions and returns how many went.
    async fn purge_expired(&self) -> Result<u64>;
}

#[async_trait]
pub trait TimerRepository: Send + Sync {
    async fn get(&self, owner: &Owner) -> Result<Option<TimerState>>;
    /// Replaces whatever snapshot the owner had.
    async fn save(&self, owner: &Owner, state: &TimerState) -> Result<()>;
    /// Removes the snapshot; absent snapshots are not an error.
    async fn clear(&self, owner: &Owner) -> Result<()>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &FocusSession) -> Result<()>;
    /// Looks a session up by id, scoped to `owner`.
    async fn find(&self, owner: &Owner, id: Uuid) -> Result<Option<FocusSession>>;
    /// Overwrites an existing session; `false` when no row matched.
    async fn update(&self, session: &FocusSession) -> Result<bool>;
    /// One page of the owner's sessions plus the filtered total.
    async fn list(&self, owner: &Owner, filter: &SessionFilter) -> Result<(Vec<FocusSession>, u64)>;
}

#[async_trait]
pub trait IntervalRepository: Send + Sync {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CustomInterval>>;
    async fn insert(&self, interval: &CustomInterval) -> Result<()>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<CustomInterval>>;
    async fn update(&self, interval: &CustomInterval) -> Result<bool>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool>;
    /// Increments `usage_count` and stamps `last_used_at` in one step.
    /// `None` when the user has no such interval.
    async fn record_use(&self, user_id: Uuid, id: Uuid, now: DateTime<Utc>) -> Result<Option<CustomInterval>>;
}

#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserPreferences>>;
    async fn upsert(&self, preferences: &UserPreferences) -> Result<()>;
}
