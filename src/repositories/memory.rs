use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::{
    IntervalRepository, PreferencesRepository, SessionRepository, TimerRepository,
    TokenRepository, UserRepository,
};
use crate::{
    error::{AppError, Result},
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

/// Process-local backend for every store. Used by tests and `STORAGE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tokens: RwLock<HashMap<String, AuthSession>>,
    timers: RwLock<HashMap<Owner, TimerState>>,
    sessions: RwLock<HashMap<Uuid, FocusSession>>,
    intervals: RwLock<HashMap<Uuid, CustomInterval>>,
    preferences: RwLock<HashMap<Uuid, UserPreferences>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::EmailExists);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn store(&self, digest: &str, session: &AuthSession) -> Result<()> {
        self.tokens
            .write()
            .await
            .insert(digest.to_string(), session.clone());
        Ok(())
    }

    async fn find(&self, digest: &str) -> Result<Option<AuthSession>> {
        Ok(self.tokens.read().await.get(digest).cloned())
    }

    async fn revoke(&self, digest: &str) -> Result<()> {
        self.tokens.write().await.remove(digest);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, session| !session.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}

#[async_trait]
impl TimerRepository for MemoryStore {
    async fn get(&self, owner: &Owner) -> Result<Option<TimerState>> {
        Ok(self.timers.read().await.get(owner).cloned())
    }

    async fn save(&self, owner: &Owner, state: &TimerState) -> Result<()> {
        self.timers
            .write()
            .await
            .insert(owner.clone(), state.clone());
        Ok(())
    }

    async fn clear(&self, owner: &Owner) -> Result<()> {
        self.timers.write().await.remove(owner);
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn insert(&self, session: &FocusSession) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find(&self, owner: &Owner, id: Uuid) -> Result<Option<FocusSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&id)
            .filter(|session| &session.owner == owner)
            .cloned())
    }

    async fn update(&self, session: &FocusSession) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.id) {
            Some(existing) if existing.owner == session.owner => {
                *existing = session.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(&self, owner: &Owner, filter: &SessionFilter) -> Result<(Vec<FocusSession>, u64)> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<&FocusSession> = sessions
            .values()
            .filter(|session| &session.owner == owner && filter.matches(session))
            .collect();
        matching.sort_by(|a, b| {
            b.start_time
                .cmp(&a.start_time)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl IntervalRepository for MemoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CustomInterval>> {
        let intervals = self.intervals.read().await;
        let mut owned: Vec<CustomInterval> = intervals
            .values()
            .filter(|interval| interval.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(owned)
    }

    async fn insert(&self, interval: &CustomInterval) -> Result<()> {
        self.intervals
            .write()
            .await
            .insert(interval.id, interval.clone());
        Ok(())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<CustomInterval>> {
        let intervals = self.intervals.read().await;
        Ok(intervals
            .get(&id)
            .filter(|interval| interval.user_id == user_id)
            .cloned())
    }

    async fn update(&self, interval: &CustomInterval) -> Result<bool> {
        let mut intervals = self.intervals.write().await;
        match intervals.get_mut(&interval.id) {
            Some(existing) if existing.user_id == interval.user_id => {
                *existing = interval.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut intervals = self.intervals.write().await;
        if intervals.get(&id).is_some_and(|interval| interval.user_id == user_id) {
            intervals.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn record_use(&self, user_id: Uuid, id: Uuid, now: DateTime<Utc>) -> Result<Option<CustomInterval>> {
        let mut intervals = self.intervals.write().await;
        Ok(intervals
            .get_mut(&id)
            .filter(|interval| interval.user_id == user_id)
            .map(|interval| {
                interval.mark_used(now);
                interval.clone()
            }))
    }
}

#[async_trait]
impl PreferencesRepository for MemoryStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserPreferences>> {
        Ok(self.preferences.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, preferences: &UserPreferences) -> Result<()> {
        self.preferences
            .write()
            .await
            .insert(preferences.user_id, preferences.clone());
        Ok(())
    }
}
