use chrono::{Duration, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Argon2Settings;
use crate::crypto::password::{hash_password, verify_password};
use crate::crypto::token::{digest_token, generate_token};
use crate::error::{AppError, Result};
use crate::models::auth_session::{AuthSession, AuthUser};
use crate::models::preferences::UserPreferences;
use crate::models::user::User;
use crate::state::AppState;
use crate::validation::auth::normalize_email;

/// The body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    pub preferences: UserPreferences,
}

/// Runs an Argon2 computation off the async workers.
async fn blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Password task failed: {}", e)))?
}

/// Hash checked when a login names no known account.
static DUMMY_HASH: OnceCell<String> = OnceCell::new();

fn dummy_hash(settings: &Argon2Settings) -> Result<&'static str> {
    DUMMY_HASH
        .get_or_try_init(|| hash_password("zenfocus-no-such-account", settings))
        .map(String::as_str)
}

/// Creates a token session for `user_id` and returns the raw token.
async fn issue_token(state: &AppState, user_id: Uuid) -> Result<String> {
    let token = generate_token();
    let now = Utc::now();
    let session = AuthSession {
        user_id,
        created_at: now,
        expires_at: now + Duration::days(state.config.session_duration_days),
    };

    state.tokens.store(&digest_token(&token), &session).await?;
    tracing::debug!("🔑 Token issued for user: {}", user_id);
    Ok(token)
}

/// Registers a new user with default preferences and signs them in.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The user's email; stored lower-cased.
/// * `password` - The plaintext password.
/// * `name` - An optional display name.
///
/// # Returns
///
/// A `Result` containing the token, the user and their preferences.
pub async fn register(
    state: &AppState,
    email: &str,
    password: String,
    name: Option<String>,
) -> Result<AuthResponse> {
    let email = normalize_email(email);
    tracing::debug!("🔐 Creating user: {}", email);

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::EmailExists);
    }

    let settings = state.config.argon2;
    let password_hash = blocking(move || hash_password(&password, &settings)).await?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email,
        name: name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        password_hash,
        created_at: now,
    };
    state.users.create(&user).await?;

    let preferences = UserPreferences::defaults(user.id, now);
    state.preferences.upsert(&preferences).await?;

    let token = issue_token(state, user.id).await?;
    tracing::info!("✅ User registered: {}", user.id);

    Ok(AuthResponse {
        token,
        user,
        preferences,
    })
}

/// Checks credentials and opens a new token session.
///
/// Unknown emails and wrong passwords fail the same way.
pub async fn login(state: &AppState, email: &str, password: String) -> Result<AuthResponse> {
    let email = normalize_email(email);
    tracing::debug!("🔐 Authenticating user: {}", email);

    let user = state.users.find_by_email(&email).await?;

    // Unknown emails still pay for one Argon2 verify.
    let stored = user.as_ref().map(|user| user.password_hash.clone());
    let settings = state.config.argon2;
    let verified = blocking(move || match stored {
        Some(hash) => verify_password(&password, &hash),
        None => verify_password(&password, dummy_hash(&settings)?).map(|_| false),
    })
    .await?;

    let user = match user {
        Some(user) if verified => user,
        _ => return Err(AppError::InvalidCredentials),
    };

    let preferences = match state.preferences.get(user.id).await? {
        Some(preferences) => preferences,
        None => UserPreferences::defaults(user.id, Utc::now()),
    };

    let token = issue_token(state, user.id).await?;
    tracing::info!("✅ User authenticated: {}", user.id);

    Ok(AuthResponse {
        token,
        user,
        preferences,
    })
}

/// Revokes the session the caller authenticated with.
pub async fn logout(state: &AppState, auth: &AuthUser) -> Result<()> {
    state.tokens.revoke(&auth.token_digest).await?;
    tracing::info!("👋 User logged out: {}", auth.user_id);
    Ok(())
}

/// Resolves a raw bearer token to the user it belongs to.
///
/// Expired sessions are deleted on sight.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser> {
    let digest = digest_token(token);
    let session = state
        .tokens
        .find(&digest)
        .await?
        .ok_or_else(|| AppError::AuthenticationFailed("Invalid or unknown token".to_string()))?;

    if session.is_expired(Utc::now()) {
        tracing::warn!("❌ Session expired for user: {}", session.user_id);
        state.tokens.revoke(&digest).await?;
        return Err(AppError::TokenExpired);
    }

    Ok(AuthUser {
        user_id: session.user_id,
        token_digest: digest,
    })
}

/// Loads the account behind an authenticated request.
pub async fn current_user(state: &AppState, user_id: Uuid) -> Result<User> {
    state.users.find_by_id(user_id).await?.ok_or_else(|| {
        AppError::AuthenticationFailed("Token refers to a deleted account".to_string())
    })
}

/// Drops expired token sessions. Run periodically from `main`.
pub async fn purge_expired_sessions(state: &AppState) -> Result<u64> {
    state.tokens.purge_expired().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Argon2Settings, Config};

    fn state() -> AppState {
        AppState::in_memory(Config {
            argon2: Argon2Settings::minimal(),
            ..Config::default()
        })
    }

    #[tokio::test]
    async fn register_then_login_with_any_email_case() {
        let state = state();
        let registered = register(&state, "Ana@Example.com", "correct horse".to_string(), None)
            .await
            .unwrap();
        assert_eq!(registered.user.email, "ana@example.com");
        assert_eq!(registered.preferences.ambient_volume, 50);

        let logged_in = login(&state, "ANA@example.com", "correct horse".to_string())
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
        assert_ne!(logged_in.token, registered.token);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let state = state();
        register(&state, "a@b.com", "password1".to_string(), None).await.unwrap();
        let err = register(&state, "A@B.com", "password2".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailExists));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_alike() {
        let state = state();
        register(&state, "a@b.com", "password1".to_string(), None).await.unwrap();

        let wrong = login(&state, "a@b.com", "password2".to_string()).await.unwrap_err();
        let unknown = login(&state, "x@b.com", "password1".to_string()).await.unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(DUMMY_HASH.get().is_some());
    }

    #[test]
    fn dummy_hash_never_matches_a_login_password() {
        let hash = dummy_hash(&Argon2Settings::minimal()).unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!verify_password("password1", hash).unwrap());
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected_and_removed() {
        let state = state();
        let token = generate_token();
        let digest = digest_token(&token);
        let past = Utc::now() - Duration::hours(1);
        state
            .tokens
            .store(
                &digest,
                &AuthSession {
                    user_id: Uuid::new_v4(),
                    created_at: past - Duration::days(7),
                    expires_at: past,
                },
            )
            .await
            .unwrap();

        let err = authenticate(&state, &token).await.unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
        assert!(state.tokens.find(&digest).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let state = state();
        let response = register(&state, "a@b.com", "password1".to_string(), None)
            .await
            .unwrap();
        let auth = authenticate(&state, &response.token).await.unwrap();

        logout(&state, &auth).await.unwrap();
        let err = authenticate(&state, &response.token).await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailed(_)));
    }
}
