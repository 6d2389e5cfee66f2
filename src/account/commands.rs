/// 계정 관련 커맨드 처리
/// 1. 회원 가입
/// 2. 로그인
/// 3. 로그아웃
// region:    --- Imports
use super::password::{hash_password, verify_password};
use super::session::open_session;
use crate::auction::model::{NewUser, Session};
use crate::error::{AppError, FieldErrors};
use crate::store::{MarketStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

/// 사용자 이름 최대 길이
pub const MAX_USERNAME_LENGTH: usize = 150;

// region:    --- Forms
/// 회원 가입 폼
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

/// 로그인 폼
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// 로그인/회원 가입 페이지
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthPage {
    pub message: Option<String>,
}

/// 로그인 성공 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: i64,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            session_token: session.token,
            expires_at: session.expires_at,
        }
    }
}
// endregion: --- Forms

// region:    --- Commands
/// 1. 회원 가입 후 로그인
pub async fn handle_register(
    store: &dyn MarketStore,
    form: RegisterForm,
    expiry_hours: i64,
) -> Result<SessionResponse, AppError> {
    info!("{:<12} --> 회원 가입 요청: {}", "Command", form.username);
    let username = form.username.trim().to_string();

    let mut errors = FieldErrors::new();
    if username.is_empty() {
        errors.add("username", "This field is required.");
    } else if username.chars().count() > MAX_USERNAME_LENGTH {
        errors.add(
            "username",
            format!(
                "Ensure this value has at most {} characters.",
                MAX_USERNAME_LENGTH
            ),
        );
    }
    if form.password.is_empty() {
        errors.add("password", "This field is required.");
    } else if form.password != form.confirmation {
        errors.add("message", "Passwords must match.");
    }
    errors.into_result()?;

    let password_hash = hash_password(&form.password)?;
    let user = store
        .create_user(NewUser {
            username,
            email: form.email.trim().to_string(),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AppError::invalid("message", "Username already taken."),
            e => AppError::Store(e),
        })?;

    let session = open_session(store, &user, expiry_hours).await?;
    info!("{:<12} --> 회원 가입 완료 user_id: {}", "Command", user.id);
    Ok(session.into())
}

/// 2. 로그인
pub async fn handle_login(
    store: &dyn MarketStore,
    form: LoginForm,
    expiry_hours: i64,
) -> Result<SessionResponse, AppError> {
    info!("{:<12} --> 로그인 요청: {}", "Command", form.username);
    let user = store
        .find_user_by_username(form.username.trim())
        .await?
        .filter(|user| verify_password(&form.password, &user.password_hash));

    let Some(user) = user else {
        warn!("{:<12} --> 로그인 실패: {}", "Command", form.username);
        return Err(AppError::InvalidCredentials);
    };

    let session = open_session(store, &user, expiry_hours).await?;
    Ok(session.into())
}

/// 3. 로그아웃
pub async fn handle_logout(store: &dyn MarketStore, token: Option<&str>) -> Result<(), AppError> {
    if let Some(token) = token {
        store.delete_session(token).await?;
        info!("{:<12} --> 로그아웃", "Command");
    }
    Ok(())
}
// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn register_form(username: &str, password: &str, confirmation: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    fn message_of(err: AppError) -> Option<String> {
        match err {
            AppError::Validation(errors) => errors.get("message").map(str::to_string),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let registered = handle_register(&store, register_form("bob", "hunter22", "hunter22"), 24)
            .await
            .unwrap();
        assert!(store
            .find_session(&registered.session_token, Utc::now())
            .await
            .unwrap()
            .is_some());

        let login = LoginForm {
            username: "bob".to_string(),
            password: "hunter22".to_string(),
        };
        let session = handle_login(&store, login, 24).await.unwrap();
        assert_eq!(session.user_id, registered.user_id);

        handle_logout(&store, Some(&session.session_token)).await.unwrap();
        assert!(store
            .find_session(&session.session_token, Utc::now())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let store = MemoryStore::new();
        let err = handle_register(&store, register_form("bob", "a", "b"), 24)
            .await
            .unwrap_err();
        assert_eq!(message_of(err).as_deref(), Some("Passwords must match."));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let store = MemoryStore::new();
        handle_register(&store, register_form("bob", "pw", "pw"), 24)
            .await
            .unwrap();
        let err = handle_register(&store, register_form("bob", "pw", "pw"), 24)
            .await
            .unwrap_err();
        assert_eq!(message_of(err).as_deref(), Some("Username already taken."));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let store = MemoryStore::new();
        handle_register(&store, register_form("bob", "pw", "pw"), 24)
            .await
            .unwrap();
        let login = LoginForm {
            username: "bob".to_string(),
            password: "nope".to_string(),
        };
        let err = handle_login(&store, login, 24).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
// endregion: --- Tests
