// region:    --- Imports
use crate::auction::model::{Session, User};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::MarketStore;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use tracing::debug;

// endregion: --- Imports

// region:    --- Session Helpers
/// `Authorization: Bearer <token>` 헤더에서 토큰 추출
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// 로그인 세션 생성
pub async fn open_session(
    store: &dyn MarketStore,
    user: &User,
    expiry_hours: i64,
) -> Result<Session, AppError> {
    let expires_at = Utc::now() + Duration::hours(expiry_hours);
    let session = store.create_session(user.id, expires_at).await?;
    debug!("{:<12} --> 세션 생성 user_id: {}", "Session", user.id);
    Ok(session)
}

/// 토큰으로 현재 사용자 조회
pub async fn resolve_user(store: &dyn MarketStore, token: &str) -> Result<Option<User>, AppError> {
    let Some(session) = store.find_session(token, Utc::now()).await? else {
        return Ok(None);
    };
    Ok(store.find_user(session.user_id).await?)
}
// endregion: --- Session Helpers

// region:    --- Extractors
/// 현재 사용자 (로그인하지 않았으면 None)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(CurrentUser(None));
        };
        let user = resolve_user(state.store.as_ref(), token).await?;
        Ok(CurrentUser(user))
    }
}

/// 로그인 필수 (없으면 로그인 페이지로 이동)
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        user.map(RequireUser).ok_or(AppError::AuthenticationRequired)
    }
}
// endregion: --- Extractors

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers), Some("abc-123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
// endregion: --- Tests
