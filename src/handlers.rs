// region:    --- Imports
use crate::account::commands::{
    handle_login, handle_logout, handle_register, AuthPage, LoginForm, RegisterForm,
    SessionResponse,
};
use crate::account::session::bearer_token;
use crate::account::{CurrentUser, RequireUser};
use crate::bidding::commands::{
    handle_create_listing, handle_listing_action, CreateListingForm, ListingAction,
};
use crate::error::{AppError, FieldErrors};
use crate::query::handlers::{self as query, CategoriesPage, CategoryPage, IndexPage, WatchlistPage};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use std::collections::HashMap;
use tracing::info;

// endregion: --- Imports

fn listing_url(listing_id: i64) -> String {
    format!("/listing/{}", listing_id)
}

// region:    --- Account Handlers
/// 로그인 페이지
pub async fn handle_login_page() -> Json<AuthPage> {
    Json(AuthPage::default())
}

/// 로그인 요청 처리
pub async fn handle_login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<SessionResponse>, AppError> {
    info!("{:<12} --> 로그인 요청", "Handler");
    let session = handle_login(state.store.as_ref(), form, state.config.session_expiry_hours).await?;
    Ok(Json(session))
}

/// 로그아웃 후 메인 페이지로 이동
pub async fn handle_logout_request(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> 로그아웃 요청", "Handler");
    handle_logout(state.store.as_ref(), bearer_token(&headers)).await?;
    Ok(Redirect::to("/"))
}

/// 회원 가입 페이지
pub async fn handle_register_page() -> Json<AuthPage> {
    Json(AuthPage::default())
}

/// 회원 가입 요청 처리
pub async fn handle_register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 회원 가입 요청", "Handler");
    match handle_register(state.store.as_ref(), form, state.config.session_expiry_hours).await {
        Ok(session) => Ok((StatusCode::CREATED, Json(session)).into_response()),
        Err(AppError::Validation(errors)) => {
            let message = errors
                .get("message")
                .map(str::to_string)
                .unwrap_or_else(|| errors.to_string());
            let page = AuthPage {
                message: Some(message),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response())
        }
        Err(e) => Err(e),
    }
}
// endregion: --- Account Handlers

// region:    --- Command Handlers
/// 상품 등록 페이지
pub async fn handle_create_page(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
) -> Result<Response, AppError> {
    let page = query::get_create_page(
        state.store.as_ref(),
        CreateListingForm::default(),
        FieldErrors::new(),
    )
    .await?;
    Ok(Json(page).into_response())
}

/// 상품 등록 요청 처리
pub async fn handle_create_submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<CreateListingForm>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 상품 등록 요청 user_id: {}", "Handler", user.id);
    let store = state.store.as_ref();
    match handle_create_listing(store, &user, &form).await {
        Ok(listing) => Ok(Redirect::to(&listing_url(listing.id)).into_response()),
        Err(AppError::Validation(errors)) => {
            let page = query::get_create_page(store, form, errors).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// 상품 상세 페이지 POST 요청 처리 (입찰, 관심 목록, 경매 종료, 댓글)
pub async fn handle_listing_submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 상품 요청 처리 id: {}", "Handler", listing_id);
    let store = state.store.as_ref();
    let mut listing = query::load_listing(store, listing_id).await?;
    let user = user.ok_or(AppError::AuthenticationRequired)?;
    let action = ListingAction::from_form(&form)?;

    match handle_listing_action(store, &user, &mut listing, action).await {
        Ok(()) => Ok(Redirect::to(&listing_url(listing_id)).into_response()),
        Err(AppError::Validation(errors)) => {
            // 입력 오류는 상세 페이지에 표시
            let listing = query::load_listing(store, listing_id).await?;
            let page = query::get_listing_page(store, listing, Some(&user))
                .await?
                .with_errors(errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response())
        }
        Err(e) => Err(e),
    }
}
// endregion: --- Command Handlers

// region:    --- Query Handlers
/// 진행 중인 상품 목록
pub async fn handle_index(State(state): State<AppState>) -> Result<Json<IndexPage>, AppError> {
    info!("{:<12} --> 진행 중인 상품 조회", "HandlerQuery");
    Ok(Json(query::get_index_page(state.store.as_ref()).await?))
}

/// 상품 상세
pub async fn handle_listing_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<i64>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "HandlerQuery", listing_id);
    let store = state.store.as_ref();
    let listing = query::load_listing(store, listing_id).await?;
    let page = query::get_listing_page(store, listing, user.as_ref()).await?;
    Ok(Json(page).into_response())
}

/// 카테고리 목록
pub async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesPage>, AppError> {
    info!("{:<12} --> 카테고리 목록 조회", "HandlerQuery");
    Ok(Json(query::get_categories_page(state.store.as_ref()).await?))
}

/// 카테고리별 상품
pub async fn handle_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<CategoryPage>, AppError> {
    info!("{:<12} --> 카테고리 조회 id: {}", "HandlerQuery", category_id);
    Ok(Json(
        query::get_category_page(state.store.as_ref(), category_id).await?,
    ))
}

/// 관심 목록
pub async fn handle_watchlist(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<WatchlistPage>, AppError> {
    info!("{:<12} --> 관심 목록 조회 user_id: {}", "HandlerQuery", user.id);
    Ok(Json(
        query::get_watchlist_page(state.store.as_ref(), &user).await?,
    ))
}
// endregion: --- Query Handlers
