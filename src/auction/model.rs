use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// 사용자 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// 로그인 세션 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

// 카테고리 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// 경매 상품 모델
///
/// `watchers`는 관심 목록에 등록한 사용자 id 집합이며 별도 테이블에서 채워진다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub img_url: String,
    pub initial_bid: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub auction_winner_id: Option<i64>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub watchers: BTreeSet<i64>,
}

impl Listing {
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }

    /// 관심 목록에 추가, 새로 추가된 경우 true
    pub fn add_watcher(&mut self, user_id: i64) -> bool {
        self.watchers.insert(user_id)
    }

    /// 관심 목록에서 제거, 실제로 제거된 경우 true
    pub fn remove_watcher(&mut self, user_id: i64) -> bool {
        self.watchers.remove(&user_id)
    }
}

// 댓글 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// region:    --- Inserts
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub img_url: String,
    pub initial_bid: Decimal,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i64,
    pub listing_id: i64,
    pub text: String,
}
// endregion: --- Inserts
