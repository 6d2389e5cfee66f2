// region:    --- Imports
use crate::auction::model::{Category, Comment, Listing, NewComment, NewListing, NewUser, Session, User};
use crate::bidding::model::{Bid, NewBid};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

// endregion: --- Modules

// region:    --- Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
// endregion: --- Store Error

// region:    --- Market Store Trait
/// 경매 데이터 저장소 트레이트
///
/// 상품 조회 결과에는 항상 관심 목록(`watchers`)이 채워져 있다.
/// 입찰 목록은 금액 오름차순, 댓글 목록은 작성 시간 오름차순으로 반환한다.
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError>;
    /// 만료되지 않은 세션 조회
    async fn find_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError>;
    async fn delete_session(&self, token: &str) -> Result<(), StoreError>;
    /// 만료된 세션 삭제, 삭제된 개수 반환
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    /// 이름으로 카테고리 조회, 없으면 생성
    async fn ensure_category(&self, name: &str) -> Result<Category, StoreError>;
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, StoreError>;

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, StoreError>;
    async fn find_listing(&self, listing_id: i64) -> Result<Option<Listing>, StoreError>;
    async fn list_active_listings(&self) -> Result<Vec<Listing>, StoreError>;
    async fn list_category_listings(&self, category_id: i64) -> Result<Vec<Listing>, StoreError>;
    async fn list_watched_listings(&self, user_id: i64) -> Result<Vec<Listing>, StoreError>;
    /// 경매 종료 상태 저장
    async fn save_closure(
        &self,
        listing_id: i64,
        winner_id: Option<i64>,
    ) -> Result<(), StoreError>;

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError>;
    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError>;

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError>;
    /// 입찰 저장
    ///
    /// 저장 시점에 진행 중인 경매이고 금액이 현재 입찰가보다 클 때만 저장하며,
    /// 그렇지 않으면 `None`을 반환한다.
    async fn insert_bid(&self, bid: NewBid) -> Result<Option<Bid>, StoreError>;

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, StoreError>;
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;
}
// endregion: --- Market Store Trait
