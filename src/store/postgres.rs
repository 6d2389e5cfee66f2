// region:    --- Imports
use super::{MarketStore, StoreError};
use crate::auction::model::{Category, Comment, Listing, NewComment, NewListing, NewUser, Session, User};
use crate::bidding::model::{Bid, NewBid};
use crate::database::DatabaseManager;
use crate::query::queries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Postgres Store
/// PostgreSQL 저장소 구현체
pub struct PostgresStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }

    /// 조회한 상품들의 관심 목록 채우기
    async fn attach_watchers(&self, mut listings: Vec<Listing>) -> Result<Vec<Listing>, StoreError> {
        if listings.is_empty() {
            return Ok(listings);
        }
        let ids: Vec<i64> = listings.iter().map(|listing| listing.id).collect();
        let rows = sqlx::query_as::<_, (i64, i64)>(queries::GET_WATCHERS)
            .bind(ids)
            .fetch_all(self.db_manager.pool())
            .await?;

        let mut index: HashMap<i64, &mut Listing> = listings
            .iter_mut()
            .map(|listing| (listing.id, listing))
            .collect();
        for (listing_id, user_id) in rows {
            if let Some(listing) = index.get_mut(&listing_id) {
                listing.add_watcher(user_id);
            }
        }
        Ok(listings)
    }

    async fn fetch_listings(&self, sql: &str, param: Option<i64>) -> Result<Vec<Listing>, StoreError> {
        let mut query = sqlx::query_as::<_, Listing>(sql);
        if let Some(param) = param {
            query = query.bind(param);
        }
        let listings = query.fetch_all(self.db_manager.pool()).await?;
        self.attach_watchers(listings).await
    }
}

#[async_trait]
impl MarketStore for PostgresStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        debug!("{:<12} --> 사용자 생성: {}", "Store", user.username);
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::Duplicate("username")
                }
                e => StoreError::Database(e),
            })
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        Ok(sqlx::query_as::<_, Session>(queries::INSERT_SESSION)
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(expires_at)
            .fetch_one(self.db_manager.pool())
            .await?)
    }

    async fn find_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        Ok(sqlx::query_as::<_, Session>(queries::GET_SESSION)
            .bind(token)
            .bind(now)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query(queries::DELETE_SESSION)
            .bind(token)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query(queries::DELETE_EXPIRED_SESSIONS)
            .bind(now)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn ensure_category(&self, name: &str) -> Result<Category, StoreError> {
        let name = name.to_string();
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(queries::INSERT_CATEGORY)
                        .bind(&name)
                        .execute(&mut **tx)
                        .await?;
                    let category = sqlx::query_as::<_, Category>(queries::GET_CATEGORY_BY_NAME)
                        .bind(&name)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(category)
                })
            })
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, StoreError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(category_id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, StoreError> {
        debug!("{:<12} --> 상품 생성: {}", "Store", listing.title);
        Ok(sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(listing.user_id)
            .bind(listing.category_id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.img_url)
            .bind(listing.initial_bid)
            .bind(listing.active)
            .fetch_one(self.db_manager.pool())
            .await?)
    }

    async fn find_listing(&self, listing_id: i64) -> Result<Option<Listing>, StoreError> {
        let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        match listing {
            Some(listing) => Ok(self.attach_watchers(vec![listing]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_active_listings(&self) -> Result<Vec<Listing>, StoreError> {
        self.fetch_listings(queries::GET_ACTIVE_LISTINGS, None).await
    }

    async fn list_category_listings(&self, category_id: i64) -> Result<Vec<Listing>, StoreError> {
        self.fetch_listings(queries::GET_CATEGORY_LISTINGS, Some(category_id))
            .await
    }

    async fn list_watched_listings(&self, user_id: i64) -> Result<Vec<Listing>, StoreError> {
        self.fetch_listings(queries::GET_WATCHED_LISTINGS, Some(user_id))
            .await
    }

    async fn save_closure(
        &self,
        listing_id: i64,
        winner_id: Option<i64>,
    ) -> Result<(), StoreError> {
        sqlx::query(queries::CLOSE_LISTING)
            .bind(listing_id)
            .bind(winner_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        sqlx::query(queries::INSERT_WATCHER)
            .bind(listing_id)
            .bind(user_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        sqlx::query(queries::DELETE_WATCHER)
            .bind(listing_id)
            .bind(user_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn insert_bid(&self, bid: NewBid) -> Result<Option<Bid>, StoreError> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    // 상품 행을 잠가 입찰/종료를 직렬화
                    let locked = sqlx::query_scalar::<_, i64>(queries::LOCK_LISTING)
                        .bind(bid.listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if locked.is_none() {
                        return Ok(None);
                    }

                    let result = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(bid.user_id)
                        .bind(bid.listing_id)
                        .bind(bid.value)
                        .fetch_optional(&mut **tx)
                        .await;
                    match result {
                        Ok(bid) => Ok(bid),
                        Err(sqlx::Error::Database(ref db)) if db.is_unique_violation() => Ok(None),
                        Err(e) => Err(StoreError::Database(e)),
                    }
                })
            })
            .await
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, StoreError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        Ok(sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(comment.user_id)
            .bind(comment.listing_id)
            .bind(&comment.text)
            .fetch_one(self.db_manager.pool())
            .await?)
    }
}
// endregion: --- Postgres Store
