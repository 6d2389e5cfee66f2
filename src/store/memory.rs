// region:    --- Imports
use super::{MarketStore, StoreError};
use crate::auction::model::{Category, Comment, Listing, NewComment, NewListing, NewUser, Session, User};
use crate::auction::rules;
use crate::bidding::model::{Bid, NewBid};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Memory Store
#[derive(Default)]
struct MemoryState {
    next_id: i64,
    users: BTreeMap<i64, User>,
    sessions: BTreeMap<String, Session>,
    categories: BTreeMap<i64, Category>,
    listings: BTreeMap<i64, Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    /// (listing_id, user_id)
    watchlist: BTreeSet<(i64, i64)>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn listing_with_watchers(&self, listing: &Listing) -> Listing {
        let mut listing = listing.clone();
        listing.watchers = self
            .watchlist
            .range((listing.id, i64::MIN)..=(listing.id, i64::MAX))
            .map(|(_, user_id)| *user_id)
            .collect();
        listing
    }

    fn listings_where<F>(&self, filter: F) -> Vec<Listing>
    where
        F: Fn(&Listing) -> bool,
    {
        self.listings
            .values()
            .filter(|listing| filter(listing))
            .map(|listing| self.listing_with_watchers(listing))
            .collect()
    }

    fn bids_for(&self, listing_id: i64) -> Vec<Bid> {
        let mut bids: Vec<Bid> = self
            .bids
            .iter()
            .filter(|bid| bid.listing_id == listing_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| a.value.cmp(&b.value).then(a.id.cmp(&b.id)));
        bids
    }
}

/// 프로세스 내 저장소 (테스트 및 DATABASE_URL 없이 실행할 때 사용)
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username"));
        }
        let id = state.next_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id,
            expires_at,
        };
        self.state
            .lock()
            .await
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn find_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .get(token)
            .filter(|session| session.expires_at > now)
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.state.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, session| session.expires_at > now);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn ensure_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(category) = state.categories.values().find(|c| c.name == name) {
            return Ok(category.clone());
        }
        let id = state.next_id();
        let category = Category {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, StoreError> {
        Ok(self.state.lock().await.categories.get(&category_id).cloned())
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let listing = Listing {
            id,
            user_id: listing.user_id,
            category_id: listing.category_id,
            title: listing.title,
            description: listing.description,
            img_url: listing.img_url,
            initial_bid: listing.initial_bid,
            active: listing.active,
            created_at: Utc::now(),
            auction_winner_id: None,
            watchers: BTreeSet::new(),
        };
        state.listings.insert(id, listing.clone());
        Ok(listing)
    }

    async fn find_listing(&self, listing_id: i64) -> Result<Option<Listing>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .listings
            .get(&listing_id)
            .map(|listing| state.listing_with_watchers(listing)))
    }

    async fn list_active_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.listings_where(|listing| listing.active))
    }

    async fn list_category_listings(&self, category_id: i64) -> Result<Vec<Listing>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.listings_where(|listing| listing.category_id == Some(category_id)))
    }

    async fn list_watched_listings(&self, user_id: i64) -> Result<Vec<Listing>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.listings_where(|listing| state.watchlist.contains(&(listing.id, user_id))))
    }

    async fn save_closure(
        &self,
        listing_id: i64,
        winner_id: Option<i64>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if let Some(listing) = state.listings.get_mut(&listing_id) {
            listing.active = false;
            listing.auction_winner_id = winner_id;
        }
        Ok(())
    }

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .watchlist
            .insert((listing_id, user_id));
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .watchlist
            .remove(&(listing_id, user_id));
        Ok(())
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError> {
        Ok(self.state.lock().await.bids_for(listing_id))
    }

    async fn insert_bid(&self, bid: NewBid) -> Result<Option<Bid>, StoreError> {
        let mut state = self.state.lock().await;
        let Some(listing) = state.listings.get(&bid.listing_id) else {
            return Ok(None);
        };
        let existing = state.bids_for(bid.listing_id);
        if !listing.active || bid.value <= rules::current_bid(listing, &existing) {
            return Ok(None);
        }

        let id = state.next_id();
        let bid = Bid {
            id,
            user_id: bid.user_id,
            listing_id: bid.listing_id,
            value: bid.value,
            created_at: Utc::now(),
        };
        state.bids.push(bid.clone());
        Ok(Some(bid))
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let comment = Comment {
            id,
            user_id: comment.user_id,
            listing_id: comment.listing_id,
            text: comment.text,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }
}
// endregion: --- Memory Store

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    async fn seed_listing(store: &MemoryStore, initial_bid: i64) -> Listing {
        store
            .create_listing(NewListing {
                user_id: 1,
                category_id: None,
                title: "Lamp".to_string(),
                description: "Desk lamp".to_string(),
                img_url: String::new(),
                initial_bid: Decimal::new(initial_bid * 100, 2),
                active: true,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = MemoryStore::new();
        let new_user = NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
        };
        store.create_user(new_user.clone()).await.unwrap();
        let err = store.create_user(new_user).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("username")));
    }

    #[tokio::test]
    async fn test_guarded_bid_insert() {
        let store = MemoryStore::new();
        let listing = seed_listing(&store, 10).await;
        let bid = |cents| NewBid {
            user_id: 2,
            listing_id: listing.id,
            value: Decimal::new(cents, 2),
        };

        assert!(store.insert_bid(bid(1000)).await.unwrap().is_none());
        assert!(store.insert_bid(bid(1001)).await.unwrap().is_some());
        assert!(store.insert_bid(bid(1001)).await.unwrap().is_none());

        store.save_closure(listing.id, Some(2)).await.unwrap();
        assert!(store.insert_bid(bid(5000)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_watchers_are_attached() {
        let store = MemoryStore::new();
        let listing = seed_listing(&store, 10).await;
        store.add_watcher(listing.id, 7).await.unwrap();
        store.add_watcher(listing.id, 7).await.unwrap();

        let found = store.find_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(found.watchers.into_iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(store.list_watched_listings(7).await.unwrap().len(), 1);

        store.remove_watcher(listing.id, 7).await.unwrap();
        assert!(store.list_watched_listings(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_hidden_and_purged() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let live = store.create_session(1, now + Duration::hours(1)).await.unwrap();
        let stale = store.create_session(1, now - Duration::hours(1)).await.unwrap();

        assert!(store.find_session(&live.token, now).await.unwrap().is_some());
        assert!(store.find_session(&stale.token, now).await.unwrap().is_none());
        assert_eq!(store.delete_expired_sessions(now).await.unwrap(), 1);
    }
}
// endregion: --- Tests
