/// 경매 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 입찰
/// 3. 관심 목록
/// 4. 경매 종료
/// 5. 댓글
// region:    --- Imports
use crate::auction::model::{Comment, Listing, NewComment, NewListing, User};
use crate::auction::money::parse_amount;
use crate::auction::rules::{self, ClosureOutcome, BID_TOO_LOW};
use crate::bidding::model::{Bid, NewBid};
use crate::error::{AppError, FieldErrors};
use crate::store::MarketStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

// endregion: --- Imports

pub const MAX_TITLE_LENGTH: usize = 64;
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;
pub const MAX_IMG_URL_LENGTH: usize = 256;

// region:    --- Commands
/// 상품 등록 폼
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateListingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub initial_bid: String,
    #[serde(default)]
    pub img_url: String,
    pub active: Option<String>,
    pub category: Option<String>,
}

/// 상품 상세 페이지 POST 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingAction {
    PlaceBid { new_bid: String },
    ToggleWatchlist { value: String },
    Close,
    AddComment { text: String },
}

impl ListingAction {
    /// 폼 키로 요청 종류 판별 (bid, watchlist, close_listing, add_comment 순)
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, AppError> {
        let field = |name: &str| form.get(name).cloned().unwrap_or_default();

        if form.contains_key("bid") {
            Ok(ListingAction::PlaceBid {
                new_bid: field("new_bid"),
            })
        } else if let Some(value) = form.get("watchlist") {
            Ok(ListingAction::ToggleWatchlist {
                value: value.clone(),
            })
        } else if form.contains_key("close_listing") {
            Ok(ListingAction::Close)
        } else if form.contains_key("add_comment") {
            Ok(ListingAction::AddComment {
                text: field("text"),
            })
        } else {
            Err(AppError::UnknownAction)
        }
    }
}
// endregion: --- Commands

// region:    --- Command Handlers
/// 1. 상품 등록
pub async fn handle_create_listing(
    store: &dyn MarketStore,
    user: &User,
    form: &CreateListingForm,
) -> Result<Listing, AppError> {
    info!("{:<12} --> 상품 등록 요청 user_id: {}", "Command", user.id);
    let mut errors = FieldErrors::new();

    let title = form.title.trim();
    check_length(&mut errors, "title", title, MAX_TITLE_LENGTH, true);
    let description = form.description.trim();
    check_length(&mut errors, "description", description, MAX_DESCRIPTION_LENGTH, true);
    let img_url = form.img_url.trim();
    check_length(&mut errors, "img_url", img_url, MAX_IMG_URL_LENGTH, false);

    let initial_bid = match parse_amount(&form.initial_bid) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add("initial_bid", message);
            None
        }
    };

    // 카테고리는 등록 전에 존재 여부를 확인한다
    let category_id = match form.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let found = match raw.parse::<i64>() {
                Ok(id) => store.find_category(id).await?.map(|category| category.id),
                Err(_) => None,
            };
            if found.is_none() {
                errors.add("category", "Select a valid category.");
            }
            found
        }
    };

    errors.into_result()?;
    let Some(initial_bid) = initial_bid else {
        return Err(AppError::invalid("initial_bid", "Enter a number."));
    };

    let listing = store
        .create_listing(NewListing {
            user_id: user.id,
            category_id,
            title: title.to_string(),
            description: description.to_string(),
            img_url: img_url.to_string(),
            initial_bid,
            active: is_checked(form.active.as_deref()),
        })
        .await?;

    info!("{:<12} --> 상품 등록 완료 id: {}", "Command", listing.id);
    Ok(listing)
}

/// 2. 입찰
pub async fn handle_place_bid(
    store: &dyn MarketStore,
    user: &User,
    listing: &Listing,
    new_bid: &str,
) -> Result<Bid, AppError> {
    info!(
        "{:<12} --> 입찰 요청 listing_id: {}, user_id: {}, new_bid: {}",
        "Command", listing.id, user.id, new_bid
    );
    let value = parse_amount(new_bid).map_err(|message| AppError::invalid("new_bid", message))?;

    let bids = store.list_bids(listing.id).await?;
    rules::validate_new_bid(listing, &bids, value)?;

    // 저장 시점에 다시 검증, 그 사이 더 높은 입찰이 있으면 거절
    match store
        .insert_bid(NewBid {
            user_id: user.id,
            listing_id: listing.id,
            value,
        })
        .await?
    {
        Some(bid) => {
            info!("{:<12} --> 입찰 성공: 현재 가격 {}", "Command", bid.value);
            Ok(bid)
        }
        None => {
            warn!(
                "{:<12} --> 입찰 실패: 현재 가격이 더 높거나 같음 listing_id: {}",
                "Command", listing.id
            );
            Err(AppError::invalid("new_bid", BID_TOO_LOW))
        }
    }
}

/// 3. 관심 목록 추가/삭제
///
/// `value`가 0이 아닌 정수면 추가, 0이면 삭제한다.
pub async fn handle_toggle_watchlist(
    store: &dyn MarketStore,
    user: &User,
    listing: &mut Listing,
    value: &str,
) -> Result<bool, AppError> {
    let watching = value
        .trim()
        .parse::<i64>()
        .map(|flag| flag != 0)
        .map_err(|_| AppError::invalid("watchlist", "Enter a whole number."))?;

    rules::set_watching(listing, user, watching);
    if watching {
        store.add_watcher(listing.id, user.id).await?;
    } else {
        store.remove_watcher(listing.id, user.id).await?;
    }

    info!(
        "{:<12} --> 관심 목록 변경 listing_id: {}, user_id: {}, watching: {}",
        "Command", listing.id, user.id, watching
    );
    Ok(watching)
}

/// 4. 경매 종료
pub async fn handle_close_listing(
    store: &dyn MarketStore,
    user: &User,
    listing: &mut Listing,
) -> Result<ClosureOutcome, AppError> {
    info!(
        "{:<12} --> 경매 종료 요청 listing_id: {}, user_id: {}",
        "Command", listing.id, user.id
    );
    let bids = store.list_bids(listing.id).await?;

    let outcome = rules::close_listing(listing, &bids, user).inspect_err(|_| {
        warn!(
            "{:<12} --> 경매 종료 권한 없음 listing_id: {}, user_id: {}",
            "Command", listing.id, user.id
        );
    })?;

    if let ClosureOutcome::Closed { winner_id } = outcome {
        store.save_closure(listing.id, winner_id).await?;
        info!(
            "{:<12} --> 경매 종료 listing_id: {}, winner: {:?}",
            "Command", listing.id, winner_id
        );
    }
    Ok(outcome)
}

/// 5. 댓글 작성
pub async fn handle_add_comment(
    store: &dyn MarketStore,
    user: &User,
    listing: &Listing,
    text: &str,
) -> Result<Comment, AppError> {
    let text = rules::validate_comment(text)?;
    let comment = store
        .insert_comment(NewComment {
            user_id: user.id,
            listing_id: listing.id,
            text,
        })
        .await?;
    info!(
        "{:<12} --> 댓글 작성 listing_id: {}, comment_id: {}",
        "Command", listing.id, comment.id
    );
    Ok(comment)
}

/// 상세 페이지 POST 요청 실행
pub async fn handle_listing_action(
    store: &dyn MarketStore,
    user: &User,
    listing: &mut Listing,
    action: ListingAction,
) -> Result<(), AppError> {
    match action {
        ListingAction::PlaceBid { new_bid } => {
            handle_place_bid(store, user, listing, &new_bid).await?;
        }
        ListingAction::ToggleWatchlist { value } => {
            handle_toggle_watchlist(store, user, listing, &value).await?;
        }
        ListingAction::Close => {
            handle_close_listing(store, user, listing).await?;
        }
        ListingAction::AddComment { text } => {
            handle_add_comment(store, user, listing, &text).await?;
        }
    }
    Ok(())
}
// endregion: --- Command Handlers

// region:    --- Form Helpers
fn check_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize, required: bool) {
    if required && value.is_empty() {
        errors.add(field, "This field is required.");
    } else if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this value has at most {} characters.", max),
        );
    }
}

/// 체크박스 값 해석
fn is_checked(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "false" | "0" | "off"),
    }
}
// endregion: --- Form Helpers

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::NewUser;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    async fn create_user(store: &MemoryStore, name: &str) -> User {
        store
            .create_user(NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: String::new(),
            })
            .await
            .unwrap()
    }

    fn listing_form(initial_bid: &str) -> CreateListingForm {
        CreateListingForm {
            title: "Vintage watch".to_string(),
            description: "Runs a little fast".to_string(),
            initial_bid: initial_bid.to_string(),
            img_url: String::new(),
            active: Some("on".to_string()),
            category: None,
        }
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_listing_action_discriminator() {
        assert_eq!(
            ListingAction::from_form(&form(&[("bid", ""), ("new_bid", "5")])).unwrap(),
            ListingAction::PlaceBid {
                new_bid: "5".to_string()
            }
        );
        assert_eq!(
            ListingAction::from_form(&form(&[("watchlist", "1")])).unwrap(),
            ListingAction::ToggleWatchlist {
                value: "1".to_string()
            }
        );
        assert_eq!(
            ListingAction::from_form(&form(&[("close_listing", "")])).unwrap(),
            ListingAction::Close
        );
        assert_eq!(
            ListingAction::from_form(&form(&[("add_comment", ""), ("text", "hi")])).unwrap(),
            ListingAction::AddComment {
                text: "hi".to_string()
            }
        );
        assert!(matches!(
            ListingAction::from_form(&form(&[("new_bid", "5")])),
            Err(AppError::UnknownAction)
        ));
    }

    #[test]
    fn test_is_checked() {
        assert!(is_checked(Some("on")));
        assert!(is_checked(Some("true")));
        assert!(!is_checked(Some("off")));
        assert!(!is_checked(Some("0")));
        assert!(!is_checked(None));
    }

    #[tokio::test]
    async fn test_create_listing_collects_field_errors() {
        let store = MemoryStore::new();
        let owner = create_user(&store, "owner").await;
        let mut bad = listing_form("-3");
        bad.title = String::new();
        bad.category = Some("42".to_string());

        match handle_create_listing(&store, &owner, &bad).await {
            Err(AppError::Validation(errors)) => {
                assert!(errors.get("title").is_some());
                assert!(errors.get("initial_bid").is_some());
                assert_eq!(errors.get("category"), Some("Select a valid category."));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_listing_with_category() {
        let store = MemoryStore::new();
        let owner = create_user(&store, "owner").await;
        let category = store.ensure_category("Watches").await.unwrap();
        let mut form = listing_form("10");
        form.category = Some(category.id.to_string());

        let listing = handle_create_listing(&store, &owner, &form).await.unwrap();
        assert_eq!(listing.category_id, Some(category.id));
        assert_eq!(listing.initial_bid.to_string(), "10.00");
        assert!(listing.active);
        assert_eq!(listing.auction_winner_id, None);
    }

    #[tokio::test]
    async fn test_bid_sequence() {
        let store = MemoryStore::new();
        let owner = create_user(&store, "owner").await;
        let bidder = create_user(&store, "bidder").await;
        let listing = handle_create_listing(&store, &owner, &listing_form("10.00"))
            .await
            .unwrap();

        assert!(handle_place_bid(&store, &bidder, &listing, "10.00").await.is_err());
        assert!(handle_place_bid(&store, &bidder, &listing, "abc").await.is_err());
        let bid = handle_place_bid(&store, &bidder, &listing, "10.01").await.unwrap();
        assert_eq!(bid.value, Decimal::from_str("10.01").unwrap());

        let bids = store.list_bids(listing.id).await.unwrap();
        assert_eq!(rules::current_bid(&listing, &bids), Decimal::from_str("10.01").unwrap());
        assert!(handle_place_bid(&store, &bidder, &listing, "10.01").await.is_err());
    }

    #[tokio::test]
    async fn test_watchlist_toggle_persists() {
        let store = MemoryStore::new();
        let owner = create_user(&store, "owner").await;
        let viewer = create_user(&store, "viewer").await;
        let mut listing = handle_create_listing(&store, &owner, &listing_form("1"))
            .await
            .unwrap();

        assert!(handle_toggle_watchlist(&store, &viewer, &mut listing, "1").await.unwrap());
        let stored = store.find_listing(listing.id).await.unwrap().unwrap();
        assert!(rules::is_on_watchlist(&stored, &viewer));

        assert!(!handle_toggle_watchlist(&store, &viewer, &mut listing, "0").await.unwrap());
        let stored = store.find_listing(listing.id).await.unwrap().unwrap();
        assert!(!rules::is_on_watchlist(&stored, &viewer));

        assert!(handle_toggle_watchlist(&store, &viewer, &mut listing, "yes").await.is_err());
    }

    #[tokio::test]
    async fn test_close_listing_records_winner() {
        let store = MemoryStore::new();
        let owner = create_user(&store, "owner").await;
        let bidder = create_user(&store, "bidder").await;
        let mut listing = handle_create_listing(&store, &owner, &listing_form("10"))
            .await
            .unwrap();
        handle_place_bid(&store, &bidder, &listing, "15.00").await.unwrap();

        let err = handle_close_listing(&store, &bidder, &mut listing).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let stored = store.find_listing(listing.id).await.unwrap().unwrap();
        assert!(stored.active);
        assert_eq!(stored.auction_winner_id, None);

        let outcome = handle_close_listing(&store, &owner, &mut listing).await.unwrap();
        assert_eq!(
            outcome,
            ClosureOutcome::Closed {
                winner_id: Some(bidder.id)
            }
        );
        let stored = store.find_listing(listing.id).await.unwrap().unwrap();
        assert!(!stored.active);
        assert_eq!(stored.auction_winner_id, Some(bidder.id));
    }

    #[tokio::test]
    async fn test_add_comment() {
        let store = MemoryStore::new();
        let owner = create_user(&store, "owner").await;
        let listing = handle_create_listing(&store, &owner, &listing_form("1"))
            .await
            .unwrap();

        assert!(handle_add_comment(&store, &owner, &listing, "  ").await.is_err());
        let comment = handle_add_comment(&store, &owner, &listing, " Still available? ")
            .await
            .unwrap();
        assert_eq!(comment.text, "Still available?");
        assert_eq!(store.list_comments(listing.id).await.unwrap().len(), 1);
    }
}
// endregion: --- Tests
