// region:    --- Imports
use crate::auction::model::{Category, Comment, Listing, User};
use crate::auction::rules;
use crate::bidding::commands::CreateListingForm;
use crate::bidding::model::Bid;
use crate::error::{AppError, FieldErrors};
use crate::store::MarketStore;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Page Contexts
/// 목록용 상품 요약
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    #[serde(flatten)]
    pub listing: Listing,
    pub current_bid: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub listings: Vec<ListingSummary>,
}

/// 상품 상세 페이지
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub listing: Listing,
    pub current_bid: Decimal,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
    pub on_watchlist: bool,
    pub is_owner: bool,
    pub errors: FieldErrors,
}

impl ListingPage {
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesPage {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub listings: Vec<ListingSummary>,
    pub active_listings: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchlistPage {
    pub listings: Vec<ListingSummary>,
}

/// 상품 등록 페이지
#[derive(Debug, Clone, Serialize)]
pub struct CreatePage {
    pub form: CreateListingForm,
    pub categories: Vec<Category>,
    pub errors: FieldErrors,
}
// endregion: --- Page Contexts

// region:    --- Query Handlers
/// 상품 조회 (없으면 NotFound)
pub async fn load_listing(store: &dyn MarketStore, listing_id: i64) -> Result<Listing, AppError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    store
        .find_listing(listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Error, listing does not exist".to_string()))
}

/// 진행 중인 상품 목록
pub async fn get_index_page(store: &dyn MarketStore) -> Result<IndexPage, AppError> {
    info!("{:<12} --> 진행 중인 상품 조회", "Query");
    let listings = store.list_active_listings().await?;
    Ok(IndexPage {
        listings: summarize(store, listings).await?,
    })
}

/// 상품 상세
pub async fn get_listing_page(
    store: &dyn MarketStore,
    listing: Listing,
    user: Option<&User>,
) -> Result<ListingPage, AppError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", listing.id);
    let bids = store.list_bids(listing.id).await?;
    let comments = store.list_comments(listing.id).await?;

    Ok(ListingPage {
        current_bid: rules::current_bid(&listing, &bids),
        on_watchlist: user.map_or(false, |user| rules::is_on_watchlist(&listing, user)),
        is_owner: user.map_or(false, |user| listing.is_owned_by(user)),
        listing,
        bids,
        comments,
        errors: FieldErrors::new(),
    })
}

/// 카테고리 목록
pub async fn get_categories_page(store: &dyn MarketStore) -> Result<CategoriesPage, AppError> {
    info!("{:<12} --> 카테고리 목록 조회", "Query");
    Ok(CategoriesPage {
        categories: store.list_categories().await?,
    })
}

/// 카테고리별 진행 중인 상품
pub async fn get_category_page(
    store: &dyn MarketStore,
    category_id: i64,
) -> Result<CategoryPage, AppError> {
    info!("{:<12} --> 카테고리 조회 id: {}", "Query", category_id);
    let category = store
        .find_category(category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Error, category does not exist".to_string()))?;

    let listings: Vec<Listing> = store
        .list_category_listings(category_id)
        .await?
        .into_iter()
        .filter(|listing| listing.active)
        .collect();
    let listings = summarize(store, listings).await?;

    Ok(CategoryPage {
        category,
        active_listings: !listings.is_empty(),
        listings,
    })
}

/// 관심 목록
pub async fn get_watchlist_page(
    store: &dyn MarketStore,
    user: &User,
) -> Result<WatchlistPage, AppError> {
    info!("{:<12} --> 관심 목록 조회 user_id: {}", "Query", user.id);
    let listings = store.list_watched_listings(user.id).await?;
    Ok(WatchlistPage {
        listings: summarize(store, listings).await?,
    })
}

/// 상품 등록 페이지
pub async fn get_create_page(
    store: &dyn MarketStore,
    form: CreateListingForm,
    errors: FieldErrors,
) -> Result<CreatePage, AppError> {
    Ok(CreatePage {
        form,
        categories: store.list_categories().await?,
        errors,
    })
}

async fn summarize(
    store: &dyn MarketStore,
    listings: Vec<Listing>,
) -> Result<Vec<ListingSummary>, AppError> {
    let mut summaries = Vec::with_capacity(listings.len());
    for listing in listings {
        let bids = store.list_bids(listing.id).await?;
        summaries.push(ListingSummary {
            current_bid: rules::current_bid(&listing, &bids),
            listing,
        });
    }
    Ok(summaries)
}
// endregion: --- Query Handlers
