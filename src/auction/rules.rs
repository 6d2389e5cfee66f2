/// 경매 도메인 규칙
/// 1. 현재 입찰가 / 낙찰자
/// 2. 입찰 검증
/// 3. 관심 목록
/// 4. 경매 종료
// region:    --- Imports
use crate::auction::model::{Listing, User};
use crate::bidding::model::Bid;
use crate::error::AppError;
use rust_decimal::Decimal;

// endregion: --- Imports

/// 댓글 최대 길이
pub const MAX_COMMENT_LENGTH: usize = 1024;

pub const BID_TOO_LOW: &str = "Your bid must be greater than current bid";
pub const LISTING_CLOSED: &str = "This auction is closed";
pub const NOT_OWNER: &str = "ERROR: You're not allowed to perform this action.";

// region:    --- Price
/// 최고 입찰 (같은 금액이면 먼저 들어온 입찰)
pub fn highest_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().max_by(|a, b| {
        a.value
            .cmp(&b.value)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    })
}

/// 현재 입찰가: 최고 입찰가, 입찰이 없으면 시작가
pub fn current_bid(listing: &Listing, bids: &[Bid]) -> Decimal {
    highest_bid(bids)
        .map(|bid| bid.value)
        .unwrap_or(listing.initial_bid)
}

/// 낙찰자 id, 입찰이 없으면 None
pub fn winner(bids: &[Bid]) -> Option<i64> {
    highest_bid(bids).map(|bid| bid.user_id)
}
// endregion: --- Price

// region:    --- Bid Validation
/// 신규 입찰 검증
///
/// 입찰가는 항상 현재 입찰가보다 커야 하므로 입찰 금액은 상품 내에서 순증가하며 중복되지 않는다.
pub fn validate_new_bid(listing: &Listing, bids: &[Bid], proposed: Decimal) -> Result<(), AppError> {
    if !listing.active {
        return Err(AppError::invalid("new_bid", LISTING_CLOSED));
    }
    if proposed <= current_bid(listing, bids) {
        return Err(AppError::invalid("new_bid", BID_TOO_LOW));
    }
    Ok(())
}
// endregion: --- Bid Validation

// region:    --- Watchlist
pub fn is_on_watchlist(listing: &Listing, user: &User) -> bool {
    listing.watchers.contains(&user.id)
}

/// 관심 목록 상태 설정, 상태가 바뀌었으면 true
pub fn set_watching(listing: &mut Listing, user: &User, watching: bool) -> bool {
    if watching {
        listing.add_watcher(user.id)
    } else {
        listing.remove_watcher(user.id)
    }
}
// endregion: --- Watchlist

// region:    --- Comment
/// 댓글 검증, 앞뒤 공백을 제거한 본문 반환
pub fn validate_comment(text: &str) -> Result<String, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::invalid("text", "This field is required."));
    }
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::invalid(
            "text",
            format!(
                "Ensure this value has at most {} characters.",
                MAX_COMMENT_LENGTH
            ),
        ));
    }
    Ok(text.to_string())
}
// endregion: --- Comment

// region:    --- Closure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureOutcome {
    /// 이번 요청으로 종료됨
    Closed { winner_id: Option<i64> },
    AlreadyClosed,
}

/// 경매 종료 (Open -> Closed, 되돌릴 수 없음)
///
/// 소유자만 종료할 수 있으며, 권한이 없으면 상품을 변경하지 않는다.
pub fn close_listing(
    listing: &mut Listing,
    bids: &[Bid],
    user: &User,
) -> Result<ClosureOutcome, AppError> {
    if !listing.is_owned_by(user) {
        return Err(AppError::Forbidden(NOT_OWNER.to_string()));
    }
    if !listing.active {
        return Ok(ClosureOutcome::AlreadyClosed);
    }

    let winner_id = winner(bids);
    listing.active = false;
    listing.auction_winner_id = winner_id;
    Ok(ClosureOutcome::Closed { winner_id })
}
// endregion: --- Closure

// endregion: --- Tests
