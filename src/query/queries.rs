// region:    --- Users
/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash)
    VALUES ($1, $2, $3)
    RETURNING id, username, email, password_hash, created_at
"#;

/// 사용자 조회
pub const GET_USER: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1";

/// 사용자 이름으로 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";
// endregion: --- Users

// region:    --- Sessions
/// 세션 생성
pub const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, user_id, expires_at)
    VALUES ($1, $2, $3)
    RETURNING token, user_id, expires_at
"#;

/// 유효한 세션 조회
pub const GET_SESSION: &str =
    "SELECT token, user_id, expires_at FROM sessions WHERE token = $1 AND expires_at > $2";

/// 세션 삭제
pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";

/// 만료 세션 삭제
pub const DELETE_EXPIRED_SESSIONS: &str = "DELETE FROM sessions WHERE expires_at <= $1";
// endregion: --- Sessions

// region:    --- Categories
/// 카테고리 생성 (이미 있으면 무시)
pub const INSERT_CATEGORY: &str =
    "INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING";

/// 카테고리 이름으로 조회
pub const GET_CATEGORY_BY_NAME: &str =
    "SELECT id, name, created_at FROM categories WHERE name = $1";

/// 카테고리 조회
pub const GET_CATEGORY: &str = "SELECT id, name, created_at FROM categories WHERE id = $1";

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name, created_at FROM categories ORDER BY name";
// endregion: --- Categories

// region:    --- Listings
/// 상품 생성
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (user_id, category_id, title, description, img_url, initial_bid, active)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, user_id, category_id, title, description, img_url, initial_bid, active, created_at, auction_winner_id
"#;

/// 상품 조회
pub const GET_LISTING: &str = r#"
    SELECT id, user_id, category_id, title, description, img_url, initial_bid, active, created_at, auction_winner_id
    FROM listings
    WHERE id = $1
"#;

/// 진행 중인 상품 조회
pub const GET_ACTIVE_LISTINGS: &str = r#"
    SELECT id, user_id, category_id, title, description, img_url, initial_bid, active, created_at, auction_winner_id
    FROM listings
    WHERE active
    ORDER BY created_at, id
"#;

/// 카테고리별 상품 조회
pub const GET_CATEGORY_LISTINGS: &str = r#"
    SELECT id, user_id, category_id, title, description, img_url, initial_bid, active, created_at, auction_winner_id
    FROM listings
    WHERE category_id = $1
    ORDER BY created_at, id
"#;

/// 사용자 관심 상품 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.user_id, l.category_id, l.title, l.description, l.img_url, l.initial_bid, l.active, l.created_at, l.auction_winner_id
    FROM listings l
    JOIN watchlist w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at, l.id
"#;

/// 경매 종료
pub const CLOSE_LISTING: &str =
    "UPDATE listings SET active = FALSE, auction_winner_id = $2 WHERE id = $1";
// endregion: --- Listings

// region:    --- Watchlist
/// 관심 목록 사용자 조회
pub const GET_WATCHERS: &str =
    "SELECT listing_id, user_id FROM watchlist WHERE listing_id = ANY($1)";

/// 관심 목록 추가
pub const INSERT_WATCHER: &str =
    "INSERT INTO watchlist (listing_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";

/// 관심 목록 삭제
pub const DELETE_WATCHER: &str = "DELETE FROM watchlist WHERE listing_id = $1 AND user_id = $2";
// endregion: --- Watchlist

// region:    --- Bids
/// 상품 입찰 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, user_id, listing_id, value, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY value, id
"#;

/// 입찰 전 상품 행 잠금
pub const LOCK_LISTING: &str = r#"
    SELECT id FROM listings WHERE id = $1 FOR UPDATE
"#;

/// 입찰 저장 (진행 중이고 현재 입찰가보다 높을 때만)
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (user_id, listing_id, value)
    SELECT $1::BIGINT, l.id, $3::NUMERIC
    FROM listings l
    WHERE l.id = $2
      AND l.active
      AND $3::NUMERIC > COALESCE((SELECT MAX(b.value) FROM bids b WHERE b.listing_id = l.id), l.initial_bid)
    RETURNING id, user_id, listing_id, value, created_at
"#;
// endregion: --- Bids

// region:    --- Comments
/// 상품 댓글 조회
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, user_id, listing_id, text, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at, id
"#;

/// 댓글 저장
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (user_id, listing_id, text)
    VALUES ($1, $2, $3)
    RETURNING id, user_id, listing_id, text, created_at
"#;
// endregion: --- Comments
