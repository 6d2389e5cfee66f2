use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
}

// 신규 입찰
#[derive(Debug, Clone)]
pub struct NewBid {
    pub user_id: i64,
    pub listing_id: i64,
    pub value: Decimal,
}
