use crate::config::Config;
use crate::store::MarketStore;
use std::sync::Arc;

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
