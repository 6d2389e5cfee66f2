/// 만료 세션 정리 스케줄러
// region:    --- Imports
use crate::store::{MarketStore, StoreError};
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Session Cleanup Scheduler
/// 만료 세션 정리 스케줄러
pub struct SessionCleanupScheduler {
    store: Arc<dyn MarketStore>,
    period: Duration,
}

impl SessionCleanupScheduler {
    pub fn new(store: Arc<dyn MarketStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// 스케줄러 시작
    pub fn start(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = Self::purge_expired_sessions(store.as_ref()).await {
                    error!(
                        "{:<12} --> 만료 세션 정리 중 오류 발생: {:?}",
                        "Scheduler", e
                    );
                }
            }
        })
    }

    /// 만료 세션 삭제
    pub async fn purge_expired_sessions(store: &dyn MarketStore) -> Result<u64, StoreError> {
        let removed = store.delete_expired_sessions(Utc::now()).await?;
        debug!("{:<12} --> 만료 세션 {}개 삭제", "Scheduler", removed);
        Ok(removed)
    }
}
// endregion: --- Session Cleanup Scheduler

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_purge_expired_sessions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .create_session(1, now - chrono::Duration::minutes(5))
            .await
            .unwrap();
        let live = store
            .create_session(1, now + chrono::Duration::hours(1))
            .await
            .unwrap();

        let removed = SessionCleanupScheduler::purge_expired_sessions(&store)
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.find_session(&live.token, now).await.unwrap().is_some());
    }
}
// endregion: --- Tests
