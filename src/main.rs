// region:    --- Imports
use auction_marketplace::config::Config;
use auction_marketplace::database::DatabaseManager;
use auction_marketplace::error::AppError;
use auction_marketplace::scheduler::SessionCleanupScheduler;
use auction_marketplace::state::AppState;
use auction_marketplace::store::{MarketStore, MemoryStore, PostgresStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    info!("{:<12} --> 설정 로드 완료", "Main");

    // 저장소 생성 (DATABASE_URL이 없으면 메모리 저장소)
    let store: Arc<dyn MarketStore> = match config.database_url {
        Some(_) => {
            let db_manager = Arc::new(DatabaseManager::new(&config).await?);
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 메모리 저장소로 실행합니다",
                "Main"
            );
            Arc::new(MemoryStore::new())
        }
    };

    // 기본 카테고리 생성
    for name in &config.seed_categories {
        let category = store.ensure_category(name).await?;
        info!("{:<12} --> 카테고리 준비: {} ({})", "Main", category.name, category.id);
    }

    // 만료 세션 정리
    let cleanup_period = Duration::from_secs(config.session_cleanup_interval_secs.max(1));
    let _cleanup = SessionCleanupScheduler::new(Arc::clone(&store), cleanup_period).start();

    // 라우터 설정
    let address = config.server_address();
    let routes_all = auction_marketplace::create_app(AppState::new(store, config));

    // 리스너 생성
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", address, e)))?;
    info!("{:<12} --> Web Server: Listening on {}", "Main", address);

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
