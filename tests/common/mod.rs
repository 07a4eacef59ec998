//! Test utilities and common setup.

use axum::Router;
use sqlx::SqlitePool;

use tallyboard::api::{self, AppState};
use tallyboard::db;
use tallyboard::service::ValueService;
use tallyboard::store::StateStore;

/// Create a test application backed by an in-memory database.
pub async fn test_app() -> Router {
    let (app, _pool) = test_app_with_pool().await;
    app
}

/// Create a test application and keep a handle on the pool,
/// for tests that need to break storage underneath the service.
pub async fn test_app_with_pool() -> (Router, SqlitePool) {
    let pool = db::open_in_memory().await.unwrap();

    let store = StateStore::new(pool.clone());
    store.initialize().await.unwrap();

    let values = ValueService::new(store).await.unwrap();

    (api::create_router(AppState::new(values)), pool)
}
