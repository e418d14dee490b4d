use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::config::storage::StorageConfig;
use crate::utils::storage::{FileStorage, LocalFileStorage};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage: Arc<dyn FileStorage>,
}

pub async fn init_app_state() -> AppState {
    let storage_config = StorageConfig::from_env();

    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        storage: Arc::new(LocalFileStorage::new(
            storage_config.root,
            storage_config.public_base_url,
        )),
    }
}
