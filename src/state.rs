use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::SqlitePool;

use crate::auth::SessionUser;
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: SqlitePool,
    pub sessions: Cache<String, SessionUser>,
}

impl AppState {
    pub async fn build(
        config: AppConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let pool = db::open(&config).await?;
        db::init_schema(&pool).await?;

        let admin_hash = bcrypt::hash(&config.bootstrap_admin_password, bcrypt::DEFAULT_COST)?;
        db::seed(&pool, &config.bootstrap_admin_username, &admin_hash).await?;

        let sessions = Cache::builder()
            .max_capacity(config.session_cache_max_entries)
            .time_to_live(Duration::from_secs(config.session_ttl_seconds))
            .build();

        Ok(Self {
            config: Arc::new(config),
            db: pool,
            sessions,
        })
    }
}
