use crate::config::{AppConfig, JwtConfig};
use crate::db::PgStore;
use crate::storage::{MemoryStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => Arc::new(PgStore::connect(url).await?) as Arc<dyn Store>,
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store");
                Arc::new(MemoryStore::new()) as Arc<dyn Store>
            }
        };

        // Unknown-user hash is computed before serving.
        crate::auth::services::dummy_hash();

        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// In-memory state with a fixed test signing key.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 30,
            },
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
