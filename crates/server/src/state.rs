//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::automation::TriggerScanner;
use crate::services::dispatcher::CampaignDispatcher;
use crate::services::settings::SettingsProvider;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    settings: SettingsProvider,
    dispatcher: CampaignDispatcher,
    scanner: TriggerScanner,
}

impl AppState {
    /// Build the state and its service graph from config and pool.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let settings = SettingsProvider::new(pool.clone());
        let dispatcher = CampaignDispatcher::new(pool.clone(), settings.clone());
        let scanner = TriggerScanner::new(pool.clone(), dispatcher.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                settings,
                dispatcher,
                scanner,
            }),
        }
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Configuration provider (settings table -> env -> default).
    #[must_use]
    pub fn settings(&self) -> &SettingsProvider {
        &self.inner.settings
    }

    /// Campaign dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &CampaignDispatcher {
        &self.inner.dispatcher
    }

    /// Automated trigger scanner.
    #[must_use]
    pub fn scanner(&self) -> &TriggerScanner {
        &self.inner.scanner
    }
}
