//! Service container for dependency injection
//!
//! Wires up the store and the query services with their dependencies.
//! Sessions are created by the hosting side (the CLI browse loop, a bot
//! shard) and handed explicit service references; nothing here is global.

use std::sync::Arc;

use crate::application::services::{
    ItemQueryService, LevellingQueryService, MonsterQueryService,
};
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::store::JsonWikiStore;
use crate::infrastructure::traits::WikiStore;

/// Container holding the shared store and application settings.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Backing store abstraction
    pub store: Arc<dyn WikiStore>,
}

impl ServiceContainer {
    /// Create a container backed by the dataset file from settings.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let store = JsonWikiStore::open(&settings.dataset_path())?;
        Ok(Self::with_deps(settings, Arc::new(store)))
    }

    /// Create a container with a custom store (for testing).
    pub fn with_deps(settings: Settings, store: Arc<dyn WikiStore>) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
        }
    }

    pub fn item_query(&self) -> ItemQueryService {
        ItemQueryService::new(
            Arc::clone(&self.store),
            self.settings.page_size,
            self.settings.result_limit,
        )
    }

    pub fn monster_query(&self) -> MonsterQueryService {
        MonsterQueryService::new(
            Arc::clone(&self.store),
            self.settings.page_size,
            self.settings.result_limit,
        )
    }

    pub fn levelling_query(&self) -> LevellingQueryService {
        LevellingQueryService::new(Arc::clone(&self.store), self.settings.page_size)
    }
}
