//! Composition root: wires the store, services, and event bus together.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::{
    ArtifactService, BacklogService, SeaOrmArtifactService, SeaOrmBacklogService,
    SeaOrmUserService, UserService,
};

/// Event bus capacity; slow subscribers lag rather than block publishers.
const EVENT_BUS_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub users: Arc<dyn UserService>,
    pub artifacts: Arc<dyn ArtifactService>,
    pub backlogs: Arc<dyn BacklogService>,
    pub events: broadcast::Sender<NotificationEvent>,
}

impl AppState {
    pub async fn init(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(Store::new(&config.general.database_path).await?);
        let (events, _) = broadcast::channel(EVENT_BUS_CAPACITY);

        let users: Arc<dyn UserService> =
            Arc::new(SeaOrmUserService::new(store.clone(), events.clone()));
        let artifacts: Arc<dyn ArtifactService> =
            Arc::new(SeaOrmArtifactService::new(store.clone(), events.clone()));
        let backlogs: Arc<dyn BacklogService> = Arc::new(SeaOrmBacklogService::new(
            store.clone(),
            config.ranking,
            events.clone(),
        ));

        Ok(Self {
            store,
            users,
            artifacts,
            backlogs,
            events,
        })
    }
}
