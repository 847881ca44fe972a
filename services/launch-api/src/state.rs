use std::sync::Arc;

use launchpad_core::Config;
use launchpad_launches::{
    LaunchFeed, LaunchRepository, LaunchStore, LaunchSynchronizer, Planet, PlanetStore,
    SeedOutcome, SpaceXClient, SqliteStore, SyncError,
};
use tracing::info;

pub struct AppState {
    pub config: Config,
    pub launches: LaunchRepository,
    planets: Arc<dyn PlanetStore>,
    synchronizer: LaunchSynchronizer,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(SqliteStore::open(&config.storage.database_path)?);
        let feed = Arc::new(SpaceXClient::new(config.feed.base_url.clone()));
        Ok(Self::with_backends(config, store.clone(), store, feed))
    }

    pub fn with_backends(
        config: Config,
        launches: Arc<dyn LaunchStore>,
        planets: Arc<dyn PlanetStore>,
        feed: Arc<dyn LaunchFeed>,
    ) -> Self {
        Self {
            synchronizer: LaunchSynchronizer::new(feed, launches.clone()),
            launches: LaunchRepository::new(launches, planets.clone()),
            planets,
            config,
        }
    }

    /// Load the configured planets and mirror the launch feed if this
    /// database has never been seeded. Runs before the listener is bound.
    pub async fn prepare(&self) -> Result<SeedOutcome, SyncError> {
        let names = &self.config.planets.kepler_names;
        for name in names {
            self.planets.upsert_planet(&Planet::new(name.as_str())).await?;
        }
        info!(planets = names.len(), "Planets loaded");

        self.synchronizer.ensure_seeded().await
    }
}
