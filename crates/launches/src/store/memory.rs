use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LaunchFilter, LaunchStore, PlanetStore, Result, Window};
use crate::model::{Launch, Planet};

/// In-process store, used by tests and for running without a database file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    launches: Arc<RwLock<BTreeMap<u32, Launch>>>,
    planets: Arc<RwLock<BTreeMap<String, Planet>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LaunchStore for MemoryStore {
    async fn find_launch(&self, filter: &LaunchFilter) -> Result<Option<Launch>> {
        let launches = self.launches.read().await;
        if let Some(flight_number) = filter.flight_number {
            return Ok(launches
                .get(&flight_number)
                .filter(|launch| filter.matches(launch))
                .cloned());
        }
        Ok(launches.values().find(|launch| filter.matches(launch)).cloned())
    }

    async fn find_launches(&self, window: Window) -> Result<Vec<Launch>> {
        let launches = self.launches.read().await;
        let page = launches.values().rev().skip(window.skip);
        Ok(match window.limit {
            Some(limit) => page.take(limit).cloned().collect(),
            None => page.cloned().collect(),
        })
    }

    async fn upsert_launch(&self, launch: &Launch) -> Result<()> {
        let mut launches = self.launches.write().await;
        launches.insert(launch.flight_number, launch.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        flight_number: u32,
        upcoming: bool,
        success: Option<bool>,
    ) -> Result<usize> {
        let mut launches = self.launches.write().await;
        match launches.get_mut(&flight_number) {
            Some(launch) if launch.upcoming != upcoming || launch.success != success => {
                launch.upcoming = upcoming;
                launch.success = success;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn count_launches(&self) -> Result<usize> {
        Ok(self.launches.read().await.len())
    }
}

#[async_trait]
impl PlanetStore for MemoryStore {
    async fn find_planet_by_kepler_name(&self, kepler_name: &str) -> Result<Option<Planet>> {
        Ok(self.planets.read().await.get(kepler_name).cloned())
    }

    async fn upsert_planet(&self, planet: &Planet) -> Result<()> {
        let mut planets = self.planets.write().await;
        planets.insert(planet.kepler_name.clone(), planet.clone());
        Ok(())
    }

    async fn list_planets(&self) -> Result<Vec<Planet>> {
        Ok(self.planets.read().await.values().cloned().collect())
    }
}
