//! Launch repository: lookup, listing, scheduling and aborting launches.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::model::{Launch, NewLaunch, Planet, DEFAULT_FLIGHT_NUMBER};
use crate::store::{LaunchFilter, LaunchStore, PlanetStore, StoreError, Window};

#[derive(Debug, Error)]
pub enum LaunchError {
    /// Scheduling referenced a planet that is not in the planet store
    #[error("No matching planet was found!")]
    UnknownDestination { destination: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, LaunchError>;

/// Launch operations keyed by flight number
#[derive(Clone)]
pub struct LaunchRepository {
    launches: Arc<dyn LaunchStore>,
    planets: Arc<dyn PlanetStore>,
}

impl LaunchRepository {
    pub fn new(launches: Arc<dyn LaunchStore>, planets: Arc<dyn PlanetStore>) -> Self {
        Self { launches, planets }
    }

    pub async fn find_by_flight_number(&self, flight_number: u32) -> Result<Option<Launch>> {
        let filter = LaunchFilter::flight_number(flight_number);
        Ok(self.launches.find_launch(&filter).await?)
    }

    pub async fn exists(&self, flight_number: u32) -> Result<bool> {
        Ok(self.find_by_flight_number(flight_number).await?.is_some())
    }

    /// Launches newest first. A `limit` of 0 returns everything after `skip`.
    pub async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Launch>> {
        let limit = (limit > 0).then_some(limit);
        Ok(self.launches.find_launches(Window::new(skip, limit)).await?)
    }

    /// Highest stored flight number, or the default base when empty.
    pub async fn latest_flight_number(&self) -> Result<u32> {
        let latest = self.launches.find_launches(Window::first()).await?;
        Ok(latest
            .first()
            .map_or(DEFAULT_FLIGHT_NUMBER, |launch| launch.flight_number))
    }

    /// Assign the next flight number and scheduling defaults, check the
    /// destination, then store the launch.
    ///
    /// Flight-number assignment is read-then-write; concurrent schedulers can
    /// race and collide.
    pub async fn schedule(&self, new_launch: NewLaunch) -> Result<Launch> {
        let flight_number = self.latest_flight_number().await? + 1;
        let launch = new_launch.into_scheduled(flight_number);

        let destination = launch.destination.clone().unwrap_or_default();
        if self
            .planets
            .find_planet_by_kepler_name(&destination)
            .await?
            .is_none()
        {
            warn!(destination = %destination, "Rejected launch to unknown planet");
            return Err(LaunchError::UnknownDestination { destination });
        }

        self.launches.upsert_launch(&launch).await?;
        info!(
            flight_number = launch.flight_number,
            mission = %launch.mission,
            "Launch scheduled"
        );
        Ok(launch)
    }

    /// Mark a launch aborted. Returns true only if exactly one record changed;
    /// a missing flight number and an already-aborted launch both return false.
    pub async fn abort(&self, flight_number: u32) -> Result<bool> {
        let modified = self
            .launches
            .update_status(flight_number, false, Some(false))
            .await?;
        Ok(modified == 1)
    }

    pub async fn planets(&self) -> Result<Vec<Planet>> {
        Ok(self.planets.list_planets().await?)
    }
}
