//! Document-store abstraction over launch and planet records.
//!
//! The repository and synchronizer only see these traits; the SQLite and
//! in-memory backends implement the same semantics:
//! - `upsert_launch` replaces the whole record keyed by flight number
//! - `update_status` reports how many records actually changed
//! - `find_launches` is always ordered by flight number, newest first

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Launch, Planet};

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Corrupt record for flight {flight_number}: {reason}")]
    CorruptRecord { flight_number: u32, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Field-equality filter for launch lookups. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchFilter {
    pub flight_number: Option<u32>,
    pub rocket: Option<String>,
    pub mission: Option<String>,
}

impl LaunchFilter {
    pub fn flight_number(flight_number: u32) -> Self {
        Self {
            flight_number: Some(flight_number),
            ..Self::default()
        }
    }

    pub fn with_rocket(mut self, rocket: impl Into<String>) -> Self {
        self.rocket = Some(rocket.into());
        self
    }

    pub fn with_mission(mut self, mission: impl Into<String>) -> Self {
        self.mission = Some(mission.into());
        self
    }

    pub fn matches(&self, launch: &Launch) -> bool {
        self.flight_number.map_or(true, |n| launch.flight_number == n)
            && self.rocket.as_deref().map_or(true, |r| launch.rocket == r)
            && self.mission.as_deref().map_or(true, |m| launch.mission == m)
    }
}

/// Skip/limit window over the flight-number-descending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub skip: usize,
    /// `None` returns everything after `skip`
    pub limit: Option<usize>,
}

impl Window {
    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    pub fn first() -> Self {
        Self::new(0, Some(1))
    }
}

#[async_trait]
pub trait LaunchStore: Send + Sync {
    /// First launch matching `filter`.
    async fn find_launch(&self, filter: &LaunchFilter) -> Result<Option<Launch>>;

    /// Launches ordered by flight number descending, windowed.
    async fn find_launches(&self, window: Window) -> Result<Vec<Launch>>;

    /// Insert or fully replace the launch with the same flight number.
    async fn upsert_launch(&self, launch: &Launch) -> Result<()>;

    /// Set the status flags of one launch; returns the number of records modified.
    async fn update_status(
        &self,
        flight_number: u32,
        upcoming: bool,
        success: Option<bool>,
    ) -> Result<usize>;

    async fn count_launches(&self) -> Result<usize>;
}

#[async_trait]
pub trait PlanetStore: Send + Sync {
    async fn find_planet_by_kepler_name(&self, kepler_name: &str) -> Result<Option<Planet>>;

    async fn upsert_planet(&self, planet: &Planet) -> Result<()>;

    async fn list_planets(&self) -> Result<Vec<Planet>>;
}
