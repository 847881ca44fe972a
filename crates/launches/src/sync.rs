//! Mirrors the external launch feed into the launch store.
//!
//! Seeding runs once per database: if the sentinel launch (flight 1,
//! FalconSat on a Falcon 1) is already stored, the feed is not fetched.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::date::parse_launch_date;
use crate::feed::{FeedError, FeedLaunch, LaunchFeed};
use crate::model::Launch;
use crate::store::{LaunchFilter, LaunchStore, StoreError};

/// Flight number of the launch whose presence marks the store as seeded
pub const SENTINEL_FLIGHT_NUMBER: u32 = 1;
pub const SENTINEL_ROCKET: &str = "Falcon 1";
pub const SENTINEL_MISSION: &str = "FalconSat";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Feed record for flight {flight_number} has invalid date_local {date_local:?}")]
    InvalidRecord {
        flight_number: u32,
        date_local: String,
    },
}

/// What `ensure_seeded` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The sentinel launch was present; nothing was fetched
    AlreadySeeded,
    /// The feed was mirrored; `records` launches were upserted
    Synchronized { records: usize },
}

/// Map a provider record onto the stored launch shape.
///
/// Customers from every payload are concatenated in feed order, duplicates kept.
pub fn launch_from_feed(doc: FeedLaunch) -> Result<Launch, SyncError> {
    let launch_date =
        parse_launch_date(&doc.date_local).ok_or_else(|| SyncError::InvalidRecord {
            flight_number: doc.flight_number,
            date_local: doc.date_local.clone(),
        })?;

    let customers = doc
        .payloads
        .into_iter()
        .flat_map(|payload| payload.customers)
        .collect();

    Ok(Launch {
        flight_number: doc.flight_number,
        mission: doc.name,
        rocket: doc.rocket.name,
        launch_date,
        destination: None,
        upcoming: doc.upcoming,
        success: doc.success,
        customers,
    })
}

pub struct LaunchSynchronizer {
    feed: Arc<dyn LaunchFeed>,
    store: Arc<dyn LaunchStore>,
}

impl LaunchSynchronizer {
    pub fn new(feed: Arc<dyn LaunchFeed>, store: Arc<dyn LaunchStore>) -> Self {
        Self { feed, store }
    }

    /// Synchronize unless the sentinel launch shows the store was already seeded.
    pub async fn ensure_seeded(&self) -> Result<SeedOutcome, SyncError> {
        let sentinel = LaunchFilter::flight_number(SENTINEL_FLIGHT_NUMBER)
            .with_rocket(SENTINEL_ROCKET)
            .with_mission(SENTINEL_MISSION);

        if self.store.find_launch(&sentinel).await?.is_some() {
            info!("Launch data already loaded");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let records = self.synchronize_all().await?;
        Ok(SeedOutcome::Synchronized { records })
    }

    /// Fetch the whole feed and upsert every record, one at a time, in feed order.
    pub async fn synchronize_all(&self) -> Result<usize, SyncError> {
        info!("Downloading launch data");
        let docs = self.feed.fetch_launches().await?;

        let mut records = 0;
        for doc in docs {
            let launch = launch_from_feed(doc)?;
            debug!(
                flight_number = launch.flight_number,
                mission = %launch.mission,
                "Saving launch"
            );
            self.store.upsert_launch(&launch).await?;
            records += 1;
        }

        info!(records, "Launch data synchronized");
        Ok(records)
    }
}
