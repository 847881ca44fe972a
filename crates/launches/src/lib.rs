//! Launch records for Launchpad.
//!
//! This crate provides:
//! - The launch and planet data model
//! - A document-store abstraction with SQLite and in-memory backends
//! - The external launch feed client and the startup synchronizer
//! - The launch repository used by the API (list, schedule, abort)

pub mod date;
pub mod feed;
pub mod model;
pub mod repository;
pub mod store;
pub mod sync;

// Re-export key types for convenience
pub use date::parse_launch_date;
pub use feed::{FeedError, FeedLaunch, LaunchFeed, SpaceXClient};
pub use model::{Launch, NewLaunch, Planet, DEFAULT_CUSTOMERS, DEFAULT_FLIGHT_NUMBER};
pub use repository::{LaunchError, LaunchRepository};
pub use store::{LaunchFilter, LaunchStore, MemoryStore, PlanetStore, SqliteStore, StoreError, Window};
pub use sync::{launch_from_feed, LaunchSynchronizer, SeedOutcome, SyncError};
