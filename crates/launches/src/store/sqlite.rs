//! SQLite storage backend.
//!
//! Launches live in a single `launches` table keyed by flight number, with
//! the customer list stored as a JSON array. Upserts are full replaces via
//! `INSERT ... ON CONFLICT DO UPDATE`.
//!
//! Statements run inline on the calling task behind a `std::sync::Mutex`
//! rather than through `spawn_blocking`. Every statement is a short keyed
//! write or an ordered scan of one table, and the service is the only
//! writer, so the lock is never held across an await point or for longer
//! than one statement.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use tracing::{debug, info};

use super::{LaunchFilter, LaunchStore, PlanetStore, Result, StoreError, Window};
use crate::model::{Launch, Planet};

const LAUNCH_COLUMNS: &str =
    "flight_number, mission, rocket, launch_date, destination, upcoming, success, customers";

/// Launch and planet store backed by a SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Raw column values, converted to a [`Launch`] outside the rusqlite row callback
struct LaunchRow {
    flight_number: i64,
    mission: String,
    rocket: String,
    launch_date: String,
    destination: Option<String>,
    upcoming: bool,
    success: Option<bool>,
    customers: String,
}

impl LaunchRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            flight_number: row.get(0)?,
            mission: row.get(1)?,
            rocket: row.get(2)?,
            launch_date: row.get(3)?,
            destination: row.get(4)?,
            upcoming: row.get(5)?,
            success: row.get(6)?,
            customers: row.get(7)?,
        })
    }

    fn into_launch(self) -> Result<Launch> {
        let flight_number = self.flight_number as u32;
        let launch_date = DateTime::parse_from_rfc3339(&self.launch_date)
            .map_err(|e| StoreError::CorruptRecord {
                flight_number,
                reason: format!("launch_date {:?}: {}", self.launch_date, e),
            })?
            .with_timezone(&Utc);

        Ok(Launch {
            flight_number,
            mission: self.mission,
            rocket: self.rocket,
            launch_date,
            destination: self.destination,
            upcoming: self.upcoming,
            success: self.success,
            customers: serde_json::from_str(&self.customers)?,
        })
    }
}

impl SqliteStore {
    /// Create or open a store at the specified path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening launch store");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        debug!(journal_mode = %mode, "Launch store journal configured");

        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS launches (
                flight_number INTEGER PRIMARY KEY,
                mission TEXT NOT NULL,
                rocket TEXT NOT NULL,
                launch_date TEXT NOT NULL,
                destination TEXT,
                upcoming INTEGER NOT NULL,
                success INTEGER,
                customers TEXT NOT NULL DEFAULT '[]'
            );

            CREATE TABLE IF NOT EXISTS planets (
                kepler_name TEXT PRIMARY KEY
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn find_launch_sync(&self, filter: &LaunchFilter) -> Result<Option<Launch>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {LAUNCH_COLUMNS}
            FROM launches
            WHERE (?1 IS NULL OR flight_number = ?1)
              AND (?2 IS NULL OR rocket = ?2)
              AND (?3 IS NULL OR mission = ?3)
            ORDER BY flight_number
            LIMIT 1
            "#
        ))?;
        let row = stmt
            .query_row(
                params![filter.flight_number, filter.rocket, filter.mission],
                LaunchRow::from_row,
            )
            .optional()?;
        row.map(LaunchRow::into_launch).transpose()
    }

    fn find_launches_sync(&self, window: Window) -> Result<Vec<Launch>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {LAUNCH_COLUMNS}
            FROM launches
            ORDER BY flight_number DESC
            LIMIT ?1 OFFSET ?2
            "#
        ))?;
        // SQLite treats a negative LIMIT as unbounded and a negative OFFSET as 0
        let limit = window.limit.map_or(-1, clamp_to_i64);
        let offset = clamp_to_i64(window.skip);
        let rows = stmt
            .query_map(params![limit, offset], LaunchRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(LaunchRow::into_launch).collect()
    }

    fn upsert_launch_sync(&self, launch: &Launch) -> Result<()> {
        let customers = serde_json::to_string(&launch.customers)?;
        let conn = self.conn()?;
        conn.execute(
            &format!(
                r#"
                INSERT INTO launches ({LAUNCH_COLUMNS})
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(flight_number) DO UPDATE SET
                    mission = excluded.mission,
                    rocket = excluded.rocket,
                    launch_date = excluded.launch_date,
                    destination = excluded.destination,
                    upcoming = excluded.upcoming,
                    success = excluded.success,
                    customers = excluded.customers
                "#
            ),
            params![
                launch.flight_number,
                launch.mission,
                launch.rocket,
                launch
                    .launch_date
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                launch.destination,
                launch.upcoming,
                launch.success,
                customers,
            ],
        )?;
        Ok(())
    }

    fn update_status_sync(
        &self,
        flight_number: u32,
        upcoming: bool,
        success: Option<bool>,
    ) -> Result<usize> {
        let conn = self.conn()?;
        let modified = conn.execute(
            r#"
            UPDATE launches
            SET upcoming = ?2, success = ?3
            WHERE flight_number = ?1
              AND (upcoming IS NOT ?2 OR success IS NOT ?3)
            "#,
            params![flight_number, upcoming, success],
        )?;
        Ok(modified)
    }

    fn count_launches_sync(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM launches", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn find_planet_sync(&self, kepler_name: &str) -> Result<Option<Planet>> {
        let conn = self.conn()?;
        let planet = conn
            .query_row(
                "SELECT kepler_name FROM planets WHERE kepler_name = ?1",
                [kepler_name],
                |row| Ok(Planet::new(row.get::<_, String>(0)?)),
            )
            .optional()?;
        Ok(planet)
    }

    fn upsert_planet_sync(&self, planet: &Planet) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO planets (kepler_name) VALUES (?1)",
            [&planet.kepler_name],
        )?;
        Ok(())
    }

    fn list_planets_sync(&self) -> Result<Vec<Planet>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT kepler_name FROM planets ORDER BY kepler_name")?;
        let planets = stmt
            .query_map([], |row| Ok(Planet::new(row.get::<_, String>(0)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(planets)
    }
}

fn clamp_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl LaunchStore for SqliteStore {
    async fn find_launch(&self, filter: &LaunchFilter) -> Result<Option<Launch>> {
        self.find_launch_sync(filter)
    }

    async fn find_launches(&self, window: Window) -> Result<Vec<Launch>> {
        self.find_launches_sync(window)
    }

    async fn upsert_launch(&self, launch: &Launch) -> Result<()> {
        self.upsert_launch_sync(launch)
    }

    async fn update_status(
        &self,
        flight_number: u32,
        upcoming: bool,
        success: Option<bool>,
    ) -> Result<usize> {
        self.update_status_sync(flight_number, upcoming, success)
    }

    async fn count_launches(&self) -> Result<usize> {
        self.count_launches_sync()
    }
}

#[async_trait]
impl PlanetStore for SqliteStore {
    async fn find_planet_by_kepler_name(&self, kepler_name: &str) -> Result<Option<Planet>> {
        self.find_planet_sync(kepler_name)
    }

    async fn upsert_planet(&self, planet: &Planet) -> Result<()> {
        self.upsert_planet_sync(planet)
    }

    async fn list_planets(&self) -> Result<Vec<Planet>> {
        self.list_planets_sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn launch(flight_number: u32, success: Option<bool>) -> Launch {
        Launch {
            flight_number,
            mission: format!("mission-{}", flight_number),
            rocket: "Falcon 9".to_string(),
            launch_date: Utc.with_ymd_and_hms(2020, 5, 30, 19, 22, 0).unwrap(),
            destination: None,
            upcoming: false,
            success,
            customers: vec!["NASA".to_string(), "NASA".to_string()],
        }
    }

    #[tokio::test]
    async fn test_upsert_and_find_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let original = launch(94, None);
        store.upsert_launch(&original).await.unwrap();

        let found = store
            .find_launch(&LaunchFilter::flight_number(94))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, original);
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_record() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut scheduled = launch(5, Some(true));
        scheduled.destination = Some("Kepler-62 f".to_string());
        store.upsert_launch(&scheduled).await.unwrap();

        let replacement = launch(5, Some(false));
        store.upsert_launch(&replacement).await.unwrap();

        let found = store
            .find_launch(&LaunchFilter::flight_number(5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.destination, None);
        assert_eq!(found.success, Some(false));
        assert_eq!(store.count_launches().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_window_and_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        for n in [10, 30, 20, 40] {
            store.upsert_launch(&launch(n, Some(true))).await.unwrap();
        }

        let page: Vec<u32> = store
            .find_launches(Window::new(1, Some(2)))
            .await
            .unwrap()
            .iter()
            .map(|l| l.flight_number)
            .collect();
        assert_eq!(page, vec![30, 20]);

        let rest = store.find_launches(Window::new(2, None)).await.unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1].flight_number, 10);
    }

    #[tokio::test]
    async fn test_out_of_range_window_matches_memory_store() {
        let sqlite = SqliteStore::open_in_memory().unwrap();
        let memory = MemoryStore::new();
        for n in 1..=5 {
            sqlite.upsert_launch(&launch(n, Some(true))).await.unwrap();
            memory.upsert_launch(&launch(n, Some(true))).await.unwrap();
        }

        for window in [
            Window::new(usize::MAX - 3, Some(2)),
            Window::new(usize::MAX, None),
            Window::new(0, Some(usize::MAX)),
        ] {
            let from_sqlite = sqlite.find_launches(window).await.unwrap();
            let from_memory = memory.find_launches(window).await.unwrap();
            assert_eq!(from_sqlite, from_memory, "window {:?}", window);
        }
        assert!(sqlite
            .find_launches(Window::new(usize::MAX - 3, Some(2)))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_status_modified_count() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut upcoming = launch(3, None);
        upcoming.upcoming = true;
        store.upsert_launch(&upcoming).await.unwrap();

        assert_eq!(store.update_status(3, false, Some(false)).await.unwrap(), 1);
        assert_eq!(store.update_status(3, false, Some(false)).await.unwrap(), 0);
        assert_eq!(store.update_status(99, false, Some(false)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_planets() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert_planet(&Planet::new("Kepler-62 f")).await.unwrap();
        store.upsert_planet(&Planet::new("Kepler-62 f")).await.unwrap();
        store.upsert_planet(&Planet::new("Kepler-442 b")).await.unwrap();

        assert_eq!(store.list_planets().await.unwrap().len(), 2);
        assert!(store
            .find_planet_by_kepler_name("Kepler-62 f")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_planet_by_kepler_name("Kepler-186 f")
            .await
            .unwrap()
            .is_none());
    }
}
