//! Launch and planet records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flight number used as the base when no launch has been stored yet.
pub const DEFAULT_FLIGHT_NUMBER: u32 = 100;

/// Sponsors attached to every locally scheduled launch.
pub const DEFAULT_CUSTOMERS: [&str; 2] = ["Zero to Mastery", "NASA"];

/// A stored launch, keyed by its flight number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    /// Business identifier and natural sort key
    pub flight_number: u32,

    /// Human-readable mission name
    pub mission: String,

    /// Rocket name
    pub rocket: String,

    /// Planned or actual launch time
    pub launch_date: DateTime<Utc>,

    /// Target planet's Kepler name; absent on records synced from the feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// True until the launch has happened or was aborted
    pub upcoming: bool,

    /// Launch outcome, `None` while unknown
    pub success: Option<bool>,

    /// Payload customers, in feed order
    #[serde(default)]
    pub customers: Vec<String>,
}

impl Launch {
    /// Whether the launch has been aborted (`upcoming = false`, `success = false`).
    pub fn is_aborted(&self) -> bool {
        !self.upcoming && self.success == Some(false)
    }
}

/// Caller-supplied fields for a launch to be scheduled.
///
/// Flight number, status flags and customers are always assigned by the
/// repository, whatever the caller sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLaunch {
    pub mission: String,
    pub rocket: String,
    pub launch_date: DateTime<Utc>,
    pub destination: String,
}

impl NewLaunch {
    /// Finalize into a stored launch with the scheduling defaults applied.
    pub fn into_scheduled(self, flight_number: u32) -> Launch {
        Launch {
            flight_number,
            mission: self.mission,
            rocket: self.rocket,
            launch_date: self.launch_date,
            destination: Some(self.destination),
            upcoming: true,
            success: Some(true),
            customers: DEFAULT_CUSTOMERS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A planet launches may target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub kepler_name: String,
}

impl Planet {
    pub fn new(kepler_name: impl Into<String>) -> Self {
        Self {
            kepler_name: kepler_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_launch() -> NewLaunch {
        NewLaunch {
            mission: "Kepler Exploration X".to_string(),
            rocket: "Explorer IS1".to_string(),
            launch_date: Utc.with_ymd_and_hms(2030, 12, 27, 0, 0, 0).unwrap(),
            destination: "Kepler-442 b".to_string(),
        }
    }

    #[test]
    fn test_into_scheduled_applies_defaults() {
        let launch = new_launch().into_scheduled(101);

        assert_eq!(launch.flight_number, 101);
        assert!(launch.upcoming);
        assert_eq!(launch.success, Some(true));
        assert_eq!(launch.customers, vec!["Zero to Mastery", "NASA"]);
        assert_eq!(launch.destination.as_deref(), Some("Kepler-442 b"));
        assert!(!launch.is_aborted());
    }

    #[test]
    fn test_launch_json_shape() {
        let launch = new_launch().into_scheduled(101);
        let json = serde_json::to_value(&launch).unwrap();

        assert_eq!(json["flightNumber"], 101);
        assert_eq!(json["launchDate"], "2030-12-27T00:00:00Z");
        assert_eq!(json["destination"], "Kepler-442 b");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_synced_launch_omits_destination() {
        let launch = Launch {
            flight_number: 1,
            mission: "FalconSat".to_string(),
            rocket: "Falcon 1".to_string(),
            launch_date: Utc.with_ymd_and_hms(2006, 3, 24, 22, 30, 0).unwrap(),
            destination: None,
            upcoming: false,
            success: None,
            customers: vec![],
        };
        let json = serde_json::to_value(&launch).unwrap();

        assert!(json.get("destination").is_none());
        assert!(json["success"].is_null());
    }
}
