//! Display formatting for deployments.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::CreatedAt;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Normalized deployment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    #[display("ready")]
    Ready,
    #[display("building")]
    Building,
    #[display("error")]
    Error,
    #[display("queued")]
    Queued,
    #[display("canceled")]
    Canceled,
}

impl StatusClass {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, StatusClass::Building)
    }
}

/// Map a raw platform status to its class. Unknown values render as queued.
pub fn status_class(status: &str) -> StatusClass {
    match status {
        "READY" => StatusClass::Ready,
        "BUILDING" => StatusClass::Building,
        "ERROR" => StatusClass::Error,
        "QUEUED" => StatusClass::Queued,
        "CANCELED" => StatusClass::Canceled,
        _ => StatusClass::Queued,
    }
}

/// Human-readable age of `created_at` relative to `now`.
///
/// Future timestamps and anything under a minute read "just now". An
/// unparseable timestamp is treated the same way.
pub fn relative_age(created_at: &CreatedAt, now: DateTime<Utc>) -> String {
    let Some(instant) = created_at.to_datetime() else {
        warn!(?created_at, "unparseable deployment timestamp");
        return "just now".to_string();
    };

    let elapsed = (now - instant).num_milliseconds().div_euclid(1000);

    if elapsed < MINUTE {
        "just now".to_string()
    } else if elapsed < HOUR {
        ago(elapsed / MINUTE, "minute")
    } else if elapsed < DAY {
        ago(elapsed / HOUR, "hour")
    } else {
        ago(elapsed / DAY, "day")
    }
}

fn ago(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
