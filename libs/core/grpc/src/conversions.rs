//! Wire timestamp conversions.
//!
//! Timestamps travel as Unix seconds (`int64`); sub-second precision is dropped.

use chrono::{DateTime, Utc};

/// Convert DateTime<Utc> to Unix seconds
pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> i64 {
  dt.timestamp()
}
