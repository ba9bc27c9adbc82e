//! Aggregate statistics for an analyzed incident batch

use chrono::Duration;
use serde::{Serialize, Serializer};

/// How incidents without a work-hours classification are counted.
///
/// Records that were never classified (no trigger timestamp) count as
/// in work hours. Changing this changes `in_work_hours_count` for every
/// batch that contains incomplete records.
pub const UNCLASSIFIED_COUNTS_AS_IN_WORK_HOURS: bool = true;

/// Response-time statistics over one incident batch.
///
/// Created fresh per `summarize` call; not mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticalSummary {
    /// Total incidents considered, including un-annotated ones
    pub count: usize,

    /// Mean time to acknowledge. `None` when no incident has a TTA.
    #[serde(serialize_with = "serialize_opt_duration_secs")]
    pub mtta: Option<Duration>,

    /// Mean time to resolve. `None` when no incident has a TTR.
    #[serde(serialize_with = "serialize_opt_duration_secs")]
    pub mttr: Option<Duration>,

    /// Incidents classified (or defaulted) as in work hours
    pub in_work_hours_count: usize,
}

impl StatisticalSummary {
    /// Fraction of incidents in work hours, in `[0.0, 1.0]`
    pub fn in_work_hours_ratio(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.in_work_hours_count as f64 / self.count as f64
    }
}

fn serialize_opt_duration_secs<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(duration) => serializer.serialize_some(&duration.num_seconds()),
        None => serializer.serialize_none(),
    }
}
