use serde::{Deserialize, Serialize};

use crate::domain::common::model::TimeSpan;

/// Spans longer than this (seconds) are served one aggregated value per day.
pub const AGGREGATION_BOUNDARY_DAY: i64 = 7 * 24 * 60 * 60;
/// Spans longer than this (seconds) are served one aggregated value per hour.
pub const AGGREGATION_BOUNDARY_HOUR: i64 = 2 * 60 * 60;
/// Spans longer than this (seconds) are served one aggregated value per minute.
pub const AGGREGATION_BOUNDARY_MINUTE: i64 = 2 * 60;

/// Data resolution, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationTier {
    Raw,
    Minute,
    Hour,
    Day,
}

impl AggregationTier {
    /// `level` query parameter of the aggregated endpoint. Raw has none.
    pub fn level(self) -> Option<u8> {
        match self {
            AggregationTier::Raw => None,
            AggregationTier::Minute => Some(0),
            AggregationTier::Hour => Some(1),
            AggregationTier::Day => Some(2),
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(AggregationTier::Minute),
            1 => Some(AggregationTier::Hour),
            2 => Some(AggregationTier::Day),
            _ => None,
        }
    }

    pub fn is_raw(self) -> bool {
        self == AggregationTier::Raw
    }
}

/// Picks the resolution to request for `span`.
///
/// Boundaries are strict: a span of exactly two minutes stays raw.
pub fn select_tier(span: &TimeSpan, force_raw: bool) -> AggregationTier {
    if force_raw {
        return AggregationTier::Raw;
    }

    let seconds = span.duration_seconds();
    if seconds > AGGREGATION_BOUNDARY_DAY {
        AggregationTier::Day
    } else if seconds > AGGREGATION_BOUNDARY_HOUR {
        AggregationTier::Hour
    } else if seconds > AGGREGATION_BOUNDARY_MINUTE {
        AggregationTier::Minute
    } else {
        AggregationTier::Raw
    }
}
