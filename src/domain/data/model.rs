use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::formats::Flexible;
use serde_with::{serde_as, TimestampMilliSeconds};

use crate::domain::data::tier::AggregationTier;

/// channel name → component name → value
pub type ChannelMap<V> = BTreeMap<String, BTreeMap<String, V>>;

/// One timestamped reading (or one synthetic packet) as exchanged with the service.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde_as(as = "TimestampMilliSeconds<i64, Flexible>")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub channels: ChannelMap<Value>,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            channels: BTreeMap::new(),
        }
    }

    pub fn with_value(
        mut self,
        channel: impl Into<String>,
        component: impl Into<String>,
        value: Value,
    ) -> Self {
        self.channels
            .entry(channel.into())
            .or_default()
            .insert(component.into(), value);
        self
    }

    pub fn value(&self, channel: &str, component: &str) -> Option<&Value> {
        self.channels.get(channel)?.get(component)
    }
}

/// Statistical summary of one component over one aggregation bucket.
/// Fields the client does not model are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    #[serde_as(as = "TimestampMilliSeconds<i64, Flexible>")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub channels: ChannelMap<ComponentSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResultSet {
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

impl RawResultSet {
    /// `(timestamp, value)` pairs of one component, in response order.
    /// Points that do not carry the component are skipped.
    pub fn series(&self, channel: &str, component: &str) -> Vec<(DateTime<Utc>, &Value)> {
        self.data
            .iter()
            .filter_map(|p| p.value(channel, component).map(|v| (p.timestamp, v)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResultSet {
    #[serde(default)]
    pub data: Vec<AggregatedPoint>,
}

impl AggregatedResultSet {
    pub fn series(&self, channel: &str, component: &str) -> Vec<(DateTime<Utc>, &ComponentSummary)> {
        self.data
            .iter()
            .filter_map(|p| {
                p.channels
                    .get(channel)
                    .and_then(|c| c.get(component))
                    .map(|s| (p.timestamp, s))
            })
            .collect()
    }
}

/// Outcome of a by-timespan fetch. The variant always matches the tier that
/// was requested, so callers know which record shape they hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    Raw(RawResultSet),
    Aggregated {
        tier: AggregationTier,
        result: AggregatedResultSet,
    },
}

impl ResultSet {
    pub fn tier(&self) -> AggregationTier {
        match self {
            ResultSet::Raw(_) => AggregationTier::Raw,
            ResultSet::Aggregated { tier, .. } => *tier,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultSet::Raw(r) => r.data.len(),
            ResultSet::Aggregated { result, .. } => result.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accepted ingest request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    pub status: u16,
    /// Newest timestamp among the written points; `None` for an empty write.
    pub timestamp: Option<DateTime<Utc>>,
}
