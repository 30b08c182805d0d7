use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};

use crate::domain::common::model::Timestamp;
use crate::domain::data::model::RawResultSet;
use crate::errors::{malformed, EvaResult};

/// Values of one component keyed by timestamp.
///
/// On the wire the keys are strings; they are parsed into [`Timestamp`] while
/// decoding, so ordering is numeric.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentSeries(#[serde_as(as = "BTreeMap<DisplayFromStr, _>")] pub BTreeMap<Timestamp, Value>);

impl ComponentSeries {
    pub fn newest(&self) -> Option<Timestamp> {
        self.0.keys().next_back().copied()
    }

    pub fn insert(&mut self, ts: Timestamp, value: Value) {
        self.0.insert(ts, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// component name → series
pub type ChannelNode = BTreeMap<String, ComponentSeries>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<BTreeMap<String, ChannelNode>>,
}

impl SourceNode {
    pub fn channel(&self, channel: &str) -> Option<&ChannelNode> {
        self.channels.as_ref()?.get(channel)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<BTreeMap<String, SourceNode>>,
}

impl FeedNode {
    pub fn source(&self, source: &str) -> Option<&SourceNode> {
        self.sources.as_ref()?.get(source)
    }
}

/// Caller-owned cache of fetched data: feeds → sources → channels →
/// components → timestamped values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTree {
    #[serde(default)]
    pub feeds: BTreeMap<String, FeedNode>,
}

impl DataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a cached tree; non-numeric timestamp keys are rejected.
    pub fn from_value(value: Value) -> EvaResult<Self> {
        serde_json::from_value(value).map_err(malformed)
    }

    pub fn feed(&self, feed: &str) -> Option<&FeedNode> {
        self.feeds.get(feed)
    }

    pub fn source(&self, feed: &str, source: &str) -> Option<&SourceNode> {
        self.feed(feed)?.source(source)
    }

    pub fn channel(&self, feed: &str, source: &str, channel: &str) -> Option<&ChannelNode> {
        self.source(feed, source)?.channel(channel)
    }

    pub fn component(
        &self,
        feed: &str,
        source: &str,
        channel: &str,
        component: &str,
    ) -> Option<&ComponentSeries> {
        self.channel(feed, source, channel)?.get(component)
    }

    /// Folds fetched raw points of one source into the tree, creating missing
    /// levels. A later point with the same timestamp replaces the earlier value.
    pub fn merge_raw(&mut self, feed: &str, source: &str, result: &RawResultSet) {
        let channels = self
            .feeds
            .entry(feed.to_string())
            .or_default()
            .sources
            .get_or_insert_with(BTreeMap::new)
            .entry(source.to_string())
            .or_default()
            .channels
            .get_or_insert_with(BTreeMap::new);

        for point in &result.data {
            let ts = Timestamp::from(point.timestamp);
            for (channel, components) in &point.channels {
                let node = channels.entry(channel.clone()).or_default();
                for (component, value) in components {
                    node.entry(component.clone())
                        .or_default()
                        .insert(ts, value.clone());
                }
            }
        }
    }
}
