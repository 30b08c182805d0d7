//! "Last updated" timestamps at component, channel, source and feed level.
//!
//! Every level is the numeric maximum of the level below. Missing feeds,
//! sources, channels or components yield `None`; the tree is only read.

use crate::domain::common::model::Timestamp;
use crate::domain::freshness::tree::{ChannelNode, DataTree, FeedNode, SourceNode};

fn newest<I>(stamps: I) -> Option<Timestamp>
where
    I: IntoIterator<Item = Option<Timestamp>>,
{
    stamps.into_iter().flatten().max()
}

fn channel_newest(channel: &ChannelNode) -> Option<Timestamp> {
    newest(channel.values().map(|series| series.newest()))
}

fn source_newest(source: &SourceNode) -> Option<Timestamp> {
    let channels = source.channels.as_ref()?;
    newest(channels.values().map(channel_newest))
}

fn feed_newest(feed: &FeedNode) -> Option<Timestamp> {
    let sources = feed.sources.as_ref()?;
    newest(sources.values().map(source_newest))
}

pub fn last_updated_component(
    tree: &DataTree,
    feed: &str,
    source: &str,
    channel: &str,
    component: &str,
) -> Option<Timestamp> {
    tree.component(feed, source, channel, component)?.newest()
}

pub fn last_updated_channel(
    tree: &DataTree,
    feed: &str,
    source: &str,
    channel: &str,
) -> Option<Timestamp> {
    channel_newest(tree.channel(feed, source, channel)?)
}

pub fn last_updated_source(tree: &DataTree, feed: &str, source: &str) -> Option<Timestamp> {
    source_newest(tree.source(feed, source)?)
}

pub fn last_updated_feed(tree: &DataTree, feed: &str) -> Option<Timestamp> {
    feed_newest(tree.feed(feed)?)
}
