//! Client for an EveryAware-style time-series sensor data service.
//!
//! Fetches feeds, sources and data points (picking an aggregation tier from
//! the requested span), computes "last updated" timestamps over cached data
//! trees, and persists JSON blobs such as dashboard state as synthetic packets.

pub mod app_state;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod logging;

pub use crate::app_state::{build_eva_api, EvaApi};
pub use crate::config::EvaConfig;
pub use crate::core::client::reqwest_transport::ReqwestTransport;
pub use crate::core::client::transport::{HttpRequest, HttpResponse, Transport};
pub use crate::core::state::session::{ClientSession, PageCursor};
pub use crate::domain::common::model::{TimeSpan, Timestamp};
pub use crate::domain::data::model::{DataPoint, ResultSet, WriteResult};
pub use crate::domain::data::tier::{select_tier, AggregationTier};
pub use crate::domain::freshness::resolver::{
    last_updated_channel, last_updated_component, last_updated_feed, last_updated_source,
};
pub use crate::domain::freshness::tree::DataTree;
pub use crate::errors::{EvaError, EvaResult};
