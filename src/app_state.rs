use std::sync::Arc;

use serde_json::Value;

use crate::config::EvaConfig;
use crate::core::client::endpoints::Endpoints;
use crate::core::client::reqwest_transport::ReqwestTransport;
use crate::core::client::transport::Transport;
use crate::core::state::session::ClientSession;
use crate::domain::common::model::TimeSpan;
use crate::domain::dashboard::service::DashboardService;
use crate::domain::data::model::{AggregatedResultSet, DataPoint, RawResultSet, ResultSet, WriteResult};
use crate::domain::data::service::DataService;
use crate::domain::data::tier::AggregationTier;
use crate::domain::feed::dto::FeedProbe;
use crate::domain::feed::service::FeedService;
use crate::errors::EvaResult;

macro_rules! delegate_async_service {
    ($service:ident => $(fn $name:ident($($arg:ident : $typ:ty),*) -> $ret:ty;)+) => {
        $(
            pub async fn $name(&self, $($arg: $typ),*) -> EvaResult<$ret> {
                self.$service.$name($($arg),*).await
            }
        )+
    };
}

/// All client services over one shared transport.
pub struct EvaApi<T: Transport> {
    pub data: Arc<DataService<T>>,
    pub feeds: Arc<FeedService<T>>,
    pub dashboards: Arc<DashboardService<T>>,
}

impl<T: Transport> Clone for EvaApi<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            feeds: self.feeds.clone(),
            dashboards: self.dashboards.clone(),
        }
    }
}

pub fn build_eva_api(config: &EvaConfig) -> EvaApi<ReqwestTransport> {
    EvaApi::new(
        Arc::new(ReqwestTransport::default()),
        &config.api_origin,
        &config.dashboard_feed_id,
    )
}

impl<T: Transport> EvaApi<T> {
    pub fn new(transport: Arc<T>, api_origin: &str, dashboard_feed_id: &str) -> Self {
        let endpoints = Arc::new(Endpoints::new(api_origin));
        let data = Arc::new(DataService::new(transport.clone(), endpoints.clone()));
        let feeds = Arc::new(FeedService::new(transport, endpoints));
        let dashboards = Arc::new(DashboardService::new(
            feeds.clone(),
            data.clone(),
            dashboard_feed_id,
        ));

        Self {
            data,
            feeds,
            dashboards,
        }
    }

    delegate_async_service! {
        data =>
        fn fetch_by_timespan(feed_id: &str, source_id: &str, channels: &[String], span: TimeSpan, force_raw: bool) -> ResultSet;
        fn fetch_by_limit(feed_id: &str, source_id: &str, channels: &[String], limit: Option<u32>, offset: Option<u32>) -> RawResultSet;
        fn fetch_aggregated(feed_id: &str, source_id: &str, channels: &[String], span: TimeSpan, tier: AggregationTier) -> AggregatedResultSet;
        fn post_data(feed_ids: &[String], source_id: &str, points: &[DataPoint]) -> WriteResult;
    }

    delegate_async_service! {
        feeds =>
        fn fetch_feed(feed_id: &str) -> Value;
        fn probe_feed(feed_id: &str) -> FeedProbe;
        fn fetch_feeds(session: &mut ClientSession, offset: Option<u32>, limit: Option<u32>) -> Value;
        fn post_feed(feed_id: &str, public_read: bool, public_write: bool) -> ();
        fn fetch_source(feed_id: &str, source_id: &str) -> Value;
        fn fetch_sources(session: &mut ClientSession, feed_id: &str, offset: Option<u32>, limit: Option<u32>) -> Value;
        fn fetch_meta(feed_id: &str) -> Option<DataPoint>;
    }

    delegate_async_service! {
        dashboards =>
        fn ensure_feed_provisioned(feed_id: &str) -> ();
        fn ensure_dashboard_feed() -> ();
        fn encode_and_write(feed_id: &str, source_id: &str, channel: &str, component: &str, value: &Value) -> WriteResult;
        fn fetch_and_decode(feed_id: &str, source_id: &str, channel: &str, component: &str) -> Value;
        fn fetch_external_widgettype_urls(session: &mut ClientSession) -> Vec<String>;
        fn post_external_widgettype_urls(session: &mut ClientSession, urls: Vec<String>) -> WriteResult;
        fn save_dashboard(session: &mut ClientSession, dashboard_id: &str, state: Value) -> WriteResult;
        fn load_dashboard(session: &mut ClientSession, dashboard_id: &str) -> Value;
    }
}
