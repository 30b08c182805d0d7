use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::client::transport::Transport;
use crate::core::state::session::ClientSession;
use crate::domain::dashboard::codec::{
    decode_blob, encode_blob, DASHBOARD_STATE_CHANNEL, DASHBOARD_STATE_COMPONENT,
    EXTERNAL_WIDGETTYPES_URLS_CHANNEL, EXTERNAL_WIDGETTYPES_URLS_COMPONENT,
    EXTERNAL_WIDGETTYPES_URLS_SOURCEID,
};
use crate::domain::data::model::WriteResult;
use crate::domain::data::service::DataService;
use crate::domain::feed::dto::FeedProbe;
use crate::domain::feed::service::{FeedService, META_SOURCE_NAME};
use crate::errors::{malformed, EvaError, EvaResult};

/// Persists JSON blobs (dashboard state, external widget-type URLs) as
/// synthetic packets on the data service.
pub struct DashboardService<T: Transport> {
    feeds: Arc<FeedService<T>>,
    data: Arc<DataService<T>>,
    dashboard_feed_id: String,
}

impl<T: Transport> DashboardService<T> {
    pub fn new(
        feeds: Arc<FeedService<T>>,
        data: Arc<DataService<T>>,
        dashboard_feed_id: impl Into<String>,
    ) -> Self {
        Self {
            feeds,
            data,
            dashboard_feed_id: dashboard_feed_id.into(),
        }
    }

    pub fn dashboard_feed_id(&self) -> &str {
        &self.dashboard_feed_id
    }

    /// Makes sure `feed_id` exists, creating it (private) together with an
    /// empty external widget-type URL list when the service reports it absent.
    ///
    /// Probe failures other than "absent" are returned untouched and never
    /// lead to a create. Concurrent callers may both create; the service
    /// decides which write wins.
    pub async fn ensure_feed_provisioned(&self, feed_id: &str) -> EvaResult<()> {
        match self.feeds.probe_feed(feed_id).await? {
            FeedProbe::Exists(_) => {
                debug!("Feed {} already provisioned", feed_id);
                Ok(())
            }
            FeedProbe::Absent => {
                info!("Provisioning feed {}", feed_id);
                self.feeds.post_feed(feed_id, false, false).await?;
                self.write_external_widgettype_urls(feed_id, &[]).await?;
                Ok(())
            }
        }
    }

    /// Provisions the configured dashboard feed.
    pub async fn ensure_dashboard_feed(&self) -> EvaResult<()> {
        self.ensure_feed_provisioned(&self.dashboard_feed_id).await
    }

    /// Stores `value` under `channels[channel][component]` of `feed_id/source_id`,
    /// stamped with the current time.
    pub async fn encode_and_write(
        &self,
        feed_id: &str,
        source_id: &str,
        channel: &str,
        component: &str,
        value: &Value,
    ) -> EvaResult<WriteResult> {
        let point = encode_blob(channel, component, value, Utc::now())?;
        self.data
            .post_data(&[feed_id.to_string()], source_id, &[point])
            .await
    }

    /// Reads back the newest value stored by [`Self::encode_and_write`].
    pub async fn fetch_and_decode(
        &self,
        feed_id: &str,
        source_id: &str,
        channel: &str,
        component: &str,
    ) -> EvaResult<Value> {
        let source = self.feeds.fetch_source(feed_id, source_id).await?;
        decode_blob(&source, channel, component)
    }

    /// Loads the external widget-type URLs of the dashboard feed into `session`.
    ///
    /// A feed whose URL list was never written (provisioning interrupted after
    /// the feed was created) reads as the empty list it would have held.
    pub async fn fetch_external_widgettype_urls(
        &self,
        session: &mut ClientSession,
    ) -> EvaResult<Vec<String>> {
        let stored = self
            .fetch_and_decode(
                &self.dashboard_feed_id,
                EXTERNAL_WIDGETTYPES_URLS_SOURCEID,
                EXTERNAL_WIDGETTYPES_URLS_CHANNEL,
                EXTERNAL_WIDGETTYPES_URLS_COMPONENT,
            )
            .await;
        let value = match stored {
            Ok(value) => value,
            Err(EvaError::MissingValue { .. }) => {
                warn!(
                    "Feed {} has no external widget-type urls stored; using an empty list",
                    self.dashboard_feed_id
                );
                Value::Array(Vec::new())
            }
            Err(e) => return Err(e),
        };
        let urls: Vec<String> = serde_json::from_value(value).map_err(malformed)?;

        session.set_external_widgettype_urls(urls.clone());
        Ok(urls)
    }

    /// Replaces the stored external widget-type URLs and the session copy.
    pub async fn post_external_widgettype_urls(
        &self,
        session: &mut ClientSession,
        urls: Vec<String>,
    ) -> EvaResult<WriteResult> {
        let result = self
            .write_external_widgettype_urls(&self.dashboard_feed_id, &urls)
            .await?;
        session.set_external_widgettype_urls(urls);
        Ok(result)
    }

    /// Persists the state of one dashboard and caches it in `session`.
    pub async fn save_dashboard(
        &self,
        session: &mut ClientSession,
        dashboard_id: &str,
        state: Value,
    ) -> EvaResult<WriteResult> {
        check_dashboard_id(dashboard_id)?;

        let result = self
            .encode_and_write(
                &self.dashboard_feed_id,
                dashboard_id,
                DASHBOARD_STATE_CHANNEL,
                DASHBOARD_STATE_COMPONENT,
                &state,
            )
            .await?;
        session.cache_dashboard(dashboard_id, state);
        Ok(result)
    }

    /// Loads the state of one dashboard from the service and caches it in `session`.
    pub async fn load_dashboard(
        &self,
        session: &mut ClientSession,
        dashboard_id: &str,
    ) -> EvaResult<Value> {
        check_dashboard_id(dashboard_id)?;

        let state = self
            .fetch_and_decode(
                &self.dashboard_feed_id,
                dashboard_id,
                DASHBOARD_STATE_CHANNEL,
                DASHBOARD_STATE_COMPONENT,
            )
            .await?;
        session.cache_dashboard(dashboard_id, state.clone());
        Ok(state)
    }

    async fn write_external_widgettype_urls(
        &self,
        feed_id: &str,
        urls: &[String],
    ) -> EvaResult<WriteResult> {
        let value = serde_json::to_value(urls)
            .map_err(|e| EvaError::InvalidArgument(format!("unserializable urls: {}", e)))?;
        self.encode_and_write(
            feed_id,
            EXTERNAL_WIDGETTYPES_URLS_SOURCEID,
            EXTERNAL_WIDGETTYPES_URLS_CHANNEL,
            EXTERNAL_WIDGETTYPES_URLS_COMPONENT,
            &value,
        )
        .await
    }
}

fn check_dashboard_id(dashboard_id: &str) -> EvaResult<()> {
    if dashboard_id.trim().is_empty() {
        return Err(EvaError::InvalidArgument("dashboard id cannot be empty".into()));
    }
    if dashboard_id == EXTERNAL_WIDGETTYPES_URLS_SOURCEID || dashboard_id == META_SOURCE_NAME {
        return Err(EvaError::InvalidArgument(format!(
            "{} is a reserved source id",
            dashboard_id
        )));
    }
    Ok(())
}
