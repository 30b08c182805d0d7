use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::client::endpoints::Endpoints;
use crate::core::client::transport::{fetch_json, send_checked, HttpRequest, Transport};
use crate::core::state::session::{ClientSession, PageCursor};
use crate::domain::common::service::warn_if_invalid;
use crate::domain::data::model::{DataPoint, RawResultSet};
use crate::domain::feed::dto::{FeedCreateRequest, FeedProbe, FeedRef, SourceRef};
use crate::errors::{EvaError, EvaResult};

/// Source holding descriptive metadata of a feed.
pub const META_SOURCE_NAME: &str = "meta";
/// Channel holding descriptive metadata inside a source.
pub const META_CHANNEL_NAME: &str = "meta";

/// Feed and source catalogue.
pub struct FeedService<T: Transport> {
    transport: Arc<T>,
    endpoints: Arc<Endpoints>,
}

impl<T: Transport> FeedService<T> {
    pub fn new(transport: Arc<T>, endpoints: Arc<Endpoints>) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Feed metadata and permissions.
    ///
    /// A feed the service reports as gone (404/410) is `NotProvisioned`; any
    /// other failure is a `TransportFailure`, so an unreachable service is
    /// never mistaken for a missing feed.
    pub async fn fetch_feed(&self, feed_id: &str) -> EvaResult<Value> {
        warn_if_invalid("fetch feed", &FeedRef { feed_id: feed_id.to_string() });
        let url = self.endpoints.feed(feed_id);
        debug!("Fetching feed {}", feed_id);

        let resp = self.transport.send(HttpRequest::get(url.clone())).await?;
        match resp.status {
            s if s.is_success() => resp.json(),
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                Err(EvaError::NotProvisioned(feed_id.to_string()))
            }
            s => Err(EvaError::status(&url, s, &resp.body)),
        }
    }

    /// Checks whether `feed_id` exists; see [`Self::fetch_feed`] for which
    /// answers count as absent.
    pub async fn probe_feed(&self, feed_id: &str) -> EvaResult<FeedProbe> {
        match self.fetch_feed(feed_id).await {
            Ok(feed) => Ok(FeedProbe::Exists(feed)),
            Err(EvaError::NotProvisioned(_)) => {
                info!("Feed {} does not exist", feed_id);
                Ok(FeedProbe::Absent)
            }
            Err(e) => Err(e),
        }
    }

    /// Lists publicly readable feeds and records the paging used in `session`.
    pub async fn fetch_feeds(
        &self,
        session: &mut ClientSession,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> EvaResult<Value> {
        let page = PageCursor::resolve(offset, limit);
        session.feeds_page = page;

        fetch_json(
            &*self.transport,
            HttpRequest::get(self.endpoints.feeds(page.offset, page.limit)),
        )
        .await
    }

    /// Creates a feed.
    pub async fn post_feed(
        &self,
        feed_id: &str,
        public_read: bool,
        public_write: bool,
    ) -> EvaResult<()> {
        let request = FeedCreateRequest::new(feed_id, public_read, public_write);
        if let Some(err) = warn_if_invalid("post feed", &request) {
            return Err(err);
        }

        let body = serde_json::to_string(&request)
            .map_err(|e| EvaError::InvalidArgument(format!("unserializable feed: {}", e)))?;
        send_checked(
            &*self.transport,
            HttpRequest::post_json(self.endpoints.feeds_collection(), body),
        )
        .await?;

        info!(
            "Created feed {} (public read={}, write={})",
            feed_id, public_read, public_write
        );
        Ok(())
    }

    /// Source description, including its `recentData` view.
    pub async fn fetch_source(&self, feed_id: &str, source_id: &str) -> EvaResult<Value> {
        warn_if_invalid(
            "fetch source",
            &SourceRef {
                feed_id: feed_id.to_string(),
                source_id: source_id.to_string(),
            },
        );
        fetch_json(
            &*self.transport,
            HttpRequest::get(self.endpoints.source(feed_id, source_id)),
        )
        .await
    }

    /// Lists the sources of a feed and records the paging used in `session`.
    pub async fn fetch_sources(
        &self,
        session: &mut ClientSession,
        feed_id: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> EvaResult<Value> {
        warn_if_invalid("fetch sources", &FeedRef { feed_id: feed_id.to_string() });

        let page = PageCursor::resolve(offset, limit);
        session.sources_page = page;

        fetch_json(
            &*self.transport,
            HttpRequest::get(self.endpoints.sources(feed_id, page.offset, page.limit)),
        )
        .await
    }

    /// Newest packet of the feed's `meta` source, if any was ever written.
    pub async fn fetch_meta(&self, feed_id: &str) -> EvaResult<Option<DataPoint>> {
        warn_if_invalid("fetch meta", &FeedRef { feed_id: feed_id.to_string() });

        let url = self.endpoints.points_by_limit(
            feed_id,
            META_SOURCE_NAME,
            &[META_CHANNEL_NAME.to_string()],
            1,
            0,
        );
        let result: RawResultSet = fetch_json(&*self.transport, HttpRequest::get(url)).await?;
        Ok(result.data.into_iter().next())
    }
}
