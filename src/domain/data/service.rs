use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::client::endpoints::Endpoints;
use crate::core::client::transport::{fetch_json, send_checked, HttpRequest, Transport};
use crate::domain::common::model::TimeSpan;
use crate::domain::common::service::warn_if_invalid;
use crate::domain::data::dto::{LimitQuery, PacketTarget, PointSelector, TimespanQuery};
use crate::domain::data::model::{AggregatedResultSet, DataPoint, RawResultSet, ResultSet, WriteResult};
use crate::domain::data::tier::{select_tier, AggregationTier};
use crate::errors::{EvaError, EvaResult};

/// Retrieval and ingest of data points.
pub struct DataService<T: Transport> {
    transport: Arc<T>,
    endpoints: Arc<Endpoints>,
}

impl<T: Transport> DataService<T> {
    pub fn new(transport: Arc<T>, endpoints: Arc<Endpoints>) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Fetches a window of data, aggregated according to its length unless
    /// `force_raw` is set. The variant of the result tells which record shape
    /// the service returned.
    pub async fn fetch_by_timespan(
        &self,
        feed_id: &str,
        source_id: &str,
        channels: &[String],
        span: TimeSpan,
        force_raw: bool,
    ) -> EvaResult<ResultSet> {
        let query = TimespanQuery {
            selector: PointSelector::new(feed_id, source_id, channels),
            span,
        };
        warn_if_invalid("fetch data by timespan", &query);

        let tier = select_tier(&span, force_raw);
        debug!(
            "Timespan of {}s on {}/{} resolved to {:?}",
            span.duration_seconds(),
            feed_id,
            source_id,
            tier
        );

        match tier.level() {
            Some(level) => {
                let result = self.request_aggregated(&query.selector, &span, level).await?;
                Ok(ResultSet::Aggregated { tier, result })
            }
            None => {
                let url = self.endpoints.points_by_timespan(
                    feed_id,
                    source_id,
                    channels,
                    span.start.timestamp_millis(),
                    span.end.timestamp_millis(),
                );
                let result: RawResultSet = fetch_json(&*self.transport, HttpRequest::get(url)).await?;
                Ok(ResultSet::Raw(result))
            }
        }
    }

    /// Fetches the newest raw points page by page; `limit`/`offset` default to 20/0.
    pub async fn fetch_by_limit(
        &self,
        feed_id: &str,
        source_id: &str,
        channels: &[String],
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> EvaResult<RawResultSet> {
        let query = LimitQuery {
            selector: PointSelector::new(feed_id, source_id, channels),
            limit,
            offset,
        };
        warn_if_invalid("fetch data by limit", &query);

        let url = self.endpoints.points_by_limit(
            feed_id,
            source_id,
            channels,
            query.limit(),
            query.offset(),
        );
        fetch_json(&*self.transport, HttpRequest::get(url)).await
    }

    /// Fetches aggregated summaries at an explicit tier.
    pub async fn fetch_aggregated(
        &self,
        feed_id: &str,
        source_id: &str,
        channels: &[String],
        span: TimeSpan,
        tier: AggregationTier,
    ) -> EvaResult<AggregatedResultSet> {
        let level = tier.level().ok_or_else(|| {
            EvaError::InvalidArgument("raw tier has no aggregation level".to_string())
        })?;

        let query = TimespanQuery {
            selector: PointSelector::new(feed_id, source_id, channels),
            span,
        };
        warn_if_invalid("fetch aggregated data", &query);

        self.request_aggregated(&query.selector, &span, level).await
    }

    /// Writes packets for `source_id` into every feed of `feed_ids`.
    ///
    /// Unlike reads, a write with missing identifiers is refused: there is no
    /// sensible default target.
    pub async fn post_data(
        &self,
        feed_ids: &[String],
        source_id: &str,
        points: &[DataPoint],
    ) -> EvaResult<WriteResult> {
        let target = PacketTarget {
            feed_ids: feed_ids.to_vec(),
            source_id: source_id.to_string(),
        };
        if let Some(err) = warn_if_invalid("post data", &target) {
            return Err(err);
        }

        if points.is_empty() {
            warn!("Posting an empty packet list to {}/{}", target.feed_ids.join(","), source_id);
        }
        let body = serde_json::to_string(points)
            .map_err(|e| EvaError::InvalidArgument(format!("unserializable packets: {}", e)))?;

        let request = HttpRequest::post_json(self.endpoints.packets(), body)
            .with_header("meta.feeds", feed_ids.join(","))
            .with_header("meta.sourceId", source_id)
            .with_header("data.contentDetails.type", "generic");

        let resp = send_checked(&*self.transport, request).await?;

        Ok(WriteResult {
            status: resp.status.as_u16(),
            timestamp: points.iter().map(|p| p.timestamp).max(),
        })
    }

    async fn request_aggregated(
        &self,
        selector: &PointSelector,
        span: &TimeSpan,
        level: u8,
    ) -> EvaResult<AggregatedResultSet> {
        let url = self.endpoints.points_aggregated(
            &selector.feed_id,
            &selector.source_id,
            &selector.channels,
            span.start.timestamp_millis(),
            span.end.timestamp_millis(),
            level,
        );
        fetch_json(&*self.transport, HttpRequest::get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::mock_transport::MockTransport;
    use chrono::{DateTime, Duration, Utc};
    use http::Method;
    use serde_json::json;

    fn service() -> (Arc<MockTransport>, DataService<MockTransport>) {
        let transport = Arc::new(MockTransport::default());
        let endpoints = Arc::new(Endpoints::new("http://eva.test"));
        (transport.clone(), DataService::new(transport, endpoints))
    }

    fn channels() -> Vec<String> {
        vec!["air".to_string(), "gps".to_string()]
    }

    fn span_of(length: Duration) -> TimeSpan {
        let end = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        TimeSpan::ending_at(end, length)
    }

    #[tokio::test]
    async fn short_span_hits_raw_endpoint_with_bounds() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": [{"timestamp": 1_699_999_990_000i64, "channels": {"air": {"pm10": 3}}}]}));

        let span = span_of(Duration::seconds(120));
        let result = svc
            .fetch_by_timespan("f1", "s1", &channels(), span, false)
            .await
            .unwrap();

        assert_eq!(result.tier(), AggregationTier::Raw);
        assert_eq!(result.len(), 1);

        let url = &transport.requests()[0].url;
        assert!(url.starts_with("http://eva.test/api/v1/data/minimalpoint?"));
        assert!(url.contains("channels=air%2Cgps"));
        assert!(url.contains("firstTS=1699999880000"));
        assert!(url.contains("lastTS=1700000000000"));
        assert!(!url.contains("level="));
    }

    #[tokio::test]
    async fn long_span_hits_aggregated_endpoint_with_level() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": [{"timestamp": 0, "channels": {"air": {"pm10": {"avg": 2.0}}}}]}));

        let result = svc
            .fetch_by_timespan("f1", "s1", &channels(), span_of(Duration::days(8)), false)
            .await
            .unwrap();

        match result {
            ResultSet::Aggregated { tier, result } => {
                assert_eq!(tier, AggregationTier::Day);
                assert_eq!(result.series("air", "pm10")[0].1.avg, Some(2.0));
            }
            other => panic!("expected aggregated result, got {:?}", other),
        }
        let url = &transport.requests()[0].url;
        assert!(url.contains("/data/minimalstats?"));
        assert!(url.ends_with("&level=2"));
    }

    #[tokio::test]
    async fn hour_and_minute_tiers_map_to_levels() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": []}));
        transport.push_json(200, json!({"data": []}));

        svc.fetch_by_timespan("f", "s", &channels(), span_of(Duration::hours(3)), false)
            .await
            .unwrap();
        svc.fetch_by_timespan("f", "s", &channels(), span_of(Duration::minutes(5)), false)
            .await
            .unwrap();

        let requests = transport.requests();
        assert!(requests[0].url.ends_with("&level=1"));
        assert!(requests[1].url.ends_with("&level=0"));
    }

    #[tokio::test]
    async fn force_raw_skips_aggregation_for_a_month() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": []}));

        let result = svc
            .fetch_by_timespan("f", "s", &channels(), span_of(Duration::days(30)), true)
            .await
            .unwrap();

        assert!(matches!(result, ResultSet::Raw(_)));
        assert!(transport.requests()[0].url.contains("/data/minimalpoint?"));
    }

    #[tokio::test]
    async fn invalid_arguments_still_issue_the_request() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": []}));

        let result = svc
            .fetch_by_timespan("", "s", &[], span_of(Duration::seconds(10)), false)
            .await;

        assert!(result.is_ok());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn by_limit_substitutes_defaults() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": []}));

        svc.fetch_by_limit("f", "s", &channels(), None, None).await.unwrap();

        assert!(transport.requests()[0].url.ends_with("&limit=20&offset=0"));
    }

    #[tokio::test]
    async fn by_limit_passes_explicit_paging() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": []}));

        svc.fetch_by_limit("f", "s", &channels(), Some(5), Some(10))
            .await
            .unwrap();

        assert!(transport.requests()[0].url.ends_with("&limit=5&offset=10"));
    }

    #[tokio::test]
    async fn transport_failure_is_not_retried() {
        let (transport, svc) = service();
        transport.push_failure("connection refused");

        let err = svc
            .fetch_by_limit("f", "s", &channels(), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, EvaError::TransportFailure { .. }));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_surfaced() {
        let (transport, svc) = service();
        transport.push_json(200, json!({"data": "nope"}));

        let err = svc
            .fetch_by_timespan("f", "s", &channels(), span_of(Duration::seconds(30)), false)
            .await
            .unwrap_err();

        assert!(matches!(err, EvaError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn explicit_raw_tier_is_refused_for_aggregated_fetch() {
        let (transport, svc) = service();

        let err = svc
            .fetch_aggregated("f", "s", &channels(), span_of(Duration::days(1)), AggregationTier::Raw)
            .await
            .unwrap_err();

        assert!(matches!(err, EvaError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn post_data_tags_request_with_metadata_headers() {
        let (transport, svc) = service();
        transport.push_text(201, "");

        let ts = DateTime::from_timestamp_millis(1_000).unwrap();
        let points = vec![DataPoint::new(ts).with_value("air", "pm10", json!(7))];
        let result = svc
            .post_data(&["f1".to_string()], "s1", &points)
            .await
            .unwrap();

        assert_eq!(
            result,
            WriteResult {
                status: 201,
                timestamp: Some(ts)
            }
        );

        let req = &transport.requests()[0];
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "http://eva.test/api/v1/packets");
        assert_eq!(req.header("meta.feeds"), Some("f1"));
        assert_eq!(req.header("meta.sourceId"), Some("s1"));
        assert_eq!(req.header("data.contentDetails.type"), Some("generic"));

        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!([{"timestamp": 1000, "channels": {"air": {"pm10": 7}}}]));
    }

    #[tokio::test]
    async fn post_data_without_source_writes_nothing() {
        let (transport, svc) = service();

        let err = svc.post_data(&["f1".to_string()], "", &[]).await.unwrap_err();

        assert!(matches!(err, EvaError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn rejected_write_is_a_transport_failure() {
        let (transport, svc) = service();
        transport.push_text(403, "forbidden");

        let err = svc
            .post_data(&["f1".to_string()], "s1", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, EvaError::TransportFailure { .. }));
    }

    #[tokio::test]
    async fn write_result_reports_newest_point_timestamp() {
        let (transport, svc) = service();
        transport.push_text(201, "");
        transport.push_text(201, "");

        let older = DateTime::from_timestamp_millis(5_000).unwrap();
        let newer = DateTime::from_timestamp_millis(9_000).unwrap();
        let points = vec![DataPoint::new(newer), DataPoint::new(older)];
        let feeds = ["f1".to_string()];

        let written = svc.post_data(&feeds, "s1", &points).await.unwrap();
        let empty = svc.post_data(&feeds, "s1", &[]).await.unwrap();

        assert_eq!(written.timestamp, Some(newer));
        assert_eq!(empty.timestamp, None);
    }
}
