use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::domain::common::model::{TimeSpan, DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Which series of which source a data request targets.
#[derive(Debug, Clone, Validate)]
pub struct PointSelector {
    #[validate(length(min = 1, message = "feedId cannot be empty"))]
    pub feed_id: String,
    #[validate(length(min = 1, message = "sourceId cannot be empty"))]
    pub source_id: String,
    #[validate(
        length(min = 1, message = "at least one channel is required"),
        custom(function = "validate_names")
    )]
    pub channels: Vec<String>,
}

impl PointSelector {
    pub fn new(feed_id: &str, source_id: &str, channels: &[String]) -> Self {
        Self {
            feed_id: feed_id.to_string(),
            source_id: source_id.to_string(),
            channels: channels.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_span_order"))]
pub struct TimespanQuery {
    #[validate(nested)]
    pub selector: PointSelector,
    pub span: TimeSpan,
}

#[derive(Debug, Clone, Validate)]
pub struct LimitQuery {
    #[validate(nested)]
    pub selector: PointSelector,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl LimitQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(DEFAULT_OFFSET)
    }
}

/// Target of an ingest write.
#[derive(Debug, Clone, Validate)]
pub struct PacketTarget {
    #[validate(
        length(min = 1, message = "at least one feed is required"),
        custom(function = "validate_names")
    )]
    pub feed_ids: Vec<String>,
    #[validate(length(min = 1, message = "sourceId cannot be empty"))]
    pub source_id: String,
}

fn validate_names(names: &Vec<String>) -> Result<(), ValidationError> {
    if names.iter().any(|n| n.trim().is_empty()) {
        let mut err = ValidationError::new("empty_name");
        err.message = Some(Cow::from("names cannot be empty"));
        return Err(err);
    }
    Ok(())
}

fn validate_span_order(query: &TimespanQuery) -> Result<(), ValidationError> {
    if !query.span.is_ordered() {
        let mut err = ValidationError::new("span_order");
        err.message = Some(Cow::from("firstTS must not be after lastTS"));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn selector(channels: &[&str]) -> PointSelector {
        let channels: Vec<String> = channels.iter().map(|c| c.to_string()).collect();
        PointSelector::new("feed", "src", &channels)
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let sel = PointSelector::new("", "src", &["air".to_string()]);
        let errors = sel.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("feed_id"));
    }

    #[test]
    fn blank_channel_names_are_rejected() {
        assert!(selector(&["air", " "]).validate().is_err());
        assert!(selector(&[]).validate().is_err());
        assert!(selector(&["air"]).validate().is_ok());
    }

    #[test]
    fn inverted_span_fails_schema_validation() {
        let now = Utc::now();
        let query = TimespanQuery {
            selector: selector(&["air"]),
            span: TimeSpan::new(now, now - Duration::minutes(1)),
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn limit_query_defaults() {
        let query = LimitQuery {
            selector: selector(&["air"]),
            limit: None,
            offset: None,
        };
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 0);
    }
}
