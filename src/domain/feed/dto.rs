use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct FeedRef {
    #[validate(length(min = 1, message = "feedId cannot be empty"))]
    pub feed_id: String,
}

#[derive(Debug, Clone, Validate)]
pub struct SourceRef {
    #[validate(length(min = 1, message = "feedId cannot be empty"))]
    pub feed_id: String,
    #[validate(length(min = 1, message = "sourceId cannot be empty"))]
    pub source_id: String,
}

/// Body of `POST /feeds`. Access flags travel as 0/1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedCreateRequest {
    #[validate(length(min = 1, message = "feedId cannot be empty"))]
    pub feed_id: String,
    pub access: FeedAccess,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedAccess {
    pub public: PublicAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccess {
    pub read: u8,
    pub write: u8,
}

impl FeedCreateRequest {
    pub fn new(feed_id: &str, public_read: bool, public_write: bool) -> Self {
        Self {
            feed_id: feed_id.to_string(),
            access: FeedAccess {
                public: PublicAccess {
                    read: public_read as u8,
                    write: public_write as u8,
                },
            },
        }
    }
}

/// Result of checking whether a feed exists.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedProbe {
    Exists(Value),
    Absent,
}

impl FeedProbe {
    pub fn exists(&self) -> bool {
        matches!(self, FeedProbe::Exists(_))
    }
}
