use std::collections::HashMap;

use serde_json::Value;

use crate::domain::common::model::{DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Offset/limit pair of a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u32,
    pub limit: u32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageCursor {
    /// Fills missing values with the listing defaults (offset 0, limit 20).
    pub fn resolve(offset: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            offset: offset.unwrap_or(DEFAULT_OFFSET),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }
}

/// Caller-owned client state for one user session.
///
/// Create one per login and drop it on logout or navigation away; nothing in
/// the client keeps state between calls except through this object.
#[derive(Debug, Default)]
pub struct ClientSession {
    /// Paging of the last feed listing.
    pub feeds_page: PageCursor,
    /// Paging of the last source listing.
    pub sources_page: PageCursor,
    dashboards: HashMap<String, Value>,
    external_widgettype_urls: Vec<String>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dashboard(&self, dashboard_id: &str) -> Option<&Value> {
        self.dashboards.get(dashboard_id)
    }

    pub fn dashboards(&self) -> &HashMap<String, Value> {
        &self.dashboards
    }

    pub fn cache_dashboard(&mut self, dashboard_id: impl Into<String>, state: Value) {
        self.dashboards.insert(dashboard_id.into(), state);
    }

    pub fn external_widgettype_urls(&self) -> &[String] {
        &self.external_widgettype_urls
    }

    pub fn set_external_widgettype_urls(&mut self, urls: Vec<String>) {
        self.external_widgettype_urls = urls;
    }

    /// Forgets everything, as on logout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
