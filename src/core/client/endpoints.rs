use urlencoding::encode;

pub const API_PREFIX: &str = "/api/v1";

/// URL builder for every service endpoint, rooted at `{origin}/api/v1`.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(api_origin: &str) -> Self {
        Self {
            base: format!("{}{}", api_origin.trim_end_matches('/'), API_PREFIX),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn feeds_collection(&self) -> String {
        format!("{}/feeds", self.base)
    }

    pub fn feed(&self, feed_id: &str) -> String {
        format!("{}/feeds/{}", self.base, encode(feed_id))
    }

    pub fn feeds(&self, offset: u32, limit: u32) -> String {
        format!(
            "{}/feeds?{}",
            self.base,
            query(&[
                ("access", "publicread".to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ])
        )
    }

    pub fn source(&self, feed_id: &str, source_id: &str) -> String {
        format!(
            "{}/feeds/{}/sources/{}",
            self.base,
            encode(feed_id),
            encode(source_id)
        )
    }

    pub fn sources(&self, feed_id: &str, offset: u32, limit: u32) -> String {
        format!(
            "{}/feeds/{}/sources?{}",
            self.base,
            encode(feed_id),
            query(&[
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ])
        )
    }

    pub fn points_by_timespan(
        &self,
        feed_id: &str,
        source_id: &str,
        channels: &[String],
        first_ms: i64,
        last_ms: i64,
    ) -> String {
        format!(
            "{}/data/minimalpoint?{}",
            self.base,
            query(&[
                ("feed", feed_id.to_string()),
                ("sourceId", source_id.to_string()),
                ("channels", channels.join(",")),
                ("firstTS", first_ms.to_string()),
                ("lastTS", last_ms.to_string()),
            ])
        )
    }

    pub fn points_by_limit(
        &self,
        feed_id: &str,
        source_id: &str,
        channels: &[String],
        limit: u32,
        offset: u32,
    ) -> String {
        format!(
            "{}/data/minimalpoint?{}",
            self.base,
            query(&[
                ("feed", feed_id.to_string()),
                ("sourceId", source_id.to_string()),
                ("channels", channels.join(",")),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ])
        )
    }

    pub fn points_aggregated(
        &self,
        feed_id: &str,
        source_id: &str,
        channels: &[String],
        first_ms: i64,
        last_ms: i64,
        level: u8,
    ) -> String {
        format!(
            "{}/data/minimalstats?{}",
            self.base,
            query(&[
                ("feed", feed_id.to_string()),
                ("sourceId", source_id.to_string()),
                ("channels", channels.join(",")),
                ("firstTS", first_ms.to_string()),
                ("lastTS", last_ms.to_string()),
                ("level", level.to_string()),
            ])
        )
    }

    pub fn packets(&self) -> String {
        format!("{}/packets", self.base)
    }
}

fn query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
