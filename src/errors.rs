use http::StatusCode;
use thiserror::Error;

pub type EvaResult<T> = Result<T, EvaError>;

#[derive(Debug, Error)]
pub enum EvaError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transport failure ({url}): {reason}")]
    TransportFailure { url: String, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Feed not provisioned: {0}")]
    NotProvisioned(String),

    #[error("No value stored at {channel}/{component}")]
    MissingValue { channel: String, component: String },
}

impl EvaError {
    /// Non-2xx answer from the service.
    pub fn status(url: &str, status: StatusCode, body: &str) -> Self {
        EvaError::TransportFailure {
            url: url.to_string(),
            reason: format!("HTTP {}: {}", status, trim_body(body, 200)),
        }
    }
}

/// Helper for mapping any decoding error into a malformed-response error
pub fn malformed<E: ToString>(err: E) -> EvaError {
    EvaError::MalformedResponse(err.to_string())
}

fn trim_body(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...<truncated>", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_truncates_long_bodies() {
        let body = "x".repeat(500);
        let err = EvaError::status("http://h/api", StatusCode::BAD_GATEWAY, &body);
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.ends_with("...<truncated>"));
    }
}
