//! Rate-limit headers surfaced on successful responses.

use serde_json::{Map, Value};

pub const LIMIT_HEADER: &str = "fitbit-rate-limit-limit";
pub const REMAINING_HEADER: &str = "fitbit-rate-limit-remaining";
pub const RESET_HEADER: &str = "fitbit-rate-limit-reset";

/// The three rate-limit values Fitbit reports, kept as the raw header text.
///
/// `reset` is the number of seconds until the hourly window resets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: Option<String>,
    pub remaining: Option<String>,
    pub reset: Option<String>,
}

impl RateLimitInfo {
    /// Pick the rate-limit headers out of a response header list.
    pub fn from_headers(headers: &[(String, String)]) -> Self {
        let lookup = |name: &str| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
        };
        Self {
            limit: lookup(LIMIT_HEADER),
            remaining: lookup(REMAINING_HEADER),
            reset: lookup(RESET_HEADER),
        }
    }

    /// Read back the keys `merge_into` wrote into a success payload.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let lookup = |name: &str| payload.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            limit: lookup(LIMIT_HEADER),
            remaining: lookup(REMAINING_HEADER),
            reset: lookup(RESET_HEADER),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.remaining.is_none() && self.reset.is_none()
    }

    /// Insert each present value as a top-level string key.
    pub fn merge_into(self, payload: &mut Map<String, Value>) {
        for (name, value) in [
            (LIMIT_HEADER, self.limit),
            (REMAINING_HEADER, self.remaining),
            (RESET_HEADER, self.reset),
        ] {
            if let Some(value) = value {
                payload.insert(name.to_string(), Value::String(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_only_known_headers() {
        let info = RateLimitInfo::from_headers(&headers(&[
            ("Fitbit-Rate-Limit-Remaining", "148"),
            ("fitbit-rate-limit-other", "x"),
        ]));
        assert_eq!(info.remaining.as_deref(), Some("148"));
        assert!(info.limit.is_none());
        assert!(info.reset.is_none());
    }

    #[test]
    fn merge_skips_absent_values() {
        let mut payload = Map::new();
        RateLimitInfo {
            limit: Some("150".into()),
            remaining: None,
            reset: Some("1200".into()),
        }
        .merge_into(&mut payload);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[LIMIT_HEADER], "150");
        assert!(!payload.contains_key(REMAINING_HEADER));
    }

    #[test]
    fn payload_roundtrip_recovers_values() {
        let info = RateLimitInfo::from_headers(&headers(&[
            (LIMIT_HEADER, "150"),
            (REMAINING_HEADER, "0"),
            (RESET_HEADER, "37"),
        ]));
        let mut payload = Map::new();
        info.clone().merge_into(&mut payload);
        assert_eq!(RateLimitInfo::from_payload(&payload), info);
        assert!(RateLimitInfo::from_payload(&Map::new()).is_empty());
    }
}
