//! Header parsing and outbound message assembly.

use crate::Result;
use tracing::debug;

/// The single record published by one invocation.
///
/// Immutable once built and submitted exactly once. The value is always the
/// JSON-string encoding of the raw message text, so downstream consumers
/// receive a JSON string literal as the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub key: Option<Vec<u8>>,
    pub value: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

impl OutboundMessage {
    /// Assembles a message from the raw CLI arguments.
    ///
    /// The key is included only when non-empty; an absent key leaves
    /// partition assignment to the broker. Headers are parsed with
    /// [`parse_headers`] only when the header argument is non-empty.
    pub fn build(
        topic: &str,
        text: &str,
        key: Option<&str>,
        headers: Option<&str>,
    ) -> Result<Self> {
        let value = serde_json::to_vec(text)?;

        let key = key
            .filter(|k| !k.is_empty())
            .map(|k| k.as_bytes().to_vec());

        let headers = headers
            .filter(|h| !h.is_empty())
            .map(parse_headers)
            .unwrap_or_default();

        Ok(Self {
            topic: topic.to_string(),
            key,
            value,
            headers,
        })
    }
}

/// Parses a flat `k=v,k=v` string into an ordered header list.
///
/// Each comma-separated segment is split on its first `=` and both sides
/// trimmed. Segments without an `=`, or with an empty key or value after
/// trimming, are silently dropped so a partially malformed header string
/// degrades gracefully instead of aborting the send. Duplicate keys are
/// kept in input order.
pub fn parse_headers(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                debug!(segment, "dropping malformed header segment");
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
