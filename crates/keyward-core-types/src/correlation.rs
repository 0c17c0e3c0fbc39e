//! Request correlation
//!
//! One `RequestContext` is created per engine call. Its id is stamped on the
//! call's log events, on any error it returns, and on the audit events it
//! appends, so the three can be joined afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque id for one engine call (UUID v7 unless supplied by a transport)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Reuse an id that arrived with the request
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-call context threaded through engine operations
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: RequestId,
}

impl RequestContext {
    /// Context with a freshly generated id
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(request_id: RequestId) -> Self {
        Self { request_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_ordered() {
        let first = RequestId::new();
        let second = RequestId::new();
        assert_ne!(first, second);
        assert!(first.as_str() < second.as_str());
    }

    #[test]
    fn test_supplied_id_is_kept_verbatim() {
        let ctx = RequestContext::with_request_id(RequestId::from_string("req-1".into()));
        assert_eq!(ctx.request_id.to_string(), "req-1");
    }

    #[test]
    fn test_request_id_serializes_as_plain_string() {
        let id = RequestId::from_string("req-9".into());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"req-9\"");
    }
}
