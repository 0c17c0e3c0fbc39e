use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Sensitive actions and anomalies that produce an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    AccountRegistered,
    AccountCreated,
    AccountUpdated,
    AccountDeleted,
    AccountLoggedIn,
    CredentialDivergenceDetected,
}

impl AuditAction {
    /// Human-readable description stored with the event
    pub fn description(&self) -> &'static str {
        match self {
            AuditAction::AccountRegistered => "account registered",
            AuditAction::AccountCreated => "account created",
            AuditAction::AccountUpdated => "account updated",
            AuditAction::AccountDeleted => "account deleted",
            AuditAction::AccountLoggedIn => "account logged in",
            AuditAction::CredentialDivergenceDetected => "credential divergence detected",
        }
    }
}

/// One entity touched by an audited action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Free-form context such as the request id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl AffectedEntity {
    pub fn account(username: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            account_id: Some(account_id.into()),
            context: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Append-only record of an action or detected anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier (UUID v7, time-ordered)
    pub event_id: String,
    pub recorded_at: DateTime<Utc>,
    pub description: String,
    /// Affected entities, in the order the action touched them
    pub affected: Vec<AffectedEntity>,
}

impl AuditEvent {
    /// Create an event stamped with the current time
    pub fn new(description: impl Into<String>, affected: Vec<AffectedEntity>) -> Self {
        Self {
            event_id: Uuid::now_v7().to_string(),
            recorded_at: Utc::now(),
            description: description.into(),
            affected,
        }
    }

    pub fn for_action(action: AuditAction, affected: Vec<AffectedEntity>) -> Self {
        Self::new(action.description(), affected)
    }

    /// True if any affected entity names this account id
    pub fn mentions_account(&self, account_id: &str) -> bool {
        self.affected
            .iter()
            .any(|e| e.account_id.as_deref() == Some(account_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_action_uses_description() {
        let event = AuditEvent::for_action(
            AuditAction::AccountDeleted,
            vec![AffectedEntity::account("bob", "a2")],
        );
        assert_eq!(event.description, "account deleted");
        assert!(event.mentions_account("a2"));
        assert!(!event.mentions_account("a1"));
    }

    #[test]
    fn test_affected_entity_json_omits_empty_fields() {
        let entity = AffectedEntity {
            username: Some("alice".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, r#"{"username":"alice"}"#);
    }
}
