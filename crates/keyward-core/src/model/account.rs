use chrono::{DateTime, Utc};
use serde::Serialize;

use super::snapshot::AccountCopy;

/// Account - a tracked user record
///
/// The credential is held only as the output of the fingerprint function.
/// Nothing in the core ever writes a plaintext credential into this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Opaque unique identifier (UUID v7)
    pub id: String,

    /// Unique, mutable login name
    pub username: String,

    /// Fingerprint of the credential; never serialized outward
    #[serde(skip_serializing)]
    pub credential_digest: String,

    /// Timestamp when this account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last username or credential change
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new Account with current timestamps
    pub fn new(id: String, username: String, credential_digest: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            credential_digest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy the snapshot-relevant fields
    ///
    /// The digest is copied verbatim; snapshots never re-derive it.
    pub fn to_copy(&self) -> AccountCopy {
        AccountCopy {
            account_id: self.id.clone(),
            username: self.username.clone(),
            credential_digest: self.credential_digest.clone(),
        }
    }
}

/// Query filter for `AccountStore::find_by_filter`
///
/// Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub username: Option<String>,
    pub id: Option<String>,
}

impl AccountFilter {
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            id: None,
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            username: None,
            id: Some(id.into()),
        }
    }

    pub fn matches(&self, account: &Account) -> bool {
        self.username
            .as_deref()
            .map_or(true, |u| u == account.username)
            && self.id.as_deref().map_or(true, |id| id == account.id)
    }
}

/// Field changes for `AccountStore::update`
///
/// `credential_digest` must already be a fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub credential_digest: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.credential_digest.is_none()
    }

    /// Apply the changes in place and bump `updated_at`
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(username) = &self.username {
            account.username = username.clone();
        }
        if let Some(digest) = &self.credential_digest {
            account.credential_digest = digest.clone();
        }
        account.updated_at = Utc::now();
    }
}
