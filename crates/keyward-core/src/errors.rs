use keyward_core_types::RequestId;
use thiserror::Error;

/// Result type alias using KeywardError
pub type Result<T> = std::result::Result<T, KeywardError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that crosses the core boundary is classified into one of
/// these kinds. Each kind maps to a stable error code and a public message
/// that is safe to show to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    ValidationFailure,
    NotFound,
    AlreadyExists,

    // Authentication
    CredentialMismatch,

    // Divergence
    NoSnapshotAvailable,

    // Storage
    StorageFailure,
    Timeout,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ValidationFailure => "ERR_VALIDATION_FAILURE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::CredentialMismatch => "ERR_CREDENTIAL_MISMATCH",
            ExErrorKind::NoSnapshotAvailable => "ERR_NO_SNAPSHOT_AVAILABLE",
            ExErrorKind::StorageFailure => "ERR_STORAGE_FAILURE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// User-facing message for this kind
    ///
    /// Storage-layer detail never appears here; it stays in `ExError::message`.
    pub fn public_message(&self) -> &'static str {
        match self {
            ExErrorKind::ValidationFailure => "The request is invalid",
            ExErrorKind::NotFound => "Account not found",
            ExErrorKind::AlreadyExists => "Username is already taken",
            ExErrorKind::CredentialMismatch => "Invalid credentials",
            ExErrorKind::NoSnapshotAvailable => "No snapshot is available for comparison",
            ExErrorKind::StorageFailure | ExErrorKind::Timeout | ExErrorKind::Serialization => {
                "A storage error occurred"
            }
            ExErrorKind::Internal => "An internal error occurred",
        }
    }

    /// True for kinds raised by a durable store call
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ExErrorKind::StorageFailure | ExErrorKind::Timeout | ExErrorKind::Serialization
        )
    }
}

/// Canonical structured error type
///
/// Carries the taxonomy kind for programmatic handling plus operational
/// context (operation, entity, request id, raw message) for logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (account id or snapshot id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add the operational message (may contain storage detail)
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Operational message; for logs only
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message that is safe to return to an end user
    pub fn public_message(&self) -> &'static str {
        self.kind.public_message()
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for Keyward operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeywardError {
    // ===== Lookup =====
    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },

    #[error("Username already taken: {username}")]
    UsernameTaken { username: String },

    // ===== Validation =====
    /// Username missing, blank, or surrounded by whitespace
    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    /// Credential missing or empty
    #[error("Invalid credential: {reason}")]
    InvalidCredential { reason: String },

    /// Update request carried neither a username nor a credential
    #[error("Nothing to update for account {account_id}")]
    EmptyUpdate { account_id: String },

    #[error("Invalid fingerprint configuration: {reason}")]
    InvalidFingerprintConfig { reason: String },

    // ===== Divergence =====
    #[error("No snapshot available for comparison")]
    NoSnapshotAvailable,

    // ===== Authentication =====
    /// Deliberately carries no username: unknown user and wrong credential look the same
    #[error("Invalid credentials")]
    CredentialMismatch,

    // ===== Generic =====
    /// Hash computation or digest parsing failed
    #[error("Fingerprint error: {message}")]
    Fingerprint { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<KeywardError> for ExError {
    fn from(err: KeywardError) -> Self {
        match err {
            KeywardError::AccountNotFound { account_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(account_id)
                .with_message("Account not found"),

            KeywardError::UsernameTaken { username } => ExError::new(ExErrorKind::AlreadyExists)
                .with_message(format!("Username already taken: {}", username)),

            KeywardError::InvalidUsername { reason } => {
                ExError::new(ExErrorKind::ValidationFailure)
                    .with_message(format!("Invalid username: {}", reason))
            }

            KeywardError::InvalidCredential { reason } => {
                ExError::new(ExErrorKind::ValidationFailure)
                    .with_message(format!("Invalid credential: {}", reason))
            }

            KeywardError::EmptyUpdate { account_id } => {
                ExError::new(ExErrorKind::ValidationFailure)
                    .with_entity_id(account_id)
                    .with_message("Update must change the username or the credential")
            }

            KeywardError::InvalidFingerprintConfig { reason } => {
                ExError::new(ExErrorKind::ValidationFailure)
                    .with_op("fingerprint_config")
                    .with_message(reason)
            }

            KeywardError::NoSnapshotAvailable => ExError::new(ExErrorKind::NoSnapshotAvailable)
                .with_message("Snapshot store is empty"),

            KeywardError::CredentialMismatch => {
                ExError::new(ExErrorKind::CredentialMismatch).with_message("Invalid credentials")
            }

            KeywardError::Fingerprint { message } => ExError::new(ExErrorKind::Internal)
                .with_op("fingerprint")
                .with_message(message),

            KeywardError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            KeywardError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for KeywardError {
    fn from(err: serde_json::Error) -> Self {
        KeywardError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kinds_share_public_message() {
        for kind in [
            ExErrorKind::StorageFailure,
            ExErrorKind::Timeout,
            ExErrorKind::Serialization,
        ] {
            assert!(kind.is_storage(), "{:?} should be storage-class", kind);
            assert_eq!(kind.public_message(), "A storage error occurred");
        }
        assert!(!ExErrorKind::NotFound.is_storage());
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error as _;

        let inner = ExError::new(ExErrorKind::StorageFailure).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);
        let source = outer.source().expect("source should be set");
        assert!(source.to_string().contains("disk full"));
    }
}
