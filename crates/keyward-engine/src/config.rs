//! Engine configuration
//!
//! Read from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! [fingerprint]
//! policy = "salted"
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//!
//! [audit]
//! snapshot_on_read = true
//!
//! [logging]
//! profile = "production"
//! ```

use std::path::Path;

use keyward_core::errors::{ExError, ExErrorKind};
use keyward_core::fingerprint::{FingerprintConfig, Fingerprinter};
use keyward_core::logging_facility::Profile;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Capture a fresh snapshot whenever the audit log is listed
    pub snapshot_on_read: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            snapshot_on_read: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub fingerprint: FingerprintConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// `ValidationFailure` if the text is not valid TOML or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::ValidationFailure)
                .with_op("config_parse")
                .with_message(e.to_string())
        })
    }

    /// Read and parse a configuration file
    ///
    /// # Errors
    ///
    /// `ValidationFailure` if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::ValidationFailure)
                .with_op("config_load")
                .with_message(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn snapshot_on_audit_read(&self) -> bool {
        self.audit.snapshot_on_read
    }

    /// Build the fingerprint function this configuration selects
    ///
    /// # Errors
    ///
    /// `ValidationFailure` if the Argon2 parameters are out of range.
    pub fn fingerprinter(&self) -> Result<Fingerprinter> {
        Fingerprinter::new(&self.fingerprint).map_err(ExError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_core::fingerprint::FingerprintPolicy;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.fingerprint.policy, FingerprintPolicy::Salted);
        assert!(config.snapshot_on_audit_read());
        assert_eq!(config.logging.profile, Profile::Development);
    }

    #[test]
    fn test_partial_tables_merge_with_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [fingerprint]
            policy = "unsalted-fast"

            [audit]
            snapshot_on_read = false

            [logging]
            profile = "production"
            "#,
        )
        .unwrap();

        assert_eq!(config.fingerprint.policy, FingerprintPolicy::UnsaltedFast);
        assert_eq!(config.fingerprint.iterations, 2);
        assert!(!config.snapshot_on_audit_read());
        assert_eq!(config.logging.profile, Profile::Production);
    }

    #[test]
    fn test_unknown_policy_is_validation_failure() {
        let err = EngineConfig::from_toml_str("[fingerprint]\npolicy = \"md5\"\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ValidationFailure);
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let err = EngineConfig::from_toml_str("[tokens]\nsecret = \"x\"\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ValidationFailure);
    }

    #[test]
    fn test_out_of_range_params_fail_at_build() {
        let config =
            EngineConfig::from_toml_str("[fingerprint]\nparallelism = 0\n").unwrap();
        let err = config.fingerprinter().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ValidationFailure);
    }

    #[test]
    fn test_missing_file_is_validation_failure() {
        let err = EngineConfig::load("/nonexistent/keyward.toml").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ValidationFailure);
        assert_eq!(err.op(), Some("config_load"));
    }
}
