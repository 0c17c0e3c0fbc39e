//! Credential fingerprinting.
//!
//! A fingerprint is the one-way digest stored in place of a credential.
//! Two policies exist and the choice is made here, at construction time:
//!
//! - [`FingerprintPolicy::Salted`] (default): Argon2id with a per-record
//!   random salt, encoded as a PHC string (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).
//! - [`FingerprintPolicy::UnsaltedFast`]: hex SHA256 with no salt. It permits
//!   cross-record equality but is cheap to brute force. Selecting it logs a
//!   security regression warning.
//!
//! Whatever the policy, a digest is compared only against the digest stored
//! for the same record, so divergence detection works on both.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use keyward_core_types::Sensitive;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::{KeywardError, Result};

/// Which one-way function stores credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FingerprintPolicy {
    /// Argon2id, per-record salt
    #[default]
    Salted,
    /// SHA256, no salt; kept only for migrating legacy stores
    UnsaltedFast,
}

/// Fingerprint configuration, usually read from the `[fingerprint]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FingerprintConfig {
    pub policy: FingerprintPolicy,
    /// Argon2 memory cost in KiB
    pub memory_kib: u32,
    /// Argon2 time cost
    pub iterations: u32,
    /// Argon2 lanes
    pub parallelism: u32,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            policy: FingerprintPolicy::Salted,
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Compute the unsalted SHA256 fingerprint of raw bytes (hex, 64 chars)
///
/// Deterministic across records and processes.
pub fn fingerprint_unsalted(secret: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hex::encode(hasher.finalize())
}

fn is_unsalted_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Stateless fingerprint function bound to one policy
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    policy: FingerprintPolicy,
    params: Params,
    /// Digest of a throwaway credential under this policy and these params
    decoy_digest: String,
}

impl Fingerprinter {
    /// Build a fingerprinter from configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidFingerprintConfig` if the Argon2 parameters are out of
    /// range, `Fingerprint` if the decoy digest cannot be computed.
    pub fn new(config: &FingerprintConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| KeywardError::InvalidFingerprintConfig {
            reason: e.to_string(),
        })?;

        if config.policy == FingerprintPolicy::UnsaltedFast {
            tracing::warn!(
                policy = "unsalted-fast",
                "security regression: credentials will be stored as unsalted SHA256"
            );
        }

        let mut fingerprinter = Self {
            policy: config.policy,
            params,
            decoy_digest: String::new(),
        };
        fingerprinter.decoy_digest =
            fingerprinter.fingerprint(&Sensitive::from("keyward-decoy"))?;
        Ok(fingerprinter)
    }

    pub fn policy(&self) -> FingerprintPolicy {
        self.policy
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Fingerprint a credential under the configured policy
    ///
    /// # Errors
    ///
    /// Returns `Fingerprint` if hashing fails.
    pub fn fingerprint(&self, secret: &Sensitive<String>) -> Result<String> {
        match self.policy {
            FingerprintPolicy::Salted => {
                let salt = SaltString::generate(&mut OsRng);
                self.hash_salted(secret, salt.as_salt())
            }
            FingerprintPolicy::UnsaltedFast => {
                Ok(fingerprint_unsalted(secret.expose().as_bytes()))
            }
        }
    }

    /// Fingerprint with an explicit salt
    ///
    /// Deterministic: the same secret and salt always give the same digest.
    /// Ignores the policy and always uses Argon2id.
    ///
    /// # Errors
    ///
    /// Returns `Fingerprint` if the salt is shorter than 8 or longer than 48 bytes.
    pub fn fingerprint_with_salt(&self, secret: &Sensitive<String>, salt: &[u8]) -> Result<String> {
        let encoded = SaltString::encode_b64(salt).map_err(fingerprint_error)?;
        // encode_b64 accepts salts that as_salt() later panics on
        let salt = Salt::from_b64(encoded.as_str()).map_err(fingerprint_error)?;
        self.hash_salted(secret, salt)
    }

    fn hash_salted(&self, secret: &Sensitive<String>, salt: Salt<'_>) -> Result<String> {
        self.argon2()
            .hash_password(secret.expose().as_bytes(), salt)
            .map(|hash| hash.to_string())
            .map_err(fingerprint_error)
    }

    /// Check a supplied credential against a stored digest
    ///
    /// PHC-encoded digests are verified with the parameters recorded in the
    /// digest itself. A legacy unsalted SHA256 digest is still verified but
    /// logs a security regression warning.
    ///
    /// # Errors
    ///
    /// Returns `Fingerprint` if the stored digest is in neither format.
    pub fn verify(&self, secret: &Sensitive<String>, stored_digest: &str) -> Result<bool> {
        if is_unsalted_digest(stored_digest) {
            if self.policy == FingerprintPolicy::Salted {
                tracing::warn!(
                    "security regression: verifying against a legacy unsalted SHA256 digest"
                );
            }
            let computed = fingerprint_unsalted(secret.expose().as_bytes());
            return Ok(computed.as_bytes().ct_eq(stored_digest.as_bytes()).into());
        }

        let parsed = PasswordHash::new(stored_digest).map_err(fingerprint_error)?;
        match self
            .argon2()
            .verify_password(secret.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(fingerprint_error(e)),
        }
    }

    /// Run one full verification against the decoy digest and discard it
    ///
    /// Callers with no stored digest to check (an unknown username) use this
    /// so the failure costs the same as a wrong credential.
    pub fn verify_decoy(&self, secret: &Sensitive<String>) {
        let _ = self.verify(secret, &self.decoy_digest);
    }
}

fn fingerprint_error(err: PasswordHashError) -> KeywardError {
    KeywardError::Fingerprint {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_salted() -> Fingerprinter {
        Fingerprinter::new(&FingerprintConfig {
            policy: FingerprintPolicy::Salted,
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config_is_salted() {
        let config = FingerprintConfig::default();
        assert_eq!(config.policy, FingerprintPolicy::Salted);
        assert_eq!(config.memory_kib, 19 * 1024);
    }

    #[test]
    fn test_salted_digest_is_phc_and_never_plaintext() {
        let digest = fast_salted().fingerprint(&"p1".into()).unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(!digest.contains("p1$"));
    }

    #[test]
    fn test_salted_digests_differ_per_record() {
        let fp = fast_salted();
        let a = fp.fingerprint(&"same".into()).unwrap();
        let b = fp.fingerprint(&"same".into()).unwrap();
        assert_ne!(a, b);
        assert!(fp.verify(&"same".into(), &a).unwrap());
        assert!(fp.verify(&"same".into(), &b).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_credential() {
        let fp = fast_salted();
        let digest = fp.fingerprint(&"right".into()).unwrap();
        assert!(!fp.verify(&"wrong".into(), &digest).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        let err = fast_salted().verify(&"x".into(), "not-a-digest").unwrap_err();
        assert!(matches!(err, KeywardError::Fingerprint { .. }));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = Fingerprinter::new(&FingerprintConfig {
            iterations: 0,
            ..FingerprintConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, KeywardError::InvalidFingerprintConfig { .. }));
    }

    #[test]
    fn test_salted_verifier_accepts_legacy_unsalted_digest() {
        let legacy = fingerprint_unsalted(b"old-secret");
        assert!(fast_salted().verify(&"old-secret".into(), &legacy).unwrap());
        assert!(!fast_salted().verify(&"other".into(), &legacy).unwrap());
    }

    #[test]
    fn test_decoy_digest_uses_configured_params() {
        let fp = fast_salted();
        assert!(fp.decoy_digest.starts_with("$argon2id$v=19$m=256,t=1,p=1$"));
        assert!(!fp.verify(&"anything".into(), &fp.decoy_digest).unwrap());
    }

    #[test]
    fn test_unsalted_decoy_is_a_sha256_digest() {
        let fp = Fingerprinter::new(&FingerprintConfig {
            policy: FingerprintPolicy::UnsaltedFast,
            ..FingerprintConfig::default()
        })
        .unwrap();
        assert!(is_unsalted_digest(&fp.decoy_digest));
    }

    #[test]
    fn test_policy_parses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: FingerprintPolicy,
        }
        let w: Wrapper = serde_json::from_str(r#"{"policy":"unsalted-fast"}"#).unwrap();
        assert_eq!(w.policy, FingerprintPolicy::UnsaltedFast);
    }
}
