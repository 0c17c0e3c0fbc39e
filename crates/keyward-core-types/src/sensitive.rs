//! Redacting wrapper for plaintext credentials
//!
//! A credential stays inside `Sensitive` from the moment it enters the
//! engine until the fingerprint function reads it. `Debug` and `Display`
//! both print a fixed marker, so deriving `Debug` on a request type that
//! holds one cannot leak it into a log line or an error message.

use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Value that never prints itself
///
/// ```
/// use keyward_core_types::Sensitive;
///
/// let credential = Sensitive::new("hunter2".to_string());
/// assert_eq!(format!("{:?}", credential), "***REDACTED***");
/// assert_eq!(credential.expose(), "hunter2");
/// ```
#[derive(Clone, Default)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the plaintext; callers other than the fingerprint function
    /// should only inspect its shape (e.g. emptiness)
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for Sensitive<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Sensitive<String> {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
