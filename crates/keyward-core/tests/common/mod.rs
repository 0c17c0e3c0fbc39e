use keyward_core::{Account, FingerprintConfig, FingerprintPolicy, Fingerprinter};

/// Build an account with a fixed id, bypassing any store
#[allow(dead_code)]
pub fn account(id: &str, username: &str, digest: &str) -> Account {
    Account::new(id.to_string(), username.to_string(), digest.to_string())
}

/// Salted fingerprinter with the cheapest valid Argon2 parameters
#[allow(dead_code)]
pub fn fast_fingerprinter() -> Fingerprinter {
    Fingerprinter::new(&FingerprintConfig {
        policy: FingerprintPolicy::Salted,
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

#[allow(dead_code)]
pub fn unsalted_fingerprinter() -> Fingerprinter {
    Fingerprinter::new(&FingerprintConfig {
        policy: FingerprintPolicy::UnsaltedFast,
        ..FingerprintConfig::default()
    })
    .unwrap()
}
