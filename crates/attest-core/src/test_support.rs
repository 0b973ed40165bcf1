//! Shared key material for unit tests.
//!
//! RSA key generation dominates test time, so each process generates two
//! small pairs once and reuses them.

use std::path::Path;
use std::sync::OnceLock;

use crate::config::KeyStoreConfig;
use crate::keys::KeyStore;

pub const TEST_KEY_BITS: usize = 1024;

pub fn test_config(dir: &Path) -> KeyStoreConfig {
    KeyStoreConfig::in_dir(dir).key_size_bits(TEST_KEY_BITS)
}

fn ephemeral() -> KeyStore {
    let config = KeyStoreConfig::default()
        .key_size_bits(TEST_KEY_BITS)
        .persist(false);
    KeyStore::generate(&config).expect("key generation")
}

/// The primary test key pair.
pub fn key_store() -> &'static KeyStore {
    static KEYS: OnceLock<KeyStore> = OnceLock::new();
    KEYS.get_or_init(ephemeral)
}

/// An unrelated key pair.
pub fn foreign_key_store() -> &'static KeyStore {
    static KEYS: OnceLock<KeyStore> = OnceLock::new();
    KEYS.get_or_init(ephemeral)
}
