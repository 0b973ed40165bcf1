//! Test fixtures and helpers.
//!
//! RSA key generation is slow, so the shared key pairs are generated once per
//! test process. Fixtures that need files on disk get their own directory.

use std::sync::{Arc, OnceLock};

use attest_core::{KeyStore, KeyStoreConfig, Payload, SignedPayload};
use tempfile::TempDir;

/// Modulus size used by all fixtures.
pub const TEST_KEY_BITS: usize = 1024;

fn ephemeral_key_store() -> Arc<KeyStore> {
    let config = KeyStoreConfig::default()
        .key_size_bits(TEST_KEY_BITS)
        .persist(false);
    Arc::new(KeyStore::generate(&config).expect("key generation"))
}

/// A key pair shared by every test in the process.
pub fn shared_key_store() -> Arc<KeyStore> {
    static KEYS: OnceLock<Arc<KeyStore>> = OnceLock::new();
    KEYS.get_or_init(ephemeral_key_store).clone()
}

/// A second key pair, unrelated to [`shared_key_store`].
pub fn foreign_key_store() -> Arc<KeyStore> {
    static KEYS: OnceLock<Arc<KeyStore>> = OnceLock::new();
    KEYS.get_or_init(ephemeral_key_store).clone()
}

/// A fresh key pair persisted to a temporary key directory.
pub struct TestFixture {
    pub keys: Arc<KeyStore>,
    pub config: KeyStoreConfig,
    // Removed on drop.
    dir: TempDir,
}

impl TestFixture {
    /// Generate and persist a new key pair.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = KeyStoreConfig::in_dir(dir.path()).key_size_bits(TEST_KEY_BITS);
        let keys = Arc::new(KeyStore::generate(&config).expect("key generation"));
        Self { keys, config, dir }
    }

    /// The key directory.
    pub fn key_dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Sign `{"message": <text>}`.
    pub fn sign_message(&self, text: &str) -> SignedPayload {
        SignedPayload::sign(Payload::message(text), &self.keys.signer()).expect("signing")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
