//! Key store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default RSA modulus size.
pub const DEFAULT_KEY_SIZE_BITS: usize = 2048;

/// Smallest accepted modulus size.
pub const MIN_KEY_SIZE_BITS: usize = 1024;

/// Largest accepted modulus size. Public keys above this are rejected when
/// parsed, so generating them would produce an unloadable pair.
pub const MAX_KEY_SIZE_BITS: usize = 4096;

/// Configuration for provisioning and loading the key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyStoreConfig {
    /// Directory holding both key files.
    pub key_dir: PathBuf,
    /// File name of the private key, relative to `key_dir`.
    pub private_key_file: String,
    /// File name of the public key, relative to `key_dir`.
    pub public_key_file: String,
    /// RSA modulus size for newly generated keys. Larger is slower but stronger.
    pub key_size_bits: usize,
    /// Whether `generate` writes the new pair to `key_dir`.
    pub persist: bool,
    /// Whether `generate` may replace existing key files.
    pub overwrite: bool,
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            key_dir: PathBuf::from("keys"),
            private_key_file: "private_key.pem".to_string(),
            public_key_file: "public_key.pem".to_string(),
            key_size_bits: DEFAULT_KEY_SIZE_BITS,
            persist: true,
            overwrite: false,
        }
    }
}

impl KeyStoreConfig {
    /// Configuration rooted at the given directory, defaults elsewhere.
    pub fn in_dir(key_dir: impl AsRef<Path>) -> Self {
        Self {
            key_dir: key_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Set the modulus size.
    pub fn key_size_bits(mut self, bits: usize) -> Self {
        self.key_size_bits = bits;
        self
    }

    /// Enable or disable persistence of generated keys.
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Allow `generate` to replace existing key files.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Full path of the private key file.
    pub fn private_key_path(&self) -> PathBuf {
        self.key_dir.join(&self.private_key_file)
    }

    /// Full path of the public key file.
    pub fn public_key_path(&self) -> PathBuf {
        self.key_dir.join(&self.public_key_file)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.validate_files()?;
        if !(MIN_KEY_SIZE_BITS..=MAX_KEY_SIZE_BITS).contains(&self.key_size_bits) {
            return Err(Error::Config(format!(
                "key_size_bits must be between {} and {}, got {}",
                MIN_KEY_SIZE_BITS, MAX_KEY_SIZE_BITS, self.key_size_bits
            )));
        }
        if self.key_size_bits % 8 != 0 {
            return Err(Error::Config(format!(
                "key_size_bits must be a multiple of 8, got {}",
                self.key_size_bits
            )));
        }
        Ok(())
    }

    /// Validate only the key file locations. Enough for loading an existing pair.
    pub fn validate_files(&self) -> Result<()> {
        if self.private_key_file.is_empty() || self.public_key_file.is_empty() {
            return Err(Error::Config("key file names cannot be empty".into()));
        }
        if self.private_key_file == self.public_key_file {
            return Err(Error::Config("private and public key files must differ".into()));
        }
        Ok(())
    }
}
