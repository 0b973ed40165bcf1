//! # Attest Testkit
//!
//! Testing utilities for signed data attestation.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known payloads with their expected canonical encoding
//! - **Generators**: Proptest strategies for payloads
//! - **Fixtures**: Cached key pairs and on-disk key directories
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the canonical encoding so it cannot drift between
//! releases or between signer and verifier implementations:
//!
//! ```rust
//! use attest_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use attest_testkit::generators::payload;
//!
//! proptest! {
//!     #[test]
//!     fn canonical_is_deterministic(p in payload()) {
//!         prop_assert_eq!(canonicalize(&p), canonicalize(&p));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use attest_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let signed = fixture.sign_message("hello");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{foreign_key_store, shared_key_store, TestFixture, TEST_KEY_BITS};
pub use generators::{payload, payload_with_reordering, ReorderedPayload};
pub use vectors::{
    all_vectors, golden_key_store, signature_vectors, verify_all_vectors, GoldenVector,
    SignatureVector,
};
