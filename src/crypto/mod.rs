//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 and HASH160 hashing
//! - Principal addresses and wallet address derivation

pub mod address;
pub mod hash;

pub use address::{derive_wallet_address, Address};
pub use hash::{double_sha256, hash160, sha256};
