//! Principal identities
//!
//! An [`Address`] is an opaque handle for an already-authenticated caller,
//! a transfer destination, or the wallet itself.

use crate::crypto::hash::{double_sha256, hash160};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version byte for wallet addresses (P2SH-style, Base58 strings start with '3')
const WALLET_ADDRESS_VERSION: u8 = 0x05;

/// Opaque principal handle
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Surrounding whitespace is not part of an identity
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().len() == value.len() {
            Self(value)
        } else {
            Self(value.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The zero/empty identity, never a valid owner or destination
    pub fn is_null(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl FromStr for Address {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Derive a wallet's own address from its construction parameters
///
/// Address = Base58Check(version || RIPEMD160(SHA256(required || sorted_owners || daily_limit)))
///
/// Owners are sorted so the address does not depend on the order they were
/// listed in.
pub fn derive_wallet_address(owners: &[Address], required: usize, daily_limit: u128) -> Address {
    let mut sorted_owners: Vec<&Address> = owners.iter().collect();
    sorted_owners.sort();

    let mut script_data = (required as u64).to_be_bytes().to_vec();
    for owner in sorted_owners {
        script_data.extend_from_slice(owner.as_str().as_bytes());
        script_data.push(0);
    }
    script_data.extend_from_slice(&daily_limit.to_be_bytes());

    let mut address_bytes = vec![WALLET_ADDRESS_VERSION];
    address_bytes.extend_from_slice(&hash160(&script_data));

    let checksum = double_sha256(&address_bytes);
    address_bytes.extend_from_slice(&checksum[..4]);

    Address(bs58::encode(address_bytes).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners() -> Vec<Address> {
        vec!["alice".into(), "bob".into(), "carol".into()]
    }

    #[test]
    fn test_null_address() {
        assert!(Address::new("").is_null());
        assert!(Address::new("   ").is_null());
        assert!(!Address::new("alice").is_null());
    }

    #[test]
    fn test_wallet_address_format() {
        let address = derive_wallet_address(&owners(), 2, 100);
        assert!(address.as_str().starts_with('3'));
    }

    #[test]
    fn test_wallet_address_ignores_owner_order() {
        let mut reversed = owners();
        reversed.reverse();

        assert_eq!(
            derive_wallet_address(&owners(), 2, 100),
            derive_wallet_address(&reversed, 2, 100)
        );
    }

    #[test]
    fn test_wallet_address_depends_on_parameters() {
        let base = derive_wallet_address(&owners(), 2, 100);
        assert_ne!(base, derive_wallet_address(&owners(), 3, 100));
        assert_ne!(base, derive_wallet_address(&owners(), 2, 101));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let address: Address = " bob ".parse().unwrap();
        assert_eq!(address.as_str(), "bob");
    }

    #[test]
    fn test_construction_trims_whitespace() {
        assert_eq!(Address::new(" alice"), Address::new("alice"));
        assert_eq!(Address::from(String::from("alice\t")), Address::from("alice"));
        assert_eq!(Address::new(" alice ").as_str(), "alice");
    }
}
