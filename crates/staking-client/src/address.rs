//! Ledger addresses.
//!
//! An address is a 32-byte value, either an Ed25519 public key or a
//! program-derived address that deliberately lies off the curve. Its text form
//! is the Base58 encoding of the raw bytes with no checksum and no hashing
//! step.

use std::fmt;
use std::str::FromStr;

use layout_codec::{Layout, LayoutError, Reader, Writer};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StakingError;

/// A 32-byte ledger address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const LEN: usize = 32;

    pub const fn new_from_array(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base58 text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl FromStr for Pubkey {
    type Err = StakingError;

    /// Parse a Base58 address. Anything that does not decode to exactly 32
    /// bytes is rejected.
    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(address)
            .into_vec()
            .map_err(|e| StakingError::InvalidAddress(format!("base58 decode failed: {e}")))?;

        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            StakingError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
        })?;

        Ok(Self(arr))
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self.to_base58())
    }
}

impl Layout for Pubkey {
    const SPAN: Option<usize> = Some(Self::LEN);

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError> {
        Ok(Self(reader.read_array()?))
    }

    fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError> {
        writer.write_bytes(&self.0)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
