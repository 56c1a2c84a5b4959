//! Account records owned by the staking program.
//!
//! Every account is an 8-byte discriminator, the first eight bytes of
//! `SHA-256("account:<Name>")`, followed by the record body. The
//! discriminators are fixed constants; they are only recomputed in tests.

mod collection_data;
mod farm;
mod farm_manager;
mod farmer;
mod lock;
mod stake_receipt;
mod whitelist_proof;

pub use collection_data::CollectionData;
pub use farm::Farm;
pub use farm_manager::FarmManager;
pub use farmer::Farmer;
pub use lock::Lock;
pub use stake_receipt::{LegacyStakeReceipt, StakeReceipt, StakeReceiptState};
pub use whitelist_proof::WhitelistProof;

use layout_codec::{encode_to_vec, Layout, LayoutError};
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ProgramVersion;
use crate::error::StakingError;
use crate::rpc::AccountFilter;

/// Length of the type prefix of every account.
pub const DISCRIMINATOR_LEN: usize = 8;

/// A record type stored in program accounts.
pub trait AccountSchema: Layout + Serialize + DeserializeOwned {
    const NAME: &'static str;

    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];

    /// Total account size including the discriminator, `None` when the body
    /// has optional or variable-length fields.
    const ACCOUNT_SPAN: Option<usize> = match <Self as Layout>::SPAN {
        Some(span) => Some(DISCRIMINATOR_LEN + span),
        None => None,
    };

    /// Whether program builds of `version` write this record.
    fn supported_in(version: ProgramVersion) -> bool;

    /// Check the discriminator and decode the body that follows it.
    fn decode_account(data: &[u8]) -> Result<Self, StakingError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(LayoutError::BufferTooShort {
                needed: DISCRIMINATOR_LEN,
                available: data.len(),
            }
            .into());
        }

        let (prefix, body) = data.split_at(DISCRIMINATOR_LEN);
        if prefix != Self::DISCRIMINATOR {
            return Err(StakingError::DiscriminatorMismatch {
                account: Self::NAME,
                expected: hex::encode(Self::DISCRIMINATOR),
                found: hex::encode(prefix),
            });
        }

        trace!("decoding {} body of {} bytes", Self::NAME, body.len());
        Ok(Self::decode(body)?)
    }

    /// Discriminator followed by the encoded body.
    fn encode_account(&self) -> Result<Vec<u8>, StakingError> {
        let body = encode_to_vec(self)?;
        let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + body.len());
        data.extend_from_slice(&Self::DISCRIMINATOR);
        data.extend_from_slice(&body);
        Ok(data)
    }

    fn to_json(&self) -> Result<serde_json::Value, StakingError> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_json(value: serde_json::Value) -> Result<Self, StakingError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Program scan filter selecting accounts of this type.
    fn discriminator_filter() -> AccountFilter {
        AccountFilter::memcmp(0, Self::DISCRIMINATOR.to_vec())
    }
}
