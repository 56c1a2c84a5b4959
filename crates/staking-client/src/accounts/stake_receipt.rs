use layout_codec::impl_struct_layout;
use serde::{Deserialize, Serialize};

use super::AccountSchema;
use crate::address::Pubkey;
use crate::config::ProgramVersion;
use crate::types::{Buff, RewardAmount};

/// Lifecycle of a stake receipt. The program moves a receipt from `Active`
/// to `Ended` when it executes an unstake; the client only observes this by
/// fetching the account again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeReceiptState {
    Active,
    Ended,
}

fn state_of(end_ts: Option<u64>) -> StakeReceiptState {
    match end_ts {
        None => StakeReceiptState::Active,
        Some(_) => StakeReceiptState::Ended,
    }
}

/// One staked asset of a farmer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct StakeReceipt<N: RewardAmount = u64> {
    pub farmer: Pubkey,
    pub mint: Pubkey,
    pub lock: Pubkey,
    #[serde(with = "crate::json::u64_string")]
    pub start_ts: u64,
    /// Set when the asset is unstaked.
    #[serde(with = "crate::json::option_u64_string")]
    pub end_ts: Option<u64>,
    #[serde(with = "crate::json::u64_string")]
    pub amount: u64,
    #[serde(with = "crate::json::amount")]
    pub reward_rate: N,
    pub buff: Option<Buff>,
}

impl_struct_layout!(StakeReceipt<N: RewardAmount> {
    farmer: Pubkey,
    mint: Pubkey,
    lock: Pubkey,
    start_ts: u64,
    end_ts: Option<u64>,
    amount: u64,
    reward_rate: N,
    buff: Option<Buff>,
});

impl<N: RewardAmount> StakeReceipt<N> {
    pub fn state(&self) -> StakeReceiptState {
        state_of(self.end_ts)
    }

    pub fn is_active(&self) -> bool {
        self.end_ts.is_none()
    }
}

impl<N: RewardAmount> AccountSchema for StakeReceipt<N> {
    const NAME: &'static str = "StakeReceipt";
    const DISCRIMINATOR: [u8; 8] = [189, 110, 129, 87, 79, 225, 96, 177];

    fn supported_in(version: ProgramVersion) -> bool {
        version == ProgramVersion::V2
    }
}

/// Stake receipt written by the first program release, before amounts,
/// rates and buffs were tracked per receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyStakeReceipt {
    pub farmer: Pubkey,
    pub mint: Pubkey,
    pub lock: Pubkey,
    #[serde(with = "crate::json::u64_string")]
    pub start_ts: u64,
    #[serde(with = "crate::json::option_u64_string")]
    pub end_ts: Option<u64>,
}

impl_struct_layout!(LegacyStakeReceipt {
    farmer: Pubkey,
    mint: Pubkey,
    lock: Pubkey,
    start_ts: u64,
    end_ts: Option<u64>,
});

impl LegacyStakeReceipt {
    pub fn state(&self) -> StakeReceiptState {
        state_of(self.end_ts)
    }

    pub fn is_active(&self) -> bool {
        self.end_ts.is_none()
    }
}

impl AccountSchema for LegacyStakeReceipt {
    const NAME: &'static str = "StakeReceipt";
    const DISCRIMINATOR: [u8; 8] = [189, 110, 129, 87, 79, 225, 96, 177];

    fn supported_in(version: ProgramVersion) -> bool {
        version == ProgramVersion::V1
    }
}
