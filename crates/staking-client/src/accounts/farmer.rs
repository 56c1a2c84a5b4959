use layout_codec::impl_struct_layout;
use serde::{Deserialize, Serialize};

use super::AccountSchema;
use crate::address::Pubkey;
use crate::config::ProgramVersion;
use crate::types::RewardAmount;

/// Staking position of one owner in one farm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Farmer<N: RewardAmount = u64> {
    pub farm: Pubkey,
    pub owner: Pubkey,
    /// Claimable rewards as of `last_update`.
    #[serde(with = "crate::json::amount")]
    pub accrued_rewards: N,
    /// Sum of the reward rates of all active stakes.
    #[serde(with = "crate::json::amount")]
    pub total_reward_rate: N,
    #[serde(with = "crate::json::u64_string")]
    pub last_update: u64,
    pub bump: [u8; 1],
}

impl_struct_layout!(Farmer<N: RewardAmount> {
    farm: Pubkey,
    owner: Pubkey,
    accrued_rewards: N,
    total_reward_rate: N,
    last_update: u64,
    bump: [u8; 1],
});

impl<N: RewardAmount> AccountSchema for Farmer<N> {
    const NAME: &'static str = "Farmer";
    const DISCRIMINATOR: [u8; 8] = [254, 63, 81, 98, 130, 38, 28, 219];

    fn supported_in(_version: ProgramVersion) -> bool {
        true
    }
}
