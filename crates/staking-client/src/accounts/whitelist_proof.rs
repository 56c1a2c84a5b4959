use layout_codec::impl_struct_layout;
use serde::{Deserialize, Serialize};

use super::AccountSchema;
use crate::address::Pubkey;
use crate::config::ProgramVersion;
use crate::types::{RewardAmount, WhitelistType};

/// Admits a creator, mint or buff collection to a farm at a reward rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct WhitelistProof<N: RewardAmount = u64> {
    pub whitelisted_address: Pubkey,
    pub farm: Pubkey,
    /// Reward per second for a creator or mint, multiplier for a buff.
    #[serde(with = "crate::json::amount")]
    pub reward_rate: N,
    #[serde(rename = "type")]
    pub ty: WhitelistType,
}

impl_struct_layout!(WhitelistProof<N: RewardAmount> {
    whitelisted_address: Pubkey,
    farm: Pubkey,
    reward_rate: N,
    ty: WhitelistType,
});

impl<N: RewardAmount> AccountSchema for WhitelistProof<N> {
    const NAME: &'static str = "WhitelistProof";
    const DISCRIMINATOR: [u8; 8] = [194, 230, 60, 10, 60, 98, 236, 39];

    fn supported_in(version: ProgramVersion) -> bool {
        version == ProgramVersion::V2
    }
}
