use layout_codec::impl_struct_layout;
use serde::{Deserialize, Serialize};

use super::AccountSchema;
use crate::address::Pubkey;
use crate::config::ProgramVersion;
use crate::types::{Reward, RewardAmount};

/// A reward pool created by an authority for one reward mint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Farm<N: RewardAmount = u64> {
    pub authority: Pubkey,
    pub reward: Reward<N>,
    pub bump: [u8; 1],
}

impl_struct_layout!(Farm<N: RewardAmount> {
    authority: Pubkey,
    reward: Reward<N>,
    bump: [u8; 1],
});

impl<N: RewardAmount> AccountSchema for Farm<N> {
    const NAME: &'static str = "Farm";
    const DISCRIMINATOR: [u8; 8] = [161, 156, 211, 253, 250, 64, 53, 250];

    fn supported_in(_version: ProgramVersion) -> bool {
        true
    }
}
