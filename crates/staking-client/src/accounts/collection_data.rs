use layout_codec::impl_struct_layout;
use serde::{Deserialize, Serialize};

use super::AccountSchema;
use crate::address::Pubkey;
use crate::config::ProgramVersion;

/// Creator whitelist entry of the first program release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionData {
    pub creator: Pubkey,
    pub farm: Pubkey,
    #[serde(with = "crate::json::u64_string")]
    pub reward_rate: u64,
}

impl_struct_layout!(CollectionData {
    creator: Pubkey,
    farm: Pubkey,
    reward_rate: u64,
});

impl AccountSchema for CollectionData {
    const NAME: &'static str = "CollectionData";
    const DISCRIMINATOR: [u8; 8] = [169, 122, 6, 181, 220, 218, 199, 96];

    fn supported_in(version: ProgramVersion) -> bool {
        version == ProgramVersion::V1
    }
}
