use layout_codec::impl_struct_layout;
use serde::{Deserialize, Serialize};

use super::AccountSchema;
use crate::address::Pubkey;
use crate::config::ProgramVersion;

/// Grants `authority` administrative rights over `farm`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmManager {
    pub farm: Pubkey,
    pub authority: Pubkey,
}

impl_struct_layout!(FarmManager {
    farm: Pubkey,
    authority: Pubkey,
});

impl AccountSchema for FarmManager {
    const NAME: &'static str = "FarmManager";
    const DISCRIMINATOR: [u8; 8] = [140, 111, 131, 135, 218, 198, 198, 200];

    fn supported_in(version: ProgramVersion) -> bool {
        version == ProgramVersion::V2
    }
}
