use layout_codec::impl_struct_layout;
use serde::{Deserialize, Serialize};

use super::AccountSchema;
use crate::address::Pubkey;
use crate::config::ProgramVersion;
use crate::types::LockConfig;

/// A staking term offered by a farm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    pub farm: Pubkey,
    #[serde(with = "crate::json::u64_string")]
    pub duration: u64,
    #[serde(with = "crate::json::u64_string")]
    pub cooldown: u64,
    pub bonus_factor: u8,
}

impl_struct_layout!(Lock {
    farm: Pubkey,
    duration: u64,
    cooldown: u64,
    bonus_factor: u8,
});

impl Lock {
    /// The configuration this lock was created from.
    pub fn config(&self) -> LockConfig {
        LockConfig {
            duration: self.duration,
            bonus_factor: self.bonus_factor,
            cooldown: self.cooldown,
        }
    }
}

impl AccountSchema for Lock {
    const NAME: &'static str = "Lock";
    const DISCRIMINATOR: [u8; 8] = [8, 255, 36, 202, 210, 22, 57, 137];

    fn supported_in(_version: ProgramVersion) -> bool {
        true
    }
}
