//! Instruction builders.
//!
//! Each builder is a pure function from typed accounts (and arguments) to an
//! [`Instruction`]. The account order is part of the program's interface and
//! is reproduced exactly; variable-length extras such as lock accounts or an
//! NFT metadata account follow the fixed accounts. Builders neither derive
//! nor check addresses and never touch the network.
//!
//! Instruction data is an 8-byte discriminator, the first eight bytes of
//! `SHA-256("global:<instruction_name>")`, followed by the Borsh-encoded
//! arguments.

mod admin;
mod farmer;

pub use admin::{
    add_manager, add_to_whitelist, create_farm, create_locks, fund_reward, remove_from_whitelist,
    AddManagerAccounts, AddToWhitelistAccounts, AddToWhitelistArgs, CreateFarmAccounts,
    CreateLocksAccounts, CreateLocksArgs, FundRewardAccounts, FundRewardArgs,
    RemoveFromWhitelistAccounts,
};
pub use farmer::{
    buff_pair, claim_rewards, debuff_pair, initialize_farmer, stake, unstake, BuffPairAccounts,
    ClaimRewardsAccounts, DebuffPairAccounts, InitializeFarmerAccounts, StakeAccounts, StakeArgs,
    UnstakeAccounts,
};

use layout_codec::{encode_to_vec, Layout};

use crate::error::StakingError;

// ---------------------------------------------------------------------------
// Discriminators
// ---------------------------------------------------------------------------

pub const CREATE_FARM: [u8; 8] = [74, 59, 128, 160, 87, 174, 153, 194];
pub const ADD_MANAGER: [u8; 8] = [125, 38, 192, 212, 101, 91, 179, 16];
pub const CREATE_LOCKS: [u8; 8] = [116, 223, 225, 220, 25, 137, 7, 164];
pub const ADD_TO_WHITELIST: [u8; 8] = [157, 211, 52, 54, 144, 81, 5, 55];
pub const REMOVE_FROM_WHITELIST: [u8; 8] = [7, 144, 216, 239, 243, 236, 193, 235];
pub const FUND_REWARD: [u8; 8] = [188, 50, 249, 165, 93, 151, 38, 63];
pub const INITIALIZE_FARMER: [u8; 8] = [33, 254, 50, 5, 156, 85, 154, 149];
pub const STAKE: [u8; 8] = [206, 176, 202, 18, 200, 209, 179, 108];
pub const UNSTAKE: [u8; 8] = [90, 95, 107, 42, 205, 124, 50, 225];
pub const BUFF_PAIR: [u8; 8] = [24, 89, 4, 84, 20, 40, 196, 30];
pub const DEBUFF_PAIR: [u8; 8] = [251, 106, 212, 199, 136, 102, 33, 176];
pub const CLAIM_REWARDS: [u8; 8] = [4, 144, 132, 71, 116, 23, 151, 80];

/// Discriminator followed by the encoded arguments.
fn instruction_data<A: Layout>(discriminator: [u8; 8], args: &A) -> Result<Vec<u8>, StakingError> {
    let encoded = encode_to_vec(args)?;
    let mut data = Vec::with_capacity(8 + encoded.len());
    data.extend_from_slice(&discriminator);
    data.extend_from_slice(&encoded);
    Ok(data)
}
