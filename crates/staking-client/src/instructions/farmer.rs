//! Farmer operations: positions, staking, buffs and reward claims.

use layout_codec::impl_struct_layout;

use super::{
    instruction_data, BUFF_PAIR, CLAIM_REWARDS, DEBUFF_PAIR, INITIALIZE_FARMER, STAKE, UNSTAKE,
};
use crate::address::Pubkey;
use crate::error::StakingError;
use crate::spl_token::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use crate::transaction::{AccountMeta, Instruction};

// ---------------------------------------------------------------------------
// initialize_farmer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeFarmerAccounts {
    pub farm: Pubkey,
    pub farmer: Pubkey,
    pub owner: Pubkey,
}

pub fn initialize_farmer(program_id: &Pubkey, accounts: &InitializeFarmerAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::readonly(accounts.farm),
            AccountMeta::writable(accounts.farmer),
            AccountMeta::writable_signer(accounts.owner),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ],
        data: INITIALIZE_FARMER.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// stake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeAccounts {
    pub farm: Pubkey,
    pub farmer: Pubkey,
    pub whitelist_proof: Pubkey,
    pub gem_mint: Pubkey,
    /// Metadata address of the staked mint under the token metadata program.
    pub gem_metadata: Pubkey,
    /// Farmer-owned token account receiving the asset.
    pub farmer_vault: Pubkey,
    pub gem_owner_ata: Pubkey,
    pub stake_receipt: Pubkey,
    pub lock: Pubkey,
    pub owner: Pubkey,
    /// Metadata account naming the verified creator. Present only for NFTs
    /// and appended after the fixed accounts.
    pub creator_metadata: Option<Pubkey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeArgs {
    pub amount: u64,
    pub level: u8,
}

impl_struct_layout!(StakeArgs {
    amount: u64,
    level: u8,
});

pub fn stake(
    program_id: &Pubkey,
    accounts: &StakeAccounts,
    args: &StakeArgs,
) -> Result<Instruction, StakingError> {
    let mut metas = vec![
        AccountMeta::writable(accounts.farm),
        AccountMeta::writable(accounts.farmer),
        AccountMeta::readonly(accounts.whitelist_proof),
        AccountMeta::readonly(accounts.gem_mint),
        AccountMeta::readonly(accounts.gem_metadata),
        AccountMeta::writable(accounts.farmer_vault),
        AccountMeta::writable(accounts.gem_owner_ata),
        AccountMeta::writable(accounts.stake_receipt),
        AccountMeta::readonly(accounts.lock),
        AccountMeta::writable_signer(accounts.owner),
        AccountMeta::readonly(RENT_SYSVAR_ID),
        AccountMeta::readonly(SYSTEM_PROGRAM_ID),
        AccountMeta::readonly(TOKEN_PROGRAM_ID),
        AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID),
    ];
    metas.extend(accounts.creator_metadata.map(AccountMeta::readonly));

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data: instruction_data(STAKE, args)?,
    })
}

// ---------------------------------------------------------------------------
// unstake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstakeAccounts {
    pub farm: Pubkey,
    pub farmer: Pubkey,
    pub gem_mint: Pubkey,
    pub whitelist_proof: Pubkey,
    pub stake_receipt: Pubkey,
    /// Lock recorded on the stake receipt.
    pub lock: Pubkey,
    pub farmer_vault: Pubkey,
    pub gem_owner_ata: Pubkey,
    pub owner: Pubkey,
    /// Verified creator metadata, NFTs only.
    pub creator_metadata: Option<Pubkey>,
}

pub fn unstake(program_id: &Pubkey, accounts: &UnstakeAccounts) -> Instruction {
    let mut metas = vec![
        AccountMeta::writable(accounts.farm),
        AccountMeta::writable(accounts.farmer),
        AccountMeta::readonly(accounts.gem_mint),
        AccountMeta::readonly(accounts.whitelist_proof),
        AccountMeta::writable(accounts.stake_receipt),
        AccountMeta::readonly(accounts.lock),
        AccountMeta::writable(accounts.farmer_vault),
        AccountMeta::writable(accounts.gem_owner_ata),
        AccountMeta::signer(accounts.owner),
        AccountMeta::readonly(TOKEN_PROGRAM_ID),
    ];
    metas.extend(accounts.creator_metadata.map(AccountMeta::readonly));

    Instruction {
        program_id: *program_id,
        accounts: metas,
        data: UNSTAKE.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// buff_pair / debuff_pair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuffPairAccounts {
    pub farm: Pubkey,
    pub farmer: Pubkey,
    pub buff_mint: Pubkey,
    /// Whitelist proof of the buff's verified creator.
    pub buff_whitelist: Pubkey,
    pub buff_user_ata: Pubkey,
    pub buff_vault: Pubkey,
    pub mint_a: Pubkey,
    pub mint_a_receipt: Pubkey,
    pub mint_b: Pubkey,
    pub mint_b_receipt: Pubkey,
    pub authority: Pubkey,
    /// Metadata account of the buff, appended after the fixed accounts.
    pub buff_metadata: Pubkey,
}

pub fn buff_pair(program_id: &Pubkey, accounts: &BuffPairAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::writable(accounts.farm),
            AccountMeta::writable(accounts.farmer),
            AccountMeta::readonly(accounts.buff_mint),
            AccountMeta::readonly(accounts.buff_whitelist),
            AccountMeta::writable(accounts.buff_user_ata),
            AccountMeta::writable(accounts.buff_vault),
            AccountMeta::readonly(accounts.mint_a),
            AccountMeta::writable(accounts.mint_a_receipt),
            AccountMeta::readonly(accounts.mint_b),
            AccountMeta::writable(accounts.mint_b_receipt),
            AccountMeta::writable_signer(accounts.authority),
            AccountMeta::readonly(RENT_SYSVAR_ID),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            AccountMeta::readonly(TOKEN_PROGRAM_ID),
            AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID),
            AccountMeta::readonly(accounts.buff_metadata),
        ],
        data: BUFF_PAIR.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuffPairAccounts {
    pub farm: Pubkey,
    pub farmer: Pubkey,
    pub buff_mint: Pubkey,
    pub buff_user_ata: Pubkey,
    pub buff_vault: Pubkey,
    pub mint_a: Pubkey,
    pub mint_a_receipt: Pubkey,
    pub mint_b: Pubkey,
    pub mint_b_receipt: Pubkey,
    pub authority: Pubkey,
}

pub fn debuff_pair(program_id: &Pubkey, accounts: &DebuffPairAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::writable(accounts.farm),
            AccountMeta::writable(accounts.farmer),
            AccountMeta::readonly(accounts.buff_mint),
            AccountMeta::writable(accounts.buff_user_ata),
            AccountMeta::writable(accounts.buff_vault),
            AccountMeta::readonly(accounts.mint_a),
            AccountMeta::writable(accounts.mint_a_receipt),
            AccountMeta::readonly(accounts.mint_b),
            AccountMeta::writable(accounts.mint_b_receipt),
            AccountMeta::signer(accounts.authority),
            AccountMeta::readonly(TOKEN_PROGRAM_ID),
        ],
        data: DEBUFF_PAIR.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// claim_rewards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRewardsAccounts {
    pub farm: Pubkey,
    pub farmer: Pubkey,
    pub reward_mint: Pubkey,
    pub farm_reward_vault: Pubkey,
    pub farmer_reward_vault: Pubkey,
    pub authority: Pubkey,
}

pub fn claim_rewards(program_id: &Pubkey, accounts: &ClaimRewardsAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::writable(accounts.farm),
            AccountMeta::writable(accounts.farmer),
            AccountMeta::readonly(accounts.reward_mint),
            AccountMeta::writable(accounts.farm_reward_vault),
            AccountMeta::writable(accounts.farmer_reward_vault),
            AccountMeta::writable_signer(accounts.authority),
            AccountMeta::readonly(RENT_SYSVAR_ID),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            AccountMeta::readonly(TOKEN_PROGRAM_ID),
            AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID),
        ],
        data: CLAIM_REWARDS.to_vec(),
    }
}
