//! Farm administration: creating farms, managers, locks and whitelist
//! entries, and funding rewards.

use layout_codec::impl_struct_layout;

use super::{
    instruction_data, ADD_MANAGER, ADD_TO_WHITELIST, CREATE_FARM, CREATE_LOCKS, FUND_REWARD,
    REMOVE_FROM_WHITELIST,
};
use crate::address::Pubkey;
use crate::error::StakingError;
use crate::spl_token::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use crate::transaction::{AccountMeta, Instruction};
use crate::types::{LockConfig, RewardAmount, WhitelistType};

// ---------------------------------------------------------------------------
// create_farm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFarmAccounts {
    pub farm: Pubkey,
    pub reward_mint: Pubkey,
    /// Reward token account owned by the farm.
    pub farm_vault: Pubkey,
    pub authority: Pubkey,
}

pub fn create_farm(program_id: &Pubkey, accounts: &CreateFarmAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::writable(accounts.farm),
            AccountMeta::readonly(accounts.reward_mint),
            AccountMeta::writable(accounts.farm_vault),
            AccountMeta::writable_signer(accounts.authority),
            AccountMeta::readonly(RENT_SYSVAR_ID),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            AccountMeta::readonly(TOKEN_PROGRAM_ID),
            AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID),
        ],
        data: CREATE_FARM.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// add_manager
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddManagerAccounts {
    pub farm: Pubkey,
    pub farm_manager: Pubkey,
    /// Key receiving manager rights.
    pub manager_authority: Pubkey,
    /// Farm authority approving the new manager.
    pub authority: Pubkey,
}

pub fn add_manager(program_id: &Pubkey, accounts: &AddManagerAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::readonly(accounts.farm),
            AccountMeta::writable(accounts.farm_manager),
            AccountMeta::readonly(accounts.manager_authority),
            AccountMeta::writable_signer(accounts.authority),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ],
        data: ADD_MANAGER.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// create_locks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLocksAccounts {
    pub farm: Pubkey,
    pub farm_manager: Pubkey,
    pub authority: Pubkey,
    /// One lock address per configuration, in argument order.
    pub locks: Vec<Pubkey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLocksArgs {
    pub lock_configs: Vec<LockConfig>,
}

impl_struct_layout!(CreateLocksArgs {
    lock_configs: Vec<LockConfig>,
});

pub fn create_locks(
    program_id: &Pubkey,
    accounts: &CreateLocksAccounts,
    args: &CreateLocksArgs,
) -> Result<Instruction, StakingError> {
    let mut metas = vec![
        AccountMeta::readonly(accounts.farm),
        AccountMeta::readonly(accounts.farm_manager),
        AccountMeta::signer(accounts.authority),
        AccountMeta::readonly(SYSTEM_PROGRAM_ID),
    ];
    metas.extend(accounts.locks.iter().copied().map(AccountMeta::writable));

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data: instruction_data(CREATE_LOCKS, args)?,
    })
}

// ---------------------------------------------------------------------------
// add_to_whitelist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToWhitelistAccounts {
    pub farm: Pubkey,
    pub farm_manager: Pubkey,
    pub whitelist_proof: Pubkey,
    pub creator_or_mint: Pubkey,
    pub authority: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddToWhitelistArgs<N: RewardAmount = u64> {
    pub reward_rate: N,
    pub whitelist_type: WhitelistType,
}

impl_struct_layout!(AddToWhitelistArgs<N: RewardAmount> {
    reward_rate: N,
    whitelist_type: WhitelistType,
});

pub fn add_to_whitelist<N: RewardAmount>(
    program_id: &Pubkey,
    accounts: &AddToWhitelistAccounts,
    args: &AddToWhitelistArgs<N>,
) -> Result<Instruction, StakingError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::readonly(accounts.farm),
            AccountMeta::readonly(accounts.farm_manager),
            AccountMeta::writable(accounts.whitelist_proof),
            AccountMeta::readonly(accounts.creator_or_mint),
            AccountMeta::writable_signer(accounts.authority),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ],
        data: instruction_data(ADD_TO_WHITELIST, args)?,
    })
}

// ---------------------------------------------------------------------------
// remove_from_whitelist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveFromWhitelistAccounts {
    pub farm: Pubkey,
    pub farm_manager: Pubkey,
    pub whitelist_proof: Pubkey,
    pub authority: Pubkey,
}

pub fn remove_from_whitelist(
    program_id: &Pubkey,
    accounts: &RemoveFromWhitelistAccounts,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::readonly(accounts.farm),
            AccountMeta::readonly(accounts.farm_manager),
            AccountMeta::writable(accounts.whitelist_proof),
            AccountMeta::signer(accounts.authority),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ],
        data: REMOVE_FROM_WHITELIST.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// fund_reward
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundRewardAccounts {
    pub farm: Pubkey,
    pub farm_manager: Pubkey,
    pub mint: Pubkey,
    pub farm_vault: Pubkey,
    /// Manager's token account the reward is paid from.
    pub manager_ata: Pubkey,
    pub authority: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundRewardArgs<N: RewardAmount = u64> {
    pub amount: N,
}

impl_struct_layout!(FundRewardArgs<N: RewardAmount> {
    amount: N,
});

pub fn fund_reward<N: RewardAmount>(
    program_id: &Pubkey,
    accounts: &FundRewardAccounts,
    args: &FundRewardArgs<N>,
) -> Result<Instruction, StakingError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::writable(accounts.farm),
            AccountMeta::readonly(accounts.farm_manager),
            AccountMeta::readonly(accounts.mint),
            AccountMeta::writable(accounts.farm_vault),
            AccountMeta::writable(accounts.manager_ata),
            AccountMeta::signer(accounts.authority),
            AccountMeta::readonly(TOKEN_PROGRAM_ID),
        ],
        data: instruction_data(FUND_REWARD, args)?,
    })
}
