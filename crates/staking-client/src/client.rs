//! Operation-level facade over the staking program.
//!
//! [`StakingClient`] turns user actions into ready-to-submit instructions:
//! it derives every program address, fetches the farm or stake receipt when
//! an instruction needs data only the ledger holds, and asks the metadata
//! resolver whether a mint is an NFT. [`StakingClient::send`] compiles,
//! signs and submits, translating program error codes on the way out.

use std::marker::PhantomData;

use ed25519_dalek::SigningKey;
use futures::future::try_join_all;
use log::{debug, warn};

use crate::accounts::{Farm, StakeReceipt};
use crate::address::Pubkey;
use crate::config::ProgramVersion;
use crate::error::StakingError;
use crate::instructions::{
    self, AddManagerAccounts, AddToWhitelistAccounts, AddToWhitelistArgs, BuffPairAccounts,
    ClaimRewardsAccounts, CreateFarmAccounts, CreateLocksAccounts, CreateLocksArgs,
    DebuffPairAccounts, FundRewardAccounts, FundRewardArgs, InitializeFarmerAccounts,
    RemoveFromWhitelistAccounts, StakeAccounts, StakeArgs, UnstakeAccounts,
};
use crate::pda;
use crate::program_error::{extract_error_code, ProgramError};
use crate::registry::SchemaRegistry;
use crate::rpc::{MetadataResolver, RpcClient};
use crate::spl_token::{derive_associated_token_address, find_metadata_address};
use crate::transaction::{compile_transaction, sign_transaction, Instruction};
use crate::types::{LockConfig, RewardAmount, TripEffect, WhitelistType};

/// Token amount paid out over an interval, converted to a per-second rate
/// when whitelisting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardRate<N: RewardAmount = u64> {
    pub token_amount: N,
    pub interval_secs: u64,
}

/// One asset to stake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeRequest {
    pub farm: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub lock: Pubkey,
    pub amount: u64,
    pub trip_effect: TripEffect,
}

/// Whitelist key and metadata of a mint: the verified creator for NFTs, the
/// mint itself for fungible tokens.
struct WhitelistKey {
    creator_or_mint: Pubkey,
    creator_metadata: Option<Pubkey>,
}

pub struct StakingClient<'a, R: ?Sized, M: ?Sized, N: RewardAmount = u64> {
    registry: &'a SchemaRegistry,
    rpc: &'a R,
    metadata: &'a M,
    amounts: PhantomData<N>,
}

impl<'a, R, M, N> StakingClient<'a, R, M, N>
where
    R: RpcClient + ?Sized,
    M: MetadataResolver + ?Sized,
    N: RewardAmount,
{
    /// Fails for program versions without an instruction interface here.
    pub fn new(registry: &'a SchemaRegistry, rpc: &'a R, metadata: &'a M) -> Result<Self, StakingError> {
        if !registry.version().supports_instructions() {
            return Err(StakingError::UnsupportedVersion(registry.version()));
        }
        Ok(Self {
            registry,
            rpc,
            metadata,
            amounts: PhantomData,
        })
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.registry
    }

    fn program_id(&self) -> &Pubkey {
        self.registry.program_id()
    }

    async fn fetch_farm(&self, farm: &Pubkey) -> Result<Farm<N>, StakingError> {
        self.registry.fetch_required::<Farm<N>, R>(self.rpc, farm).await
    }

    async fn resolve_whitelist_key(&self, mint: &Pubkey) -> Result<WhitelistKey, StakingError> {
        Ok(match self.metadata.find_creator(mint).await? {
            Some(found) => {
                debug!("mint {mint} is an NFT of creator {}", found.creator_address);
                WhitelistKey {
                    creator_or_mint: found.creator_address,
                    creator_metadata: Some(found.metadata_address),
                }
            }
            None => {
                debug!("mint {mint} has no verified creator, staking as fungible");
                WhitelistKey {
                    creator_or_mint: *mint,
                    creator_metadata: None,
                }
            }
        })
    }

    // -----------------------------------------------------------------------
    // Farm administration
    // -----------------------------------------------------------------------

    /// Create a farm paying `reward_mint` and make its authority the first
    /// manager.
    pub fn create_farm(
        &self,
        authority: &Pubkey,
        reward_mint: &Pubkey,
    ) -> Result<Vec<Instruction>, StakingError> {
        let program_id = self.program_id();
        let farm = pda::find_farm_address(program_id, authority, reward_mint)?.address;
        let farm_manager = pda::find_farm_manager_address(program_id, &farm, authority)?.address;
        let farm_vault = derive_associated_token_address(&farm, reward_mint)?;

        let create = instructions::create_farm(
            program_id,
            &CreateFarmAccounts {
                farm,
                reward_mint: *reward_mint,
                farm_vault,
                authority: *authority,
            },
        );
        let manager = instructions::add_manager(
            program_id,
            &AddManagerAccounts {
                farm,
                farm_manager,
                manager_authority: *authority,
                authority: *authority,
            },
        );

        debug!("create_farm {farm} for authority {authority}");
        Ok(vec![create, manager])
    }

    pub fn add_manager(
        &self,
        farm: &Pubkey,
        farm_authority: &Pubkey,
        new_manager: &Pubkey,
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let farm_manager = pda::find_farm_manager_address(program_id, farm, new_manager)?.address;

        Ok(instructions::add_manager(
            program_id,
            &AddManagerAccounts {
                farm: *farm,
                farm_manager,
                manager_authority: *new_manager,
                authority: *farm_authority,
            },
        ))
    }

    pub fn create_locks(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        lock_configs: &[LockConfig],
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let farm_manager = pda::find_farm_manager_address(program_id, farm, authority)?.address;
        let locks = lock_configs
            .iter()
            .map(|config| {
                pda::find_lock_address(program_id, farm, config.duration, config.cooldown)
                    .map(|lock| lock.address)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("create_locks: {} locks for farm {farm}", locks.len());
        instructions::create_locks(
            program_id,
            &CreateLocksAccounts {
                farm: *farm,
                farm_manager,
                authority: *authority,
                locks,
            },
            &CreateLocksArgs {
                lock_configs: lock_configs.to_vec(),
            },
        )
    }

    /// Move `amount` of the farm's reward mint from the manager into the
    /// farm vault.
    pub async fn fund_reward(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        amount: N,
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let mint = self.fetch_farm(farm).await?.reward.mint;
        let farm_manager = pda::find_farm_manager_address(program_id, farm, authority)?.address;

        instructions::fund_reward(
            program_id,
            &FundRewardAccounts {
                farm: *farm,
                farm_manager,
                mint,
                farm_vault: derive_associated_token_address(farm, &mint)?,
                manager_ata: derive_associated_token_address(authority, &mint)?,
                authority: *authority,
            },
            &FundRewardArgs { amount },
        )
    }

    /// Whitelist a creator, mint or buff collection. The on-chain rate is
    /// `token_amount / interval_secs`.
    pub fn add_to_whitelist(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        creator_or_mint: &Pubkey,
        rate: RewardRate<N>,
        whitelist_type: WhitelistType,
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let reward_rate = N::rate_per_second(rate.token_amount, rate.interval_secs)?;
        let farm_manager = pda::find_farm_manager_address(program_id, farm, authority)?.address;
        let whitelist_proof =
            pda::find_whitelist_proof_address(program_id, farm, creator_or_mint)?.address;

        instructions::add_to_whitelist(
            program_id,
            &AddToWhitelistAccounts {
                farm: *farm,
                farm_manager,
                whitelist_proof,
                creator_or_mint: *creator_or_mint,
                authority: *authority,
            },
            &AddToWhitelistArgs {
                reward_rate,
                whitelist_type,
            },
        )
    }

    pub fn remove_from_whitelist(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        address_to_remove: &Pubkey,
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();

        Ok(instructions::remove_from_whitelist(
            program_id,
            &RemoveFromWhitelistAccounts {
                farm: *farm,
                farm_manager: pda::find_farm_manager_address(program_id, farm, authority)?.address,
                whitelist_proof: pda::find_whitelist_proof_address(
                    program_id,
                    farm,
                    address_to_remove,
                )?
                .address,
                authority: *authority,
            },
        ))
    }

    // -----------------------------------------------------------------------
    // Farmer operations
    // -----------------------------------------------------------------------

    pub fn initialize_farmer(&self, farm: &Pubkey, owner: &Pubkey) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let farmer = pda::find_farmer_address(program_id, farm, owner)?.address;

        Ok(instructions::initialize_farmer(
            program_id,
            &InitializeFarmerAccounts {
                farm: *farm,
                farmer,
                owner: *owner,
            },
        ))
    }

    /// Stake one asset. NFTs are whitelisted through their verified creator
    /// and carry the creator metadata account; anything else is staked as a
    /// fungible token under its own mint.
    pub async fn stake(&self, request: &StakeRequest) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let StakeRequest {
            farm,
            owner,
            mint,
            lock,
            amount,
            trip_effect,
        } = request;

        let key = self.resolve_whitelist_key(mint).await?;
        let farmer = pda::find_farmer_address(program_id, farm, owner)?.address;

        let accounts = StakeAccounts {
            farm: *farm,
            farmer,
            whitelist_proof: pda::find_whitelist_proof_address(
                program_id,
                farm,
                &key.creator_or_mint,
            )?
            .address,
            gem_mint: *mint,
            gem_metadata: find_metadata_address(mint)?,
            farmer_vault: derive_associated_token_address(&farmer, mint)?,
            gem_owner_ata: derive_associated_token_address(owner, mint)?,
            stake_receipt: pda::find_stake_receipt_address(program_id, &farmer, mint)?.address,
            lock: *lock,
            owner: *owner,
            creator_metadata: key.creator_metadata,
        };

        debug!("stake {amount} of {mint} into farm {farm}");
        instructions::stake(
            program_id,
            &accounts,
            &StakeArgs {
                amount: *amount,
                level: trip_effect.level(),
            },
        )
    }

    /// Resolve and build several stakes concurrently. The output keeps the
    /// request order so the instructions can go into one transaction.
    pub async fn stake_many(
        &self,
        requests: &[StakeRequest],
    ) -> Result<Vec<Instruction>, StakingError> {
        try_join_all(requests.iter().map(|request| self.stake(request))).await
    }

    /// Unstake `mint`. The lock is read from the existing stake receipt.
    pub async fn unstake(
        &self,
        farm: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let farmer = pda::find_farmer_address(program_id, farm, owner)?.address;
        let stake_receipt = pda::find_stake_receipt_address(program_id, &farmer, mint)?.address;

        let receipt = self
            .registry
            .fetch_required::<StakeReceipt<N>, R>(self.rpc, &stake_receipt)
            .await?;
        let key = self.resolve_whitelist_key(mint).await?;

        debug!("unstake {mint} from farm {farm}, lock {}", receipt.lock);
        Ok(instructions::unstake(
            program_id,
            &UnstakeAccounts {
                farm: *farm,
                farmer,
                gem_mint: *mint,
                whitelist_proof: pda::find_whitelist_proof_address(
                    program_id,
                    farm,
                    &key.creator_or_mint,
                )?
                .address,
                stake_receipt,
                lock: receipt.lock,
                farmer_vault: derive_associated_token_address(&farmer, mint)?,
                gem_owner_ata: derive_associated_token_address(owner, mint)?,
                owner: *owner,
                creator_metadata: key.creator_metadata,
            },
        ))
    }

    /// Buff two staked assets with `buff_mint`. The buff must be an NFT with
    /// a verified creator; both assets must already be staked, which the
    /// program checks.
    pub async fn buff_pair(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        buff_mint: &Pubkey,
        pair: [Pubkey; 2],
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let found = self
            .metadata
            .find_creator(buff_mint)
            .await?
            .ok_or(StakingError::MissingCreator(*buff_mint))?;

        let farmer = pda::find_farmer_address(program_id, farm, authority)?.address;
        let [mint_a, mint_b] = pair;

        Ok(instructions::buff_pair(
            program_id,
            &BuffPairAccounts {
                farm: *farm,
                farmer,
                buff_mint: *buff_mint,
                buff_whitelist: pda::find_whitelist_proof_address(
                    program_id,
                    farm,
                    &found.creator_address,
                )?
                .address,
                buff_user_ata: derive_associated_token_address(authority, buff_mint)?,
                buff_vault: derive_associated_token_address(&farmer, buff_mint)?,
                mint_a,
                mint_a_receipt: pda::find_stake_receipt_address(program_id, &farmer, &mint_a)?
                    .address,
                mint_b,
                mint_b_receipt: pda::find_stake_receipt_address(program_id, &farmer, &mint_b)?
                    .address,
                authority: *authority,
                buff_metadata: found.metadata_address,
            },
        ))
    }

    pub fn debuff_pair(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        buff_mint: &Pubkey,
        pair: [Pubkey; 2],
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let farmer = pda::find_farmer_address(program_id, farm, authority)?.address;
        let [mint_a, mint_b] = pair;

        Ok(instructions::debuff_pair(
            program_id,
            &DebuffPairAccounts {
                farm: *farm,
                farmer,
                buff_mint: *buff_mint,
                buff_user_ata: derive_associated_token_address(authority, buff_mint)?,
                buff_vault: derive_associated_token_address(&farmer, buff_mint)?,
                mint_a,
                mint_a_receipt: pda::find_stake_receipt_address(program_id, &farmer, &mint_a)?
                    .address,
                mint_b,
                mint_b_receipt: pda::find_stake_receipt_address(program_id, &farmer, &mint_b)?
                    .address,
                authority: *authority,
            },
        ))
    }

    pub async fn claim_rewards(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
    ) -> Result<Instruction, StakingError> {
        let program_id = self.program_id();
        let reward_mint = self.fetch_farm(farm).await?.reward.mint;
        let farmer = pda::find_farmer_address(program_id, farm, authority)?.address;

        Ok(instructions::claim_rewards(
            program_id,
            &ClaimRewardsAccounts {
                farm: *farm,
                farmer,
                reward_mint,
                farm_reward_vault: derive_associated_token_address(farm, &reward_mint)?,
                farmer_reward_vault: derive_associated_token_address(authority, &reward_mint)?,
                authority: *authority,
            },
        ))
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Compile `instructions` into one transaction paid by `fee_payer`, sign
    /// it with the payer and `signers`, and submit it. Returns the
    /// transaction signature.
    pub async fn send(
        &self,
        instructions: &[Instruction],
        fee_payer: &SigningKey,
        signers: &[&SigningKey],
    ) -> Result<String, StakingError> {
        let payer = Pubkey::new_from_array(fee_payer.verifying_key().to_bytes());
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let tx = compile_transaction(instructions, &payer, &blockhash)?;

        let mut all_signers = Vec::with_capacity(signers.len() + 1);
        all_signers.push(fee_payer);
        all_signers.extend_from_slice(signers);
        let wire = sign_transaction(&tx, &all_signers)?;

        debug!(
            "submitting {} instructions, {} bytes, payer {payer}",
            instructions.len(),
            wire.len()
        );
        self.rpc
            .send_and_confirm_transaction(&wire)
            .await
            .map_err(|e| translate_error(e.into(), self.registry.version()))
    }
}

/// Map a submission failure to a named program error.
///
/// Failures whose message carries `custom program error: 0x..` become
/// [`StakingError::Program`] when the code is known to `version`, and
/// [`StakingError::UnparsedTransaction`] when it is not. Everything else is
/// returned unchanged.
pub fn translate_error(err: StakingError, version: ProgramVersion) -> StakingError {
    let StakingError::Rpc(rpc_error) = &err else {
        return err;
    };
    let Some(code) = extract_error_code(&rpc_error.message) else {
        return err;
    };

    match ProgramError::from_code(code, version) {
        Some(program_error) => {
            warn!("transaction failed: {program_error}");
            StakingError::Program(program_error)
        }
        None => {
            warn!("transaction failed with unknown program error code {code}");
            StakingError::UnparsedTransaction(rpc_error.message.clone())
        }
    }
}
