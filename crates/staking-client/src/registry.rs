//! Typed access to program accounts.
//!
//! A [`SchemaRegistry`] pins the program id and version once. Every fetch and
//! decode goes through it, so a record type that the pinned version never
//! wrote is refused up front instead of being decoded with the wrong layout.

use log::{debug, trace};

use crate::accounts::{AccountSchema, Lock, StakeReceipt, DISCRIMINATOR_LEN};
use crate::address::Pubkey;
use crate::config::{ClientConfig, ProgramVersion};
use crate::error::StakingError;
use crate::rpc::{AccountFilter, AccountInfo, RpcClient};
use crate::types::RewardAmount;

/// A decoded account and the address it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub address: Pubkey,
    pub account: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    program_id: Pubkey,
    version: ProgramVersion,
}

impl SchemaRegistry {
    pub fn new(program_id: Pubkey, version: ProgramVersion) -> Self {
        Self {
            program_id,
            version,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.program_id, config.version)
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn version(&self) -> ProgramVersion {
        self.version
    }

    fn ensure_supported<T: AccountSchema>(&self) -> Result<(), StakingError> {
        if T::supported_in(self.version) {
            Ok(())
        } else {
            Err(StakingError::UnsupportedSchema {
                account: T::NAME,
                version: self.version,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------------

    /// Decode raw account data as `T`.
    pub fn decode<T: AccountSchema>(&self, data: &[u8]) -> Result<T, StakingError> {
        self.ensure_supported::<T>()?;
        T::decode_account(data)
    }

    /// Check ownership, then decode.
    pub fn decode_account_info<T: AccountSchema>(
        &self,
        address: &Pubkey,
        info: &AccountInfo,
    ) -> Result<T, StakingError> {
        if info.owner != self.program_id {
            return Err(StakingError::OwnerMismatch {
                address: *address,
                owner: info.owner,
                expected: self.program_id,
            });
        }
        self.decode(&info.data)
    }

    // -----------------------------------------------------------------------
    // Fetching
    // -----------------------------------------------------------------------

    /// `Ok(None)` when nothing lives at `address`.
    pub async fn fetch<T, R>(&self, rpc: &R, address: &Pubkey) -> Result<Option<T>, StakingError>
    where
        T: AccountSchema,
        R: RpcClient + ?Sized,
    {
        self.ensure_supported::<T>()?;
        trace!("fetching {} at {address}", T::NAME);
        match rpc.get_account(address).await? {
            Some(info) => self.decode_account_info(address, &info).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`fetch`](Self::fetch) but a missing account is an error.
    pub async fn fetch_required<T, R>(&self, rpc: &R, address: &Pubkey) -> Result<T, StakingError>
    where
        T: AccountSchema,
        R: RpcClient + ?Sized,
    {
        self.fetch(rpc, address)
            .await?
            .ok_or(StakingError::AccountNotFound {
                account: T::NAME,
                address: *address,
            })
    }

    /// Fetch several accounts in one round trip.
    ///
    /// Only a transport failure fails the whole call. Each slot otherwise
    /// carries its own outcome: a malformed or foreign account does not stop
    /// the others from decoding.
    pub async fn fetch_multiple<T, R>(
        &self,
        rpc: &R,
        addresses: &[Pubkey],
    ) -> Result<Vec<Result<Option<T>, StakingError>>, StakingError>
    where
        T: AccountSchema,
        R: RpcClient + ?Sized,
    {
        self.ensure_supported::<T>()?;
        let infos = rpc.get_multiple_accounts(addresses).await?;
        if infos.len() != addresses.len() {
            return Err(StakingError::InvalidArgument(format!(
                "requested {} accounts, node returned {}",
                addresses.len(),
                infos.len()
            )));
        }

        Ok(addresses
            .iter()
            .zip(infos)
            .map(|(address, info)| match info {
                Some(info) => self.decode_account_info(address, &info).map(Some),
                None => Ok(None),
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Program scans
    // -----------------------------------------------------------------------

    /// Every `T` account passing `filters`, in addition to the discriminator
    /// filter that is always applied.
    pub async fn find_program_accounts<T, R>(
        &self,
        rpc: &R,
        mut filters: Vec<AccountFilter>,
    ) -> Result<Vec<Keyed<T>>, StakingError>
    where
        T: AccountSchema,
        R: RpcClient + ?Sized,
    {
        self.ensure_supported::<T>()?;
        filters.insert(0, T::discriminator_filter());

        let found = rpc.get_program_accounts(&self.program_id, &filters).await?;
        debug!("program scan found {} {} accounts", found.len(), T::NAME);

        found
            .into_iter()
            .map(|keyed| {
                Ok(Keyed {
                    address: keyed.address,
                    account: self.decode_account_info(&keyed.address, &keyed.account)?,
                })
            })
            .collect()
    }

    /// All locks of `farm`.
    pub async fn find_farm_locks<R>(
        &self,
        rpc: &R,
        farm: &Pubkey,
    ) -> Result<Vec<Keyed<Lock>>, StakingError>
    where
        R: RpcClient + ?Sized,
    {
        let mut filters = Vec::with_capacity(2);
        if let Some(span) = Lock::ACCOUNT_SPAN {
            filters.push(AccountFilter::DataSize(span as u64));
        }
        filters.push(AccountFilter::memcmp(DISCRIMINATOR_LEN, farm.to_bytes().to_vec()));
        self.find_program_accounts(rpc, filters).await
    }

    /// Every stake receipt of the program, active or ended.
    pub async fn find_all_stake_receipts<N, R>(
        &self,
        rpc: &R,
    ) -> Result<Vec<Keyed<StakeReceipt<N>>>, StakingError>
    where
        N: RewardAmount,
        R: RpcClient + ?Sized,
    {
        self.find_program_accounts(rpc, Vec::new()).await
    }

    /// Stake receipts of one farmer, active or ended.
    pub async fn find_farmer_stake_receipts<N, R>(
        &self,
        rpc: &R,
        farmer: &Pubkey,
    ) -> Result<Vec<Keyed<StakeReceipt<N>>>, StakingError>
    where
        N: RewardAmount,
        R: RpcClient + ?Sized,
    {
        let filters = vec![AccountFilter::memcmp(
            DISCRIMINATOR_LEN,
            farmer.to_bytes().to_vec(),
        )];
        self.find_program_accounts(rpc, filters).await
    }

    /// Stake receipts that have not been unstaked yet.
    pub async fn find_active_stake_receipts<N, R>(
        &self,
        rpc: &R,
    ) -> Result<Vec<Keyed<StakeReceipt<N>>>, StakingError>
    where
        N: RewardAmount,
        R: RpcClient + ?Sized,
    {
        let mut receipts = self.find_all_stake_receipts(rpc).await?;
        receipts.retain(|keyed| keyed.account.is_active());
        Ok(receipts)
    }
}
