//! Collaborators the client talks to but does not implement: a ledger RPC
//! node and an NFT-metadata resolver.
//!
//! Both are async traits so callers can plug in whatever transport they
//! already use. Neither trait retries or times out on its own behalf.

use async_trait::async_trait;
use thiserror::Error;

use crate::address::Pubkey;

/// Failure reported by an [`RpcClient`] implementation.
///
/// The message is kept verbatim: submission failures carry the program's
/// error code inside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RpcError {
    pub message: String,
}

impl RpcError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raw account state as returned by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// Server-side filter for program account scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    /// Account data is exactly this many bytes.
    DataSize(u64),
    /// Account data holds `bytes` starting at `offset`.
    Memcmp { offset: usize, bytes: Vec<u8> },
}

impl AccountFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Whether `data` passes this filter.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            Self::DataSize(size) => data.len() as u64 == *size,
            Self::Memcmp { offset, bytes } => offset
                .checked_add(bytes.len())
                .and_then(|end| data.get(*offset..end))
                .is_some_and(|window| window == bytes.as_slice()),
        }
    }
}

/// An account returned by a program scan, paired with its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedAccount {
    pub address: Pubkey,
    pub account: AccountInfo,
}

/// Ledger RPC node.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// `Ok(None)` when no account lives at `address`.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<AccountInfo>, RpcError>;

    /// One slot per requested address, in request order.
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<AccountInfo>>, RpcError>;

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError>;

    /// Submit a signed wire transaction and wait for confirmation. Returns
    /// the Base58 transaction signature.
    async fn send_and_confirm_transaction(&self, transaction: &[u8]) -> Result<String, RpcError>;

    /// All accounts owned by `program` that pass every filter.
    async fn get_program_accounts(
        &self,
        program: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<KeyedAccount>, RpcError>;
}

/// Verified creator of an NFT mint and the metadata account naming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundCreator {
    pub metadata_address: Pubkey,
    pub creator_address: Pubkey,
}

/// Resolves the verified creator of a mint.
///
/// `Ok(None)` is the normal answer for fungible tokens, not a failure.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn find_creator(&self, mint: &Pubkey) -> Result<Option<FoundCreator>, RpcError>;
}
