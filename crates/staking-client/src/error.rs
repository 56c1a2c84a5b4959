use layout_codec::LayoutError;
use thiserror::Error;

use crate::address::Pubkey;
use crate::config::ProgramVersion;
use crate::program_error::ProgramError;
use crate::rpc::RpcError;

/// Staking client errors.
#[derive(Debug, Error)]
pub enum StakingError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid account discriminator for {account}: expected {expected}, found {found}")]
    DiscriminatorMismatch {
        account: &'static str,
        expected: String,
        found: String,
    },

    #[error("account {address} is owned by {owner}, expected program {expected}")]
    OwnerMismatch {
        address: Pubkey,
        owner: Pubkey,
        expected: Pubkey,
    },

    #[error("{account} is not part of the {version} account schema")]
    UnsupportedSchema {
        account: &'static str,
        version: ProgramVersion,
    },

    #[error("program version {0} has no instruction builders")]
    UnsupportedVersion(ProgramVersion),

    #[error("{account} account not found at {address}")]
    AccountNotFound {
        account: &'static str,
        address: Pubkey,
    },

    #[error("no verified creator found for mint {0}")]
    MissingCreator(Pubkey),

    #[error("could not find a valid program address bump seed")]
    DerivationFailed,

    #[error("too many seeds: {0}, at most 16 including the bump")]
    TooManySeeds(usize),

    #[error("seed {index} is {len} bytes, at most 32 allowed")]
    SeedTooLong { index: usize, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    #[error("program error: {0}")]
    Program(#[from] ProgramError),

    #[error("unparsed transaction failure: {0}")]
    UnparsedTransaction(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),
}
