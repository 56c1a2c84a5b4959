//! Client library for the NFT and token staking program.
//!
//! Decodes the program's accounts, derives its addresses, builds its
//! instructions and composes them into user operations. Ledger access and
//! NFT metadata lookups go through the [`RpcClient`] and
//! [`MetadataResolver`] traits, so the crate brings no network stack of its
//! own.
//!
//! Account layouts and error codes changed between program releases. The
//! release is pinned once in a [`SchemaRegistry`] and every decode goes
//! through it.

pub mod accounts;
pub mod address;
pub mod client;
pub mod config;
pub mod error;
pub mod instructions;
pub mod json;
pub mod pda;
pub mod program_error;
pub mod registry;
pub mod rpc;
pub mod spl_token;
pub mod transaction;
pub mod types;

pub use accounts::{
    AccountSchema, CollectionData, Farm, FarmManager, Farmer, LegacyStakeReceipt, Lock,
    StakeReceipt, StakeReceiptState, WhitelistProof,
};
pub use address::Pubkey;
pub use client::{translate_error, RewardRate, StakeRequest, StakingClient};
pub use config::{ClientConfig, ProgramVersion, PROGRAM_ID};
pub use error::StakingError;
pub use pda::ProgramAddress;
pub use program_error::{CustomError, FrameworkError, ProgramError, ProgramErrorKind};
pub use registry::{Keyed, SchemaRegistry};
pub use rpc::{
    AccountFilter, AccountInfo, FoundCreator, KeyedAccount, MetadataResolver, RpcClient, RpcError,
};
pub use transaction::{AccountMeta, Instruction, Transaction};
pub use types::{Buff, LockConfig, Reward, RewardAmount, TripEffect, WhitelistType};
