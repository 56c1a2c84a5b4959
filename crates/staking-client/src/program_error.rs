//! Error codes reported by the staking program and its framework.
//!
//! A failed instruction surfaces in the submission error as
//! `custom program error: 0x<hex>`. Codes from 6000 upwards are the staking
//! program's own errors, numbered in declaration order, so the table depends
//! on the pinned [`ProgramVersion`]. Lower codes belong to the Anchor
//! framework the program is built on and do not change between versions.

use std::fmt;

use crate::config::ProgramVersion;

/// First code of the program's own error table.
pub const CUSTOM_ERROR_OFFSET: u32 = 6000;

const CUSTOM_ERROR_MARKER: &str = "custom program error: ";

macro_rules! error_names {
    ($(#[$meta:meta])* $vis:vis enum $name:ident {
        $($variant:ident => $msg:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            pub fn message(&self) -> &'static str {
                match self {
                    $(Self::$variant => $msg),+
                }
            }
        }
    };
}

error_names! {
    /// Errors declared by the staking program itself.
    pub enum CustomError {
        CooldownIsNotOver => "Cooldown is not over yet.",
        CouldNotReserveReward => "Insufficient reward funds. Could not reserve.",
        CouldNotReleaseReward => "Insufficient reserved reward. Could not release.",
        GemStillLocked => "Cannot unstake while the gem is still locked.",
        GemStillStaked => "Must unstake before staking again.",
        GemNotStaked => "Attempt to operate on a gem that is no longer staked.",
        GemAlreadyBuffed => "This NFT is already being buffed.",
        GemNotBuffed => "This NFT was not buffed.",
        GemStillBuffed => "The gem must be debuffed before realizing this operation.",
        InvalidWhitelistType => "Invalid whitelist type.",
        FactorMustBeGtZero => "Buff factor must be greater than 0.",
        InvalidTripEffectValue => "Invalid trip effect value.",
        ArithmeticError => "An arithmetic error occurred.",
    }
}

const V1_CUSTOM_ERRORS: &[CustomError] = &[
    CustomError::CooldownIsNotOver,
    CustomError::CouldNotReserveReward,
    CustomError::CouldNotReleaseReward,
    CustomError::GemStillLocked,
    CustomError::ArithmeticError,
];

const V2_CUSTOM_ERRORS: &[CustomError] = &[
    CustomError::CooldownIsNotOver,
    CustomError::CouldNotReserveReward,
    CustomError::CouldNotReleaseReward,
    CustomError::GemStillLocked,
    CustomError::GemStillStaked,
    CustomError::GemNotStaked,
    CustomError::GemAlreadyBuffed,
    CustomError::GemNotBuffed,
    CustomError::GemStillBuffed,
    CustomError::InvalidWhitelistType,
    CustomError::FactorMustBeGtZero,
    CustomError::InvalidTripEffectValue,
    CustomError::ArithmeticError,
];

impl CustomError {
    /// The custom error table of a program version, indexed by
    /// `code - CUSTOM_ERROR_OFFSET`.
    pub fn table(version: ProgramVersion) -> &'static [CustomError] {
        match version {
            ProgramVersion::V1 => V1_CUSTOM_ERRORS,
            ProgramVersion::V2 => V2_CUSTOM_ERRORS,
        }
    }

    pub fn from_code(code: u32, version: ProgramVersion) -> Option<Self> {
        let index = code.checked_sub(CUSTOM_ERROR_OFFSET)?;
        Self::table(version).get(index as usize).copied()
    }

    /// Code of this error under `version`, `None` if that version does not
    /// declare it.
    pub fn code(&self, version: ProgramVersion) -> Option<u32> {
        Self::table(version)
            .iter()
            .position(|e| e == self)
            .map(|index| CUSTOM_ERROR_OFFSET + index as u32)
    }
}

error_names! {
    /// Errors raised by the Anchor framework before or around the program's
    /// own handler.
    pub enum FrameworkError {
        InstructionMissing => "8 byte instruction identifier not provided",
        InstructionFallbackNotFound => "Fallback functions are not supported",
        InstructionDidNotDeserialize => "The program could not deserialize the given instruction",
        InstructionDidNotSerialize => "The program could not serialize the given instruction",
        IdlInstructionStub => "The program was compiled without idl instructions",
        IdlInstructionInvalidProgram => "The transaction was given an invalid program for the IDL instruction",
        ConstraintMut => "A mut constraint was violated",
        ConstraintHasOne => "A has_one constraint was violated",
        ConstraintSigner => "A signer constraint was violated",
        ConstraintRaw => "A raw constraint was violated",
        ConstraintOwner => "An owner constraint was violated",
        ConstraintRentExempt => "A rent exemption constraint was violated",
        ConstraintSeeds => "A seeds constraint was violated",
        ConstraintExecutable => "An executable constraint was violated",
        ConstraintState => "A state constraint was violated",
        ConstraintAssociated => "An associated constraint was violated",
        ConstraintAssociatedInit => "An associated init constraint was violated",
        ConstraintClose => "A close constraint was violated",
        ConstraintAddress => "An address constraint was violated",
        ConstraintZero => "Expected zero account discriminant",
        ConstraintTokenMint => "A token mint constraint was violated",
        ConstraintTokenOwner => "A token owner constraint was violated",
        ConstraintMintMintAuthority => "A mint mint authority constraint was violated",
        ConstraintMintFreezeAuthority => "A mint freeze authority constraint was violated",
        ConstraintMintDecimals => "A mint decimals constraint was violated",
        ConstraintSpace => "A space constraint was violated",
        AccountDiscriminatorAlreadySet => "The account discriminator was already set on this account",
        AccountDiscriminatorNotFound => "No 8 byte discriminator was found on the account",
        AccountDiscriminatorMismatch => "8 byte discriminator did not match what was expected",
        AccountDidNotDeserialize => "Failed to deserialize the account",
        AccountDidNotSerialize => "Failed to serialize the account",
        AccountNotEnoughKeys => "Not enough account keys given to the instruction",
        AccountNotMutable => "The given account is not mutable",
        AccountOwnedByWrongProgram => "The given account is owned by a different program than expected",
        InvalidProgramId => "Program ID was not as expected",
        InvalidProgramExecutable => "Program account is not executable",
        AccountNotSigner => "The given account did not sign",
        AccountNotSystemOwned => "The given account is not owned by the system program",
        AccountNotInitialized => "The program expected this account to be already initialized",
        AccountNotProgramData => "The given account is not a program data account",
        AccountNotAssociatedTokenAccount => "The given account is not the associated token account",
        AccountSysvarMismatch => "The given public key does not match the required sysvar",
        StateInvalidAddress => "The given state account does not have the correct address",
        DeclaredProgramIdMismatch => "The declared program id does not match the actual program id",
        Deprecated => "The API being used is deprecated and should no longer be used",
    }
}

impl FrameworkError {
    pub fn from_code(code: u32) -> Option<Self> {
        use FrameworkError::*;

        let error = match code {
            100 => InstructionMissing,
            101 => InstructionFallbackNotFound,
            102 => InstructionDidNotDeserialize,
            103 => InstructionDidNotSerialize,
            1000 => IdlInstructionStub,
            1001 => IdlInstructionInvalidProgram,
            2000 => ConstraintMut,
            2001 => ConstraintHasOne,
            2002 => ConstraintSigner,
            2003 => ConstraintRaw,
            2004 => ConstraintOwner,
            2005 => ConstraintRentExempt,
            2006 => ConstraintSeeds,
            2007 => ConstraintExecutable,
            2008 => ConstraintState,
            2009 => ConstraintAssociated,
            2010 => ConstraintAssociatedInit,
            2011 => ConstraintClose,
            2012 => ConstraintAddress,
            2013 => ConstraintZero,
            2014 => ConstraintTokenMint,
            2015 => ConstraintTokenOwner,
            2016 => ConstraintMintMintAuthority,
            2017 => ConstraintMintFreezeAuthority,
            2018 => ConstraintMintDecimals,
            2019 => ConstraintSpace,
            3000 => AccountDiscriminatorAlreadySet,
            3001 => AccountDiscriminatorNotFound,
            3002 => AccountDiscriminatorMismatch,
            3003 => AccountDidNotDeserialize,
            3004 => AccountDidNotSerialize,
            3005 => AccountNotEnoughKeys,
            3006 => AccountNotMutable,
            3007 => AccountOwnedByWrongProgram,
            3008 => InvalidProgramId,
            3009 => InvalidProgramExecutable,
            3010 => AccountNotSigner,
            3011 => AccountNotSystemOwned,
            3012 => AccountNotInitialized,
            3013 => AccountNotProgramData,
            3014 => AccountNotAssociatedTokenAccount,
            3015 => AccountSysvarMismatch,
            4000 => StateInvalidAddress,
            4100 => DeclaredProgramIdMismatch,
            5000 => Deprecated,
            _ => return None,
        };
        Some(error)
    }
}

/// Which table a program error code resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramErrorKind {
    Custom(CustomError),
    Framework(FrameworkError),
}

impl ProgramErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Custom(e) => e.name(),
            Self::Framework(e) => e.name(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Custom(e) => e.message(),
            Self::Framework(e) => e.message(),
        }
    }
}

/// A named error reported by the program for a failed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramError {
    pub code: u32,
    pub kind: ProgramErrorKind,
}

impl ProgramError {
    /// Resolve a numeric code against the tables of `version`.
    pub fn from_code(code: u32, version: ProgramVersion) -> Option<Self> {
        let kind = if code >= CUSTOM_ERROR_OFFSET {
            ProgramErrorKind::Custom(CustomError::from_code(code, version)?)
        } else {
            ProgramErrorKind::Framework(FrameworkError::from_code(code)?)
        };
        Some(Self { code, kind })
    }

    /// Resolve the code embedded in a submission failure message.
    pub fn from_tx_error(message: &str, version: ProgramVersion) -> Option<Self> {
        Self::from_code(extract_error_code(message)?, version)
    }
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.kind.name(),
            self.code,
            self.kind.message()
        )
    }
}

impl std::error::Error for ProgramError {}

/// Pull the hex code out of `... custom program error: 0x1773`.
pub fn extract_error_code(message: &str) -> Option<u32> {
    let start = message.find(CUSTOM_ERROR_MARKER)? + CUSTOM_ERROR_MARKER.len();
    let digits: String = message[start..]
        .trim_start_matches("0x")
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();
    u32::from_str_radix(&digits, 16).ok()
}
