//! Well-known programs the staking instructions reference, and the token
//! account and metadata addresses derived under them.

use crate::address::Pubkey;
use crate::error::StakingError;
use crate::pda::find_program_address;

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// System Program: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// SPL Token Program: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
]);

/// Associated Token Account Program: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
]);

/// Rent sysvar: `SysvarRent111111111111111111111111111111111`
pub const RENT_SYSVAR_ID: Pubkey = Pubkey::new_from_array([
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1,
    0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00,
    0x00, 0x00,
]);

/// Token Metadata Program: `metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s`
pub const METADATA_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    0x0b, 0x70, 0x65, 0xb1, 0xe3, 0xd1, 0x7c, 0x45, 0x38, 0x9d, 0x52, 0x7f, 0x6b, 0x04, 0xc3,
    0xcd, 0x58, 0xb8, 0x6c, 0x73, 0x1a, 0xa0, 0xfd, 0xb5, 0x49, 0xb6, 0xd1, 0xbc, 0x03, 0xf8,
    0x29, 0x46,
]);

const METADATA_SEED: &[u8] = b"metadata";

// ---------------------------------------------------------------------------
// Derived token addresses
// ---------------------------------------------------------------------------

/// Associated token account of `wallet` for `mint`.
///
/// Seeds: `[wallet, token_program_id, mint]` under the associated token
/// account program. `wallet` may itself be a program derived address, which
/// is how farm and farmer vaults are addressed.
pub fn derive_associated_token_address(
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Result<Pubkey, StakingError> {
    find_program_address(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|pda| pda.address)
}

/// Metadata account of `mint` under the token metadata program.
pub fn find_metadata_address(mint: &Pubkey) -> Result<Pubkey, StakingError> {
    find_program_address(
        &[METADATA_SEED, METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    )
    .map(|pda| pda.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PROGRAM_ID;
    use crate::pda::is_on_curve;

    const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    // -- Constant verification ----------------------------------------------

    #[test]
    fn program_ids_roundtrip() {
        assert_eq!(SYSTEM_PROGRAM_ID.to_string(), "11111111111111111111111111111111");
        assert_eq!(
            TOKEN_PROGRAM_ID.to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
        assert_eq!(
            RENT_SYSVAR_ID.to_string(),
            "SysvarRent111111111111111111111111111111111"
        );
        assert_eq!(
            METADATA_PROGRAM_ID.to_string(),
            "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"
        );
    }

    // -- Derivation ---------------------------------------------------------

    #[test]
    fn ata_known_vector() {
        let wallet = Pubkey::new_from_array([0x42; 32]);
        let mint: Pubkey = USDC_MINT.parse().unwrap();
        let ata = derive_associated_token_address(&wallet, &mint).unwrap();
        assert_eq!(ata.to_string(), "4pw5VSwn2Sec4SjMhbUSBcVjS51rG34Ho1WuHQgxqVd2");
        assert!(!is_on_curve(ata.as_bytes()));
    }

    #[test]
    fn ata_of_program_owned_wallet() {
        let mint: Pubkey = USDC_MINT.parse().unwrap();
        let ata = derive_associated_token_address(&PROGRAM_ID, &mint).unwrap();
        assert_eq!(ata.to_string(), "7zED7FVkUAi9MEHUjymvxaBqznBXkHFwwZvfLWhyCKrB");
    }

    #[test]
    fn different_wallets_give_different_atas() {
        let mint = Pubkey::new_from_array([0xFF; 32]);
        let a = derive_associated_token_address(&Pubkey::new_from_array([1; 32]), &mint).unwrap();
        let b = derive_associated_token_address(&Pubkey::new_from_array([2; 32]), &mint).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn metadata_known_vector() {
        let mint: Pubkey = USDC_MINT.parse().unwrap();
        let metadata = find_metadata_address(&mint).unwrap();
        assert_eq!(
            metadata.to_string(),
            "5x38Kp4hvdomTCnCrAny4UtMUt5rQBdB6px2K1Ui45Wq"
        );
    }
}
