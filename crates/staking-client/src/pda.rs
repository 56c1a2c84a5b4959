//! Program derived addresses.
//!
//! A program derived address is `SHA-256(seeds || bump || program_id ||
//! "ProgramDerivedAddress")` for the highest bump in `255..=0` whose hash is
//! not a valid Ed25519 point, so no private key can ever sign for it.
//! Derivation is pure: the same seeds always give the same address.

use log::debug;
use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::StakingError;

/// Suffix hashed after the program id.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Seed count limit, bump included.
pub const MAX_SEEDS: usize = 16;

/// Byte limit of a single seed.
pub const MAX_SEED_LEN: usize = 32;

pub const FARM_SEED: &[u8] = b"farm";
pub const FARMER_SEED: &[u8] = b"farmer";
pub const FARM_MANAGER_SEED: &[u8] = b"farm_manager";
pub const WHITELIST_PROOF_SEED: &[u8] = b"collection_data";
pub const LOCK_SEED: &[u8] = b"lock";
pub const STAKE_RECEIPT_SEED: &[u8] = b"stake_receipt";

/// A derived address and the bump that took it off the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramAddress {
    pub address: Pubkey,
    pub bump: u8,
}

// ---------------------------------------------------------------------------
// Generic derivation
// ---------------------------------------------------------------------------

/// Search bumps from 255 down to 0 for the first off-curve address.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<ProgramAddress, StakingError> {
    validate_seeds(seeds, 1)?;

    for bump in (0u8..=255).rev() {
        if let Some(address) = hash_off_curve(seeds, Some(bump), program_id) {
            return Ok(ProgramAddress { address, bump });
        }
    }

    Err(StakingError::DerivationFailed)
}

/// Derive the address for seeds that already include the bump. Fails with
/// [`StakingError::DerivationFailed`] when the hash lands on the curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<Pubkey, StakingError> {
    validate_seeds(seeds, 0)?;
    hash_off_curve(seeds, None, program_id).ok_or(StakingError::DerivationFailed)
}

fn validate_seeds(seeds: &[&[u8]], extra: usize) -> Result<(), StakingError> {
    if seeds.len() + extra > MAX_SEEDS {
        return Err(StakingError::TooManySeeds(seeds.len() + extra));
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(StakingError::SeedTooLong {
            index,
            len: seed.len(),
        });
    }
    Ok(())
}

fn hash_off_curve(seeds: &[&[u8]], bump: Option<u8>, program_id: &Pubkey) -> Option<Pubkey> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    if let Some(bump) = bump {
        hasher.update([bump]);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    if is_on_curve(&hash) {
        return None;
    }
    Some(Pubkey::new_from_array(hash))
}

/// Whether 32 bytes decompress to an Ed25519 point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

// ---------------------------------------------------------------------------
// Staking program addresses
// ---------------------------------------------------------------------------

/// Farm of `authority` paying rewards in `reward_mint`.
pub fn find_farm_address(
    program_id: &Pubkey,
    authority: &Pubkey,
    reward_mint: &Pubkey,
) -> Result<ProgramAddress, StakingError> {
    let farm = find_program_address(
        &[FARM_SEED, authority.as_ref(), reward_mint.as_ref()],
        program_id,
    )?;
    debug!("derived farm {} for authority {authority}", farm.address);
    Ok(farm)
}

/// Position of `owner` in `farm`.
pub fn find_farmer_address(
    program_id: &Pubkey,
    farm: &Pubkey,
    owner: &Pubkey,
) -> Result<ProgramAddress, StakingError> {
    find_program_address(&[FARMER_SEED, farm.as_ref(), owner.as_ref()], program_id)
}

pub fn find_farm_manager_address(
    program_id: &Pubkey,
    farm: &Pubkey,
    authority: &Pubkey,
) -> Result<ProgramAddress, StakingError> {
    find_program_address(
        &[FARM_MANAGER_SEED, farm.as_ref(), authority.as_ref()],
        program_id,
    )
}

/// Whitelist entry of a creator, mint or buff collection in `farm`.
pub fn find_whitelist_proof_address(
    program_id: &Pubkey,
    farm: &Pubkey,
    whitelisted: &Pubkey,
) -> Result<ProgramAddress, StakingError> {
    find_program_address(
        &[WHITELIST_PROOF_SEED, farm.as_ref(), whitelisted.as_ref()],
        program_id,
    )
}

/// Lock of `farm` with the given term. Both numbers are seeded as
/// little-endian u64.
pub fn find_lock_address(
    program_id: &Pubkey,
    farm: &Pubkey,
    duration: u64,
    cooldown: u64,
) -> Result<ProgramAddress, StakingError> {
    find_program_address(
        &[
            LOCK_SEED,
            farm.as_ref(),
            &duration.to_le_bytes(),
            &cooldown.to_le_bytes(),
        ],
        program_id,
    )
}

pub fn find_stake_receipt_address(
    program_id: &Pubkey,
    farmer: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramAddress, StakingError> {
    find_program_address(
        &[STAKE_RECEIPT_SEED, farmer.as_ref(), mint.as_ref()],
        program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PROGRAM_ID;

    fn key(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    // -- Generic derivation -------------------------------------------------

    #[test]
    fn derived_address_is_off_curve() {
        let pda = find_program_address(&[b"seed"], &PROGRAM_ID).unwrap();
        assert!(!is_on_curve(pda.address.as_bytes()));
    }

    #[test]
    fn create_with_found_bump_matches() {
        let found = find_program_address(&[b"farm", &[1; 32]], &PROGRAM_ID).unwrap();
        let created =
            create_program_address(&[b"farm", &[1; 32], &[found.bump]], &PROGRAM_ID).unwrap();
        assert_eq!(created, found.address);
    }

    #[test]
    fn basepoint_is_on_curve() {
        let mut basepoint = [0x66u8; 32];
        basepoint[0] = 0x58;
        assert!(is_on_curve(&basepoint));
    }

    #[test]
    fn too_many_seeds_rejected() {
        let seeds = vec![b"x".as_slice(); MAX_SEEDS];
        let err = find_program_address(&seeds, &PROGRAM_ID).unwrap_err();
        assert!(matches!(err, StakingError::TooManySeeds(17)));
    }

    #[test]
    fn long_seed_rejected() {
        let long = [0u8; 33];
        let err = find_program_address(&[b"ok", &long], &PROGRAM_ID).unwrap_err();
        assert!(matches!(err, StakingError::SeedTooLong { index: 1, len: 33 }));
    }

    // -- Staking program addresses ------------------------------------------

    #[test]
    fn farm_address_known_vector() {
        let farm = find_farm_address(&PROGRAM_ID, &key(1), &key(2)).unwrap();
        assert_eq!(
            farm.address.to_string(),
            "6rDAtatfh3C9pFUhgRBHiGvr61NR3WjnbJ8CA2C27eWp"
        );
        assert_eq!(farm.bump, 251);
    }

    #[test]
    fn farmer_address_is_deterministic() {
        let farm = key(1);
        let first = find_farmer_address(&PROGRAM_ID, &farm, &key(3)).unwrap();
        let second = find_farmer_address(&PROGRAM_ID, &farm, &key(3)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.address.to_string(),
            "HkurNwxiwDVZzpMX11p4t4ErUYuQQZYyGZAUqUHkwSeU"
        );
    }

    #[test]
    fn farmer_address_depends_on_owner() {
        let farm = key(1);
        let a = find_farmer_address(&PROGRAM_ID, &farm, &key(3)).unwrap();
        let b = find_farmer_address(&PROGRAM_ID, &farm, &key(4)).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn lock_address_depends_on_term() {
        let farm = key(9);
        let base = find_lock_address(&PROGRAM_ID, &farm, 86_400, 0).unwrap();
        let longer = find_lock_address(&PROGRAM_ID, &farm, 172_800, 0).unwrap();
        let cooled = find_lock_address(&PROGRAM_ID, &farm, 86_400, 3_600).unwrap();
        assert_ne!(base.address, longer.address);
        assert_ne!(base.address, cooled.address);
    }

    #[test]
    fn relationship_tags_keep_addresses_apart() {
        let (a, b) = (key(5), key(6));
        let farmer = find_farmer_address(&PROGRAM_ID, &a, &b).unwrap();
        let manager = find_farm_manager_address(&PROGRAM_ID, &a, &b).unwrap();
        let proof = find_whitelist_proof_address(&PROGRAM_ID, &a, &b).unwrap();
        let receipt = find_stake_receipt_address(&PROGRAM_ID, &a, &b).unwrap();
        let all = [farmer.address, manager.address, proof.address, receipt.address];
        for (i, x) in all.iter().enumerate() {
            for y in &all[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn program_id_changes_address() {
        let a = find_farmer_address(&PROGRAM_ID, &key(1), &key(2)).unwrap();
        let b = find_farmer_address(&key(7), &key(1), &key(2)).unwrap();
        assert_ne!(a.address, b.address);
    }
}
