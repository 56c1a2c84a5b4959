//! Value types embedded in account records and instruction arguments.

use std::fmt::Debug;

use layout_codec::{impl_struct_layout, Layout, LayoutError, Reader, Writer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::Pubkey;
use crate::error::StakingError;

// ---------------------------------------------------------------------------
// Reward amounts
// ---------------------------------------------------------------------------

/// Representation of reward amounts and per-second rates.
///
/// Program builds disagree on whether these are `u64` base units or `f64`.
/// The two are separate schema variants: an account written by one build
/// must be decoded with the matching width, never converted.
pub trait RewardAmount:
    Layout + Copy + PartialEq + PartialOrd + Debug + Default + Send + Sync + 'static
{
    /// Per-second rate paying `token_amount` over `interval_secs`.
    fn rate_per_second(token_amount: Self, interval_secs: u64) -> Result<Self, StakingError>;

    fn serialize_json<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;

    fn deserialize_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>;
}

impl RewardAmount for u64 {
    /// Integer division: the remainder is never paid out.
    fn rate_per_second(token_amount: u64, interval_secs: u64) -> Result<u64, StakingError> {
        token_amount
            .checked_div(interval_secs)
            .ok_or_else(|| StakingError::InvalidArgument("reward interval must be > 0".into()))
    }

    fn serialize_json<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::json::u64_string::serialize(self, serializer)
    }

    fn deserialize_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        crate::json::u64_string::deserialize(deserializer)
    }
}

impl RewardAmount for f64 {
    fn rate_per_second(token_amount: f64, interval_secs: u64) -> Result<f64, StakingError> {
        if interval_secs == 0 {
            return Err(StakingError::InvalidArgument(
                "reward interval must be > 0".into(),
            ));
        }
        Ok(token_amount / interval_secs as f64)
    }

    fn serialize_json<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*self)
    }

    fn deserialize_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}

// ---------------------------------------------------------------------------
// Embedded records
// ---------------------------------------------------------------------------

/// Reward pool of a farm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Reward<N: RewardAmount = u64> {
    pub mint: Pubkey,
    /// Promised to active stakes, not yet paid.
    #[serde(with = "crate::json::amount")]
    pub reserved: N,
    /// Funded and still free to reserve.
    #[serde(with = "crate::json::amount")]
    pub available: N,
}

impl_struct_layout!(Reward<N: RewardAmount> {
    mint: Pubkey,
    reserved: N,
    available: N,
});

/// Multiplier applied to a stake by a paired buff asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buff {
    pub key: Pubkey,
    #[serde(with = "crate::json::u64_string")]
    pub factor: u64,
}

impl_struct_layout!(Buff {
    key: Pubkey,
    factor: u64,
});

/// Staking term, passed when creating lock accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockConfig {
    /// Seconds a stake stays locked.
    #[serde(with = "crate::json::u64_string")]
    pub duration: u64,
    /// Percentage points added to the reward rate. 0 means no bonus.
    pub bonus_factor: u8,
    /// Seconds to wait after unlocking before unstaking.
    #[serde(with = "crate::json::u64_string")]
    pub cooldown: u64,
}

impl_struct_layout!(LockConfig {
    duration: u64,
    bonus_factor: u8,
    cooldown: u64,
});

/// What a whitelist proof admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WhitelistType {
    /// NFTs whose verified creator is the whitelisted address.
    Creator,
    /// Fungible tokens of the whitelisted mint.
    Mint,
    /// NFTs of the whitelisted creator usable as buffs.
    Buff,
}

impl WhitelistType {
    const VARIANTS: u8 = 3;

    fn index(self) -> u8 {
        match self {
            WhitelistType::Creator => 0,
            WhitelistType::Mint => 1,
            WhitelistType::Buff => 2,
        }
    }
}

impl Layout for WhitelistType {
    const SPAN: Option<usize> = Some(1);

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError> {
        Ok(match reader.read_variant(Self::VARIANTS)? {
            0 => WhitelistType::Creator,
            1 => WhitelistType::Mint,
            _ => WhitelistType::Buff,
        })
    }

    fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError> {
        writer.write_u8(self.index())
    }
}

// ---------------------------------------------------------------------------
// Trip effects
// ---------------------------------------------------------------------------

/// Visual trait of a staked NFT. Each effect maps to the `level` argument of
/// the stake instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripEffect {
    #[default]
    None,
    Drip,
    Groovy,
    Geometric,
    Interdimensional,
    #[serde(rename = "2x")]
    Double,
    #[serde(rename = "3x")]
    Triple,
    #[serde(rename = "4x")]
    Quadruple,
    Nirvana,
    Space,
}

impl TripEffect {
    pub fn level(self) -> u8 {
        match self {
            TripEffect::None
            | TripEffect::Drip
            | TripEffect::Groovy
            | TripEffect::Geometric
            | TripEffect::Interdimensional => 0,
            TripEffect::Double => 1,
            TripEffect::Triple => 2,
            TripEffect::Quadruple => 3,
            TripEffect::Nirvana => 4,
            TripEffect::Space => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_codec::encode_to_vec;

    // -- Reward amounts -----------------------------------------------------

    #[test]
    fn integer_rate_truncates() {
        assert_eq!(u64::rate_per_second(1_000, 3).unwrap(), 333);
    }

    #[test]
    fn float_rate_divides_exactly() {
        assert_eq!(f64::rate_per_second(1.0, 4).unwrap(), 0.25);
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(matches!(
            u64::rate_per_second(1, 0),
            Err(StakingError::InvalidArgument(_))
        ));
        assert!(f64::rate_per_second(1.0, 0).is_err());
    }

    // -- Layouts ------------------------------------------------------------

    #[test]
    fn reward_span_depends_on_width() {
        assert_eq!(<Reward<u64> as Layout>::SPAN, Some(48));
        assert_eq!(<Reward<f64> as Layout>::SPAN, Some(48));
    }

    #[test]
    fn float_reward_is_not_integer_reward() {
        let reward = Reward {
            mint: Pubkey::new_from_array([1; 32]),
            reserved: 1.5f64,
            available: 2.0,
        };
        let bytes = encode_to_vec(&reward).unwrap();
        let as_int = Reward::<u64>::decode(&bytes).unwrap();
        assert_eq!(as_int.reserved, 1.5f64.to_bits());
    }

    #[test]
    fn lock_config_field_order() {
        let config = LockConfig {
            duration: 1,
            bonus_factor: 2,
            cooldown: 3,
        };
        let bytes = encode_to_vec(&config).unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(&bytes[..8], &1u64.to_le_bytes());
        assert_eq!(bytes[8], 2);
        assert_eq!(&bytes[9..], &3u64.to_le_bytes());
    }

    #[test]
    fn whitelist_type_tags() {
        assert_eq!(encode_to_vec(&WhitelistType::Creator).unwrap(), [0]);
        assert_eq!(encode_to_vec(&WhitelistType::Mint).unwrap(), [1]);
        assert_eq!(encode_to_vec(&WhitelistType::Buff).unwrap(), [2]);
        assert_eq!(WhitelistType::decode(&[1]).unwrap(), WhitelistType::Mint);
    }

    #[test]
    fn whitelist_type_rejects_unknown_tag() {
        assert_eq!(
            WhitelistType::decode(&[3]).unwrap_err(),
            LayoutError::InvalidVariant { index: 3, count: 3 }
        );
    }

    // -- JSON ---------------------------------------------------------------

    #[test]
    fn whitelist_type_json_is_tagged() {
        let json = serde_json::to_string(&WhitelistType::Buff).unwrap();
        assert_eq!(json, r#"{"kind":"Buff"}"#);
        let back: WhitelistType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WhitelistType::Buff);
    }

    #[test]
    fn reward_amount_json_by_width() {
        let int = Reward {
            mint: Pubkey::default(),
            reserved: 5u64,
            available: 6,
        };
        let float = Reward {
            mint: Pubkey::default(),
            reserved: 0.5f64,
            available: 6.0,
        };
        let int_json = serde_json::to_value(int).unwrap();
        let float_json = serde_json::to_value(float).unwrap();
        assert_eq!(int_json["reserved"], "5");
        assert_eq!(float_json["reserved"], 0.5);
        assert_eq!(serde_json::from_value::<Reward>(int_json).unwrap(), int);
    }

    // -- Trip effects -------------------------------------------------------

    #[test]
    fn trip_effect_levels() {
        assert_eq!(TripEffect::None.level(), 0);
        assert_eq!(TripEffect::Interdimensional.level(), 0);
        assert_eq!(TripEffect::Double.level(), 1);
        assert_eq!(TripEffect::Quadruple.level(), 3);
        assert_eq!(TripEffect::Space.level(), 5);
    }

    #[test]
    fn trip_effect_names() {
        let effect: TripEffect = serde_json::from_str("\"3x\"").unwrap();
        assert_eq!(effect, TripEffect::Triple);
        assert_eq!(serde_json::to_string(&TripEffect::Nirvana).unwrap(), "\"Nirvana\"");
    }
}
