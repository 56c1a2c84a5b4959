//! End-to-end tests driving the client facade against in-memory ledger and
//! metadata doubles: derive -> fetch -> build -> sign -> submit.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ed25519_dalek::SigningKey;

use staking_client::instructions::STAKE;
use staking_client::pda;
use staking_client::spl_token::{derive_associated_token_address, find_metadata_address};
use staking_client::*;

// ─── Doubles ───────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryLedger {
    accounts: Mutex<HashMap<Pubkey, AccountInfo>>,
    submitted: Mutex<Vec<Vec<u8>>>,
    submit_error: Option<String>,
}

impl MemoryLedger {
    fn failing(message: &str) -> Self {
        Self {
            submit_error: Some(message.into()),
            ..Self::default()
        }
    }

    fn put(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(
            address,
            AccountInfo {
                owner,
                lamports: 1_000_000,
                data,
            },
        );
    }

    fn put_record<T: AccountSchema>(&self, address: Pubkey, record: &T) {
        self.put(address, PROGRAM_ID, record.encode_account().unwrap());
    }
}

#[async_trait]
impl RpcClient for MemoryLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<AccountInfo>, RpcError> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<AccountInfo>>, RpcError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(addresses.iter().map(|a| accounts.get(a).cloned()).collect())
    }

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError> {
        Ok([0x11; 32])
    }

    async fn send_and_confirm_transaction(&self, transaction: &[u8]) -> Result<String, RpcError> {
        if let Some(message) = &self.submit_error {
            return Err(RpcError::new(message.clone()));
        }
        self.submitted.lock().unwrap().push(transaction.to_vec());
        // The first signature identifies the transaction.
        Ok(bs58::encode(&transaction[1..65]).into_string())
    }

    async fn get_program_accounts(
        &self,
        program: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<KeyedAccount>, RpcError> {
        let accounts = self.accounts.lock().unwrap();
        let mut found: Vec<KeyedAccount> = accounts
            .iter()
            .filter(|(_, info)| info.owner == *program)
            .filter(|(_, info)| filters.iter().all(|f| f.matches(&info.data)))
            .map(|(address, info)| KeyedAccount {
                address: *address,
                account: info.clone(),
            })
            .collect();
        found.sort_by_key(|k| k.address);
        Ok(found)
    }
}

#[derive(Default)]
struct MemoryMetadata {
    creators: HashMap<Pubkey, FoundCreator>,
}

#[async_trait]
impl MetadataResolver for MemoryMetadata {
    async fn find_creator(&self, mint: &Pubkey) -> Result<Option<FoundCreator>, RpcError> {
        Ok(self.creators.get(mint).copied())
    }
}

// ─── Fixtures ──────────────────────────────────────────────────────

fn key(byte: u8) -> Pubkey {
    Pubkey::new_from_array([byte; 32])
}

const AUTHORITY: u8 = 1;
const REWARD_MINT: u8 = 2;
const OWNER: u8 = 3;
const NFT_MINT: u8 = 4;
const CREATOR: u8 = 5;
const NFT_METADATA: u8 = 6;
const TOKEN_MINT: u8 = 7;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_config(&ClientConfig::default())
}

fn farm_address() -> Pubkey {
    pda::find_farm_address(&PROGRAM_ID, &key(AUTHORITY), &key(REWARD_MINT))
        .unwrap()
        .address
}

fn farmer_address() -> Pubkey {
    pda::find_farmer_address(&PROGRAM_ID, &farm_address(), &key(OWNER))
        .unwrap()
        .address
}

fn seeded_ledger() -> MemoryLedger {
    let ledger = MemoryLedger::default();
    ledger.put_record(
        farm_address(),
        &Farm {
            authority: key(AUTHORITY),
            reward: Reward {
                mint: key(REWARD_MINT),
                reserved: 0u64,
                available: 10_000,
            },
            bump: [255],
        },
    );
    ledger
}

fn nft_metadata() -> MemoryMetadata {
    let mut creators = HashMap::new();
    creators.insert(
        key(NFT_MINT),
        FoundCreator {
            metadata_address: key(NFT_METADATA),
            creator_address: key(CREATOR),
        },
    );
    MemoryMetadata { creators }
}

fn stake_request(mint: Pubkey) -> StakeRequest {
    StakeRequest {
        farm: farm_address(),
        owner: key(OWNER),
        mint,
        lock: key(40),
        amount: 1,
        trip_effect: TripEffect::Nirvana,
    }
}

// ─── Construction ──────────────────────────────────────────────────

#[test]
fn v1_registry_has_no_facade() {
    let registry = SchemaRegistry::new(PROGRAM_ID, ProgramVersion::V1);
    let ledger = MemoryLedger::default();
    let metadata = MemoryMetadata::default();
    let result = StakingClient::<_, _>::new(&registry, &ledger, &metadata);
    assert!(matches!(
        result,
        Err(StakingError::UnsupportedVersion(ProgramVersion::V1))
    ));
}

#[test]
fn create_farm_adds_authority_as_manager() {
    let registry = registry();
    let (ledger, metadata) = (MemoryLedger::default(), MemoryMetadata::default());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let ixs = client.create_farm(&key(AUTHORITY), &key(REWARD_MINT)).unwrap();
    assert_eq!(ixs.len(), 2);
    assert_eq!(ixs[0].accounts[0].pubkey, farm_address());
    assert_eq!(
        ixs[0].accounts[2].pubkey,
        derive_associated_token_address(&farm_address(), &key(REWARD_MINT)).unwrap()
    );

    let manager = pda::find_farm_manager_address(&PROGRAM_ID, &farm_address(), &key(AUTHORITY))
        .unwrap()
        .address;
    assert_eq!(ixs[1].accounts[1].pubkey, manager);
    assert_eq!(ixs[1].accounts[2].pubkey, key(AUTHORITY));
}

// ─── Scenario A: decode a fetched farm ─────────────────────────────

#[tokio::test]
async fn fetched_farm_exposes_authority_and_mint() {
    let ledger = seeded_ledger();
    let farm: Farm = registry()
        .fetch(&ledger, &farm_address())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(farm.authority, key(AUTHORITY));
    assert_eq!(farm.reward.mint, key(REWARD_MINT));
}

#[tokio::test]
async fn missing_account_is_none_and_foreign_owner_fails() {
    let ledger = MemoryLedger::default();
    let missing: Option<Farm> = registry().fetch(&ledger, &key(90)).await.unwrap();
    assert!(missing.is_none());

    ledger.put(key(91), key(92), vec![0; 16]);
    let err = registry()
        .fetch::<Farm, _>(&ledger, &key(91))
        .await
        .unwrap_err();
    assert!(matches!(err, StakingError::OwnerMismatch { .. }));
}

#[tokio::test]
async fn fetch_multiple_keeps_slots_independent() {
    let ledger = seeded_ledger();
    ledger.put(key(80), PROGRAM_ID, vec![0xAB; 40]);
    ledger.put(key(81), key(99), vec![]);

    let slots = registry()
        .fetch_multiple::<Farm, _>(&ledger, &[key(80), farm_address(), key(82), key(81)])
        .await
        .unwrap();

    assert_eq!(slots.len(), 4);
    assert!(matches!(
        slots[0],
        Err(StakingError::DiscriminatorMismatch { .. })
    ));
    assert_eq!(
        slots[1].as_ref().unwrap().as_ref().unwrap().authority,
        key(AUTHORITY)
    );
    assert!(matches!(slots[2], Ok(None)));
    assert!(matches!(slots[3], Err(StakingError::OwnerMismatch { .. })));
}

// ─── Program scans ─────────────────────────────────────────────────

#[tokio::test]
async fn farm_locks_are_found_by_farm() {
    let ledger = seeded_ledger();
    let farm = farm_address();
    for (i, duration) in [0u64, 86_400].into_iter().enumerate() {
        ledger.put_record(
            key(60 + i as u8),
            &Lock {
                farm,
                duration,
                cooldown: 0,
                bonus_factor: i as u8,
            },
        );
    }
    ledger.put_record(
        key(62),
        &Lock {
            farm: key(99),
            duration: 1,
            cooldown: 1,
            bonus_factor: 0,
        },
    );

    let locks = registry().find_farm_locks(&ledger, &farm).await.unwrap();
    assert_eq!(locks.len(), 2);
    assert!(locks.iter().all(|l| l.account.farm == farm));
}

#[tokio::test]
async fn active_receipts_exclude_ended_ones() {
    let ledger = MemoryLedger::default();
    let farmer = farmer_address();
    let receipt = |end_ts| StakeReceipt {
        farmer,
        mint: key(NFT_MINT),
        lock: key(40),
        start_ts: 100,
        end_ts,
        amount: 1,
        reward_rate: 10u64,
        buff: None,
    };
    ledger.put_record(key(70), &receipt(None));
    ledger.put_record(key(71), &receipt(Some(200)));

    let registry = registry();
    let all = registry
        .find_farmer_stake_receipts::<u64, _>(&ledger, &farmer)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let active = registry
        .find_active_stake_receipts::<u64, _>(&ledger)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].address, key(70));
    assert_eq!(active[0].account.state(), StakeReceiptState::Active);
}

#[tokio::test]
async fn v1_registry_refuses_v2_records() {
    let registry = SchemaRegistry::new(PROGRAM_ID, ProgramVersion::V1);
    let ledger = MemoryLedger::default();
    let err = registry
        .find_all_stake_receipts::<u64, _>(&ledger)
        .await
        .unwrap_err();
    assert!(matches!(err, StakingError::UnsupportedSchema { .. }));

    let legacy: Vec<Keyed<LegacyStakeReceipt>> = registry
        .find_program_accounts(&ledger, Vec::new())
        .await
        .unwrap();
    assert!(legacy.is_empty());
}

// ─── Staking ───────────────────────────────────────────────────────

#[tokio::test]
async fn fungible_stake_uses_mint_whitelist() {
    let registry = registry();
    let (ledger, metadata) = (seeded_ledger(), nft_metadata());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let ix = client.stake(&stake_request(key(TOKEN_MINT))).await.unwrap();
    assert_eq!(ix.accounts.len(), 14);

    let proof = pda::find_whitelist_proof_address(&PROGRAM_ID, &farm_address(), &key(TOKEN_MINT))
        .unwrap()
        .address;
    assert_eq!(ix.accounts[2].pubkey, proof);
    assert_eq!(
        ix.accounts[4].pubkey,
        find_metadata_address(&key(TOKEN_MINT)).unwrap()
    );
    assert_eq!(&ix.data[..8], &STAKE);
    assert_eq!(ix.data[16], TripEffect::Nirvana.level());
}

#[tokio::test]
async fn nft_stake_uses_creator_and_appends_metadata() {
    let registry = registry();
    let (ledger, metadata) = (seeded_ledger(), nft_metadata());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let ix = client.stake(&stake_request(key(NFT_MINT))).await.unwrap();
    assert_eq!(ix.accounts.len(), 15);

    let proof = pda::find_whitelist_proof_address(&PROGRAM_ID, &farm_address(), &key(CREATOR))
        .unwrap()
        .address;
    assert_eq!(ix.accounts[2].pubkey, proof);
    assert_eq!(ix.accounts[14], AccountMeta::readonly(key(NFT_METADATA)));

    let receipt = pda::find_stake_receipt_address(&PROGRAM_ID, &farmer_address(), &key(NFT_MINT))
        .unwrap()
        .address;
    assert_eq!(ix.accounts[7].pubkey, receipt);
}

#[tokio::test]
async fn stake_many_preserves_request_order() {
    let registry = registry();
    let (ledger, metadata) = (seeded_ledger(), nft_metadata());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let requests = [
        stake_request(key(TOKEN_MINT)),
        stake_request(key(NFT_MINT)),
        stake_request(key(8)),
    ];
    let ixs = client.stake_many(&requests).await.unwrap();
    let mints: Vec<Pubkey> = ixs.iter().map(|ix| ix.accounts[3].pubkey).collect();
    assert_eq!(mints, vec![key(TOKEN_MINT), key(NFT_MINT), key(8)]);
    assert_eq!(ixs[1].accounts.len(), 15);
}

#[tokio::test]
async fn unstake_reads_lock_from_receipt() {
    let registry = registry();
    let (ledger, metadata) = (seeded_ledger(), nft_metadata());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let farmer = farmer_address();
    let receipt_address = pda::find_stake_receipt_address(&PROGRAM_ID, &farmer, &key(TOKEN_MINT))
        .unwrap()
        .address;

    let err = client
        .unstake(&farm_address(), &key(OWNER), &key(TOKEN_MINT))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StakingError::AccountNotFound {
            account: "StakeReceipt",
            ..
        }
    ));

    ledger.put_record(
        receipt_address,
        &StakeReceipt {
            farmer,
            mint: key(TOKEN_MINT),
            lock: key(41),
            start_ts: 1,
            end_ts: None,
            amount: 500,
            reward_rate: 2u64,
            buff: None,
        },
    );
    let ix = client
        .unstake(&farm_address(), &key(OWNER), &key(TOKEN_MINT))
        .await
        .unwrap();
    assert_eq!(ix.accounts.len(), 10);
    assert_eq!(ix.accounts[4].pubkey, receipt_address);
    assert_eq!(ix.accounts[5].pubkey, key(41));
}

// ─── Rewards and administration ────────────────────────────────────

#[tokio::test]
async fn rewards_resolve_mint_from_farm() {
    let registry = registry();
    let (ledger, metadata) = (seeded_ledger(), MemoryMetadata::default());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();
    let farm = farm_address();

    let claim = client.claim_rewards(&farm, &key(OWNER)).await.unwrap();
    assert_eq!(claim.accounts[2].pubkey, key(REWARD_MINT));
    assert_eq!(
        claim.accounts[4].pubkey,
        derive_associated_token_address(&key(OWNER), &key(REWARD_MINT)).unwrap()
    );

    let fund = client
        .fund_reward(&farm, &key(AUTHORITY), 5_000)
        .await
        .unwrap();
    assert_eq!(fund.accounts[2].pubkey, key(REWARD_MINT));
    assert_eq!(&fund.data[8..], &5_000u64.to_le_bytes());

    let err = client.claim_rewards(&key(98), &key(OWNER)).await.unwrap_err();
    assert!(matches!(err, StakingError::AccountNotFound { account: "Farm", .. }));
}

#[test]
fn create_locks_derives_one_lock_per_config() {
    let registry = registry();
    let (ledger, metadata) = (MemoryLedger::default(), MemoryMetadata::default());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();
    let farm = farm_address();

    let configs: Vec<LockConfig> = [0u64, 7, 14, 30]
        .iter()
        .map(|days| LockConfig {
            duration: days * 86_400,
            bonus_factor: *days as u8,
            cooldown: 3_600,
        })
        .collect();
    let ix = client.create_locks(&farm, &key(AUTHORITY), &configs).unwrap();

    assert_eq!(ix.accounts.len(), 4 + 4);
    for (meta, config) in ix.accounts[4..].iter().zip(&configs) {
        let expected = pda::find_lock_address(&PROGRAM_ID, &farm, config.duration, config.cooldown)
            .unwrap()
            .address;
        assert_eq!(meta.pubkey, expected);
        assert!(meta.is_writable && !meta.is_signer);
    }
}

#[test]
fn whitelist_rate_is_amount_per_second() {
    let registry = registry();
    let (ledger, metadata) = (MemoryLedger::default(), MemoryMetadata::default());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let rate = RewardRate {
        token_amount: 86_400u64,
        interval_secs: 86_400,
    };
    let ix = client
        .add_to_whitelist(&farm_address(), &key(AUTHORITY), &key(CREATOR), rate, WhitelistType::Creator)
        .unwrap();
    assert_eq!(&ix.data[8..16], &1u64.to_le_bytes());
    assert_eq!(ix.data[16], 0);

    let err = client
        .add_to_whitelist(
            &farm_address(),
            &key(AUTHORITY),
            &key(CREATOR),
            RewardRate {
                token_amount: 1,
                interval_secs: 0,
            },
            WhitelistType::Creator,
        )
        .unwrap_err();
    assert!(matches!(err, StakingError::InvalidArgument(_)));
}

#[test]
fn float_client_encodes_float_rates() {
    let registry = registry();
    let (ledger, metadata) = (MemoryLedger::default(), MemoryMetadata::default());
    let client: StakingClient<_, _, f64> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let ix = client
        .add_to_whitelist(
            &farm_address(),
            &key(AUTHORITY),
            &key(TOKEN_MINT),
            RewardRate {
                token_amount: 1.0,
                interval_secs: 8,
            },
            WhitelistType::Mint,
        )
        .unwrap();
    assert_eq!(&ix.data[8..16], &0.125f64.to_le_bytes());
}

// ─── Buffs ─────────────────────────────────────────────────────────

#[tokio::test]
async fn buff_requires_verified_creator() {
    let registry = registry();
    let (ledger, metadata) = (seeded_ledger(), nft_metadata());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();
    let pair = [key(20), key(21)];

    let err = client
        .buff_pair(&farm_address(), &key(OWNER), &key(TOKEN_MINT), pair)
        .await
        .unwrap_err();
    assert!(matches!(err, StakingError::MissingCreator(m) if m == key(TOKEN_MINT)));

    let ix = client
        .buff_pair(&farm_address(), &key(OWNER), &key(NFT_MINT), pair)
        .await
        .unwrap();
    let farmer = farmer_address();
    let receipt_a = pda::find_stake_receipt_address(&PROGRAM_ID, &farmer, &key(20))
        .unwrap()
        .address;
    assert_eq!(ix.accounts[7].pubkey, receipt_a);
    assert_eq!(ix.accounts.last().unwrap().pubkey, key(NFT_METADATA));

    let debuff = client
        .debuff_pair(&farm_address(), &key(OWNER), &key(NFT_MINT), pair)
        .unwrap();
    assert_eq!(debuff.accounts[6].pubkey, receipt_a);
}

// ─── Submission ────────────────────────────────────────────────────

#[tokio::test]
async fn send_signs_and_submits() {
    let registry = registry();
    let (ledger, metadata) = (seeded_ledger(), MemoryMetadata::default());
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let owner_key = SigningKey::generate(&mut rand::rngs::OsRng);
    let owner = Pubkey::new_from_array(owner_key.verifying_key().to_bytes());
    let ix = client.initialize_farmer(&farm_address(), &owner).unwrap();

    let signature = client.send(&[ix], &owner_key, &[]).await.unwrap();

    let submitted = ledger.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let wire = &submitted[0];
    assert_eq!(wire[0], 1);
    assert_eq!(signature, bs58::encode(&wire[1..65]).into_string());
    // Message starts with the header, the payer is the first account key.
    assert_eq!(&wire[65..68], &[1, 0, 3]);
    assert_eq!(&wire[69..101], owner.as_bytes());
}

#[tokio::test]
async fn send_translates_program_errors() {
    let registry = registry();
    let ledger = MemoryLedger::failing(
        "Transaction simulation failed: Error processing Instruction 0: custom program error: 0x1770",
    );
    let metadata = MemoryMetadata::default();
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let payer = SigningKey::from_bytes(&[7; 32]);
    let owner = Pubkey::new_from_array(payer.verifying_key().to_bytes());
    let ix = client.initialize_farmer(&farm_address(), &owner).unwrap();

    let err = client.send(&[ix], &payer, &[]).await.unwrap_err();
    match err {
        StakingError::Program(e) => {
            assert_eq!(e.kind, ProgramErrorKind::Custom(CustomError::CooldownIsNotOver))
        }
        other => panic!("expected a program error, got {other:?}"),
    }
}

#[tokio::test]
async fn send_passes_through_unrelated_failures() {
    let registry = registry();
    let ledger = MemoryLedger::failing("blockhash not found");
    let metadata = MemoryMetadata::default();
    let client: StakingClient<_, _> = StakingClient::new(&registry, &ledger, &metadata).unwrap();

    let payer = SigningKey::from_bytes(&[7; 32]);
    let owner = Pubkey::new_from_array(payer.verifying_key().to_bytes());
    let ix = client.initialize_farmer(&farm_address(), &owner).unwrap();

    let err = client.send(&[ix], &payer, &[]).await.unwrap_err();
    assert!(matches!(err, StakingError::Rpc(e) if e.message == "blockhash not found"));
}
