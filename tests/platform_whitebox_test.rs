// Endpoint-level tests: the contract runs inside a scenario world with real
// ESDT balances, the local mint role and a controllable block clock.

use multiversx_sc_scenario::imports::*;

use besio_platform::constants::{
    CLAIM_REWARDS_PERIOD, CORE_TOKEN_UNIT, DEFAULT_MAX_RAM_SIZE, RAM_TRADE_BASIS_FEE_BPS,
    RAM_TRADE_MAX_FEE_BPS, REFUND_DELAY, SECONDS_PER_DAY,
};
use besio_platform::delegate_bandwidth::ResourceModule;
use besio_platform::emission::split_emission;
use besio_platform::ram_curve::RamExchange;
use besio_platform::ram_market::RamMarketModule;
use besio_platform::rewards::RewardsModule;
use besio_platform::storage::StorageModule;
use besio_platform::types::{GlobalState, Pool};
use besio_platform::voting::VotingModule;
use besio_platform::PlatformContract;

type Platform = besio_platform::ContractObj<DebugApi>;

const CODE_PATH: MxscPath = MxscPath::new("output/besio-platform.mxsc.json");
const PLATFORM: TestSCAddress = TestSCAddress::new("besio-platform");
const CORE: TestTokenIdentifier = TestTokenIdentifier::new("CORE-a1b2c3");

const OWNER: TestAddress = TestAddress::new("owner");
const ALICE: TestAddress = TestAddress::new("alice");
const BOB: TestAddress = TestAddress::new("bob");
const PRODUCER_A: TestAddress = TestAddress::new("producer-a");
const PRODUCER_B: TestAddress = TestAddress::new("producer-b");
const PRODUCER_C: TestAddress = TestAddress::new("producer-c");
const PRODUCER_D: TestAddress = TestAddress::new("producer-d");

const T0: u64 = 1_700_000_000;
const U: u64 = CORE_TOKEN_UNIT;
const MAX_SUPPLY: u64 = 10_000_000 * U;
/// 15% of the maximum supply.
const ACTIVATION_VOTES: u64 = 1_500_000 * U;
const RAM_TOKEN_RESERVE: u64 = 1_000_000 * U;
const INITIAL_BALANCE: u64 = 5_000_000 * U;

fn setup() -> ScenarioWorld {
    let mut world = ScenarioWorld::new();
    world.register_contract(CODE_PATH, besio_platform::ContractBuilder);

    world.account(OWNER).nonce(1);
    for account in [ALICE, BOB, PRODUCER_A, PRODUCER_B, PRODUCER_C, PRODUCER_D] {
        world
            .account(account)
            .nonce(1)
            .esdt_balance(CORE, INITIAL_BALANCE);
    }
    world.current_block().block_timestamp(T0);

    world
        .tx()
        .from(OWNER)
        .raw_deploy()
        .code(CODE_PATH)
        .new_address(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.init(CORE.to_token_identifier(), MAX_SUPPLY, MAX_SUPPLY, RAM_TOKEN_RESERVE);
        });
    world.set_esdt_local_roles(PLATFORM, CORE.as_bytes(), &[EsdtLocalRole::Mint]);

    world
}

fn set_time(world: &mut ScenarioWorld, timestamp: u64) {
    world.current_block().block_timestamp(timestamp);
}

/// Reads plain values out of contract storage.
fn read<T: Default>(world: &mut ScenarioWorld, reader: impl FnOnce(&Platform) -> T) -> T {
    let mut value = T::default();
    world
        .query()
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            value = reader(&sc);
        });
    value
}

fn delegate(world: &mut ScenarioWorld, from: TestAddress, receiver: TestAddress, net: u64, cpu: u64, transfer: bool) {
    world
        .tx()
        .from(from)
        .to(PLATFORM)
        .esdt(TestEsdtTransfer(CORE, 0, net + cpu))
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.delegatebw(receiver.to_managed_address(), net, cpu, transfer);
        });
}

fn undelegate(world: &mut ScenarioWorld, from: TestAddress, receiver: TestAddress, net: u64, cpu: u64) {
    world
        .tx()
        .from(from)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.undelegatebw(receiver.to_managed_address(), net, cpu);
        });
}

fn register(world: &mut ScenarioWorld, producer: TestAddress, commission_rate: u32) {
    world
        .tx()
        .from(producer)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.regproducer(
                ManagedBuffer::from("block-signing-key"),
                ManagedBuffer::from("https://producer.example"),
                1,
                commission_rate,
            );
        });
}

fn vote(world: &mut ScenarioWorld, voter: TestAddress, producer: TestAddress, vote_num: u64) {
    world
        .tx()
        .from(voter)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.voteproducer(producer.to_managed_address(), vote_num);
        });
}

fn on_block(world: &mut ScenarioWorld, slot: u32, producer: TestAddress) {
    world
        .tx()
        .from(OWNER)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.onblock(slot, producer.to_managed_address());
        });
}

fn buy_ram(world: &mut ScenarioWorld, payer: TestAddress, receiver: TestAddress, quant: u64) {
    world
        .tx()
        .from(payer)
        .to(PLATFORM)
        .esdt(TestEsdtTransfer(CORE, 0, quant))
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.buyram(receiver.to_managed_address());
        });
}

/// (net, cpu) summed over every delegation row paid by `from`.
fn delegated_by(sc: &Platform, from: TestAddress) -> (u64, u64) {
    let from = from.to_managed_address();
    let mut totals = (0, 0);
    for to in sc.delegated_to(&from).iter() {
        let row = sc.delegated_bandwidth(&from, &to).get();
        totals.0 += row.net_weight;
        totals.1 += row.cpu_weight;
    }
    totals
}

fn user_weights(sc: &Platform, owner: TestAddress) -> (u64, u64) {
    let mapper = sc.user_resources(&owner.to_managed_address());
    if mapper.is_empty() {
        return (0, 0);
    }
    let res = mapper.get();
    (res.net_weight, res.cpu_weight)
}

fn ram_bytes(sc: &Platform, owner: TestAddress) -> u64 {
    let mapper = sc.user_resources(&owner.to_managed_address());
    if mapper.is_empty() {
        0
    } else {
        mapper.get().ram_bytes
    }
}

/// The caller's stake activates the chain through votes on `producer`.
fn activate(world: &mut ScenarioWorld, voter: TestAddress, producer: TestAddress) {
    delegate(world, voter, voter, ACTIVATION_VOTES / 2, ACTIVATION_VOTES / 2, false);
    register(world, producer, 5_000);
    vote(world, voter, producer, ACTIVATION_VOTES);
}

// ============================================================
// Resource ledger
// ============================================================

#[test]
fn test_delegation_rows_match_user_totals() {
    let mut world = setup();

    delegate(&mut world, ALICE, ALICE, 30 * U, 20 * U, false);
    delegate(&mut world, ALICE, BOB, 10 * U, 5 * U, false);
    delegate(&mut world, ALICE, BOB, 4 * U, 0, true);

    let (alice_rows, bob_rows, alice_totals, bob_totals, stake_pool) = read(&mut world, |sc| {
        (
            delegated_by(sc, ALICE),
            delegated_by(sc, BOB),
            user_weights(sc, ALICE),
            user_weights(sc, BOB),
            sc.pool_balance(Pool::Stake).get(),
        )
    });

    // The transferred stake is owned by BOB.
    assert_eq!(alice_rows, (40 * U, 25 * U));
    assert_eq!(bob_rows, (4 * U, 0));
    assert_eq!(alice_totals, (30 * U, 20 * U));
    assert_eq!(bob_totals, (14 * U, 5 * U));
    assert_eq!(
        alice_rows.0 + alice_rows.1 + bob_rows.0 + bob_rows.1,
        alice_totals.0 + alice_totals.1 + bob_totals.0 + bob_totals.1
    );
    assert_eq!(stake_pool, 69 * U);
    world
        .check_account(ALICE)
        .esdt_balance(CORE, INITIAL_BALANCE - 69 * U);

    // Undelegation moves stake out of the rows and into a refund, not out of the pool.
    activate(&mut world, BOB, PRODUCER_A);
    undelegate(&mut world, ALICE, BOB, 10 * U, 5 * U);

    let (alice_rows, bob_totals, refund, stake_pool) = read(&mut world, |sc| {
        let refund = sc.refunds(&ALICE.to_managed_address()).get();
        (
            delegated_by(sc, ALICE),
            user_weights(sc, BOB),
            (refund.net_amount, refund.cpu_amount),
            sc.pool_balance(Pool::Stake).get(),
        )
    });
    assert_eq!(alice_rows, (30 * U, 20 * U));
    assert_eq!(bob_totals, (ACTIVATION_VOTES / 2 + 4 * U, ACTIVATION_VOTES / 2));
    assert_eq!(refund, (10 * U, 5 * U));
    assert_eq!(stake_pool, 69 * U + ACTIVATION_VOTES);
}

#[test]
fn test_transfer_to_self_is_rejected() {
    let mut world = setup();

    world
        .tx()
        .from(ALICE)
        .to(PLATFORM)
        .esdt(TestEsdtTransfer(CORE, 0, 10 * U))
        .returns(ExpectError(4, "cannot use transfer flag if delegating to self"))
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.delegatebw(ALICE.to_managed_address(), 5 * U, 5 * U, true);
        });
}

#[test]
fn test_payment_above_asset_range_is_rejected() {
    let mut world = setup();
    let whale = TestAddress::new("whale");
    world.account(whale).nonce(1).esdt_balance(CORE, 1u64 << 63);

    world
        .tx()
        .from(whale)
        .to(PLATFORM)
        .esdt(TestEsdtTransfer(CORE, 0, 1u64 << 63))
        .returns(ExpectError(4, "payment amount is too large"))
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.buyram(ALICE.to_managed_address());
        });
}

#[test]
fn test_repeated_undelegation_keeps_one_refund_task() {
    let mut world = setup();
    delegate(&mut world, ALICE, ALICE, 60 * U, 40 * U, false);
    activate(&mut world, BOB, PRODUCER_A);

    undelegate(&mut world, ALICE, ALICE, 10 * U, 0);
    let t1 = T0 + 3_600;
    set_time(&mut world, t1);
    undelegate(&mut world, ALICE, ALICE, 0, 5 * U);

    let (tasks, due_time, refund) = read(&mut world, |sc| {
        let alice = ALICE.to_managed_address();
        let refund = sc.refunds(&alice).get();
        (
            sc.deferred_accounts().len(),
            sc.deferred_task(&alice).get().due_time,
            (refund.request_time, refund.net_amount, refund.cpu_amount),
        )
    });
    assert_eq!(tasks, 1);
    assert_eq!(due_time, t1 + REFUND_DELAY);
    assert_eq!(refund, (t1, 10 * U, 5 * U));

    world
        .tx()
        .from(ALICE)
        .to(PLATFORM)
        .returns(ExpectError(4, "refund is not available yet"))
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.refund(ALICE.to_managed_address());
        });

    // The host executes the matured task.
    set_time(&mut world, t1 + REFUND_DELAY);
    world
        .tx()
        .from(OWNER)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.refund(ALICE.to_managed_address());
        });

    let (tasks, refund_open, stake_pool) = read(&mut world, |sc| {
        (
            sc.deferred_accounts().len(),
            !sc.refunds(&ALICE.to_managed_address()).is_empty(),
            sc.pool_balance(Pool::Stake).get(),
        )
    });
    assert_eq!(tasks, 0);
    assert!(!refund_open);
    assert_eq!(stake_pool, 85 * U + ACTIVATION_VOTES);
    world
        .check_account(ALICE)
        .esdt_balance(CORE, INITIAL_BALANCE - 85 * U);
}

#[test]
fn test_restaking_whole_refund_cancels_its_task() {
    let mut world = setup();
    delegate(&mut world, ALICE, ALICE, 60 * U, 40 * U, false);
    activate(&mut world, BOB, PRODUCER_A);
    undelegate(&mut world, ALICE, ALICE, 10 * U, 5 * U);

    set_time(&mut world, T0 + SECONDS_PER_DAY);
    delegate(&mut world, ALICE, ALICE, 10 * U, 5 * U, false);

    let (tasks, refund_open, totals, staked, stake_pool) = read(&mut world, |sc| {
        let alice = ALICE.to_managed_address();
        (
            sc.deferred_accounts().len(),
            !sc.refunds(&alice).is_empty(),
            user_weights(sc, ALICE),
            sc.voters(&alice).get().staked_balance,
            sc.pool_balance(Pool::Stake).get(),
        )
    });
    assert_eq!(tasks, 0);
    assert!(!refund_open);
    assert_eq!(totals, (60 * U, 40 * U));
    assert_eq!(staked, 100 * U);
    assert_eq!(stake_pool, 100 * U + ACTIVATION_VOTES);
    // The restaked payment is covered by the refund and sent back.
    world
        .check_account(ALICE)
        .esdt_balance(CORE, INITIAL_BALANCE - 100 * U);
}

// ============================================================
// RAM market
// ============================================================

#[test]
fn test_reserved_ram_matches_user_quotas() {
    let mut world = setup();

    buy_ram(&mut world, ALICE, ALICE, 100 * U);
    buy_ram(&mut world, ALICE, BOB, 50 * U);

    let bob_bytes = read(&mut world, |sc| ram_bytes(sc, BOB));
    world
        .tx()
        .from(BOB)
        .to(PLATFORM)
        .esdt(TestEsdtTransfer(CORE, 0, U))
        .whitebox(besio_platform::contract_obj, |sc| {
            let bytes_out = sc.buyrambytes(BOB.to_managed_address(), 4_096);
            assert!(bytes_out >= 4_096);
        });
    let bob_after_buy = read(&mut world, |sc| ram_bytes(sc, BOB));
    assert!(bob_after_buy >= bob_bytes + 4_096);

    world
        .tx()
        .from(BOB)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.sellram(bob_after_buy / 2);
        });

    let (reserved, free_ram, alice, bob, ram_reserve, ram_stake, ram_pool) = read(&mut world, |sc| {
        let gstate: GlobalState = sc.global_state().get();
        (
            gstate.total_ram_bytes_reserved,
            gstate.free_ram(),
            ram_bytes(sc, ALICE),
            ram_bytes(sc, BOB),
            sc.ram_market().get().ram_reserve,
            gstate.total_ram_stake,
            sc.pool_balance(Pool::Ram).get(),
        )
    });
    assert_eq!(bob, bob_after_buy - bob_after_buy / 2);
    assert_eq!(reserved, alice + bob);
    assert_eq!(ram_reserve + reserved, DEFAULT_MAX_RAM_SIZE);
    assert_eq!(free_ram, ram_reserve);
    assert_eq!(ram_stake, ram_pool);
}

#[test]
fn test_first_purchase_with_mostly_unused_ram_records_warning() {
    let mut world = setup();
    let quant = 100 * U;
    let fee = quant * RAM_TRADE_BASIS_FEE_BPS as u64 / 10_000;
    let expected_bytes = RamExchange::new(RAM_TOKEN_RESERVE, DEFAULT_MAX_RAM_SIZE)
        .unwrap()
        .bytes_for_tokens(quant - fee)
        .unwrap();

    // 20% of the bytes about to be bought are already in use.
    world
        .tx()
        .from(OWNER)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.onramusage(ALICE.to_managed_address(), expected_bytes / 5);
        });
    buy_ram(&mut world, ALICE, ALICE, quant);

    let (bytes, fee_rate, warning_time, fee_pool) = read(&mut world, |sc| {
        let res = sc.user_resources(&ALICE.to_managed_address()).get();
        (
            res.ram_bytes,
            res.ram_trading_fee_rate,
            res.ram_last_warning_time,
            sc.pool_balance(Pool::RamFee).get(),
        )
    });
    assert_eq!(bytes, expected_bytes);
    assert_eq!(fee_rate, RAM_TRADE_BASIS_FEE_BPS);
    assert_eq!(warning_time, T0);
    assert_eq!(fee_pool, fee);

    // Past the grace periods the rate turns punitive but stays capped.
    set_time(&mut world, T0 + 8 * SECONDS_PER_DAY);
    let rate = read(&mut world, |sc| sc.get_ram_trade_fee_rate(ALICE.to_managed_address()));
    assert!(rate > RAM_TRADE_BASIS_FEE_BPS);
    assert!(rate <= RAM_TRADE_MAX_FEE_BPS);
}

// ============================================================
// Rewards
// ============================================================

#[test]
fn test_distribution_conserves_buckets() {
    let mut world = setup();
    delegate(&mut world, BOB, BOB, ACTIVATION_VOTES / 2, ACTIVATION_VOTES / 2, false);
    register(&mut world, PRODUCER_A, 5_000);
    register(&mut world, PRODUCER_B, 2_500);
    vote(&mut world, BOB, PRODUCER_A, 1_000_000 * U);
    vote(&mut world, BOB, PRODUCER_B, 500_000 * U);

    on_block(&mut world, 10, PRODUCER_A);
    on_block(&mut world, 11, PRODUCER_A);
    on_block(&mut world, 12, PRODUCER_B);

    set_time(&mut world, T0 + 3 * SECONDS_PER_DAY + 3_600);
    let mut outcome = (GlobalState::default(), GlobalState::default(), 0u64, 0u64, 0u64);
    world
        .tx()
        .from(OWNER)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            let producers_balance = |sc: &Platform| -> u64 {
                [PRODUCER_A, PRODUCER_B]
                    .iter()
                    .map(|producer| {
                        let info = sc.producer_info(&producer.to_managed_address()).get();
                        info.rewards_producer_balance + info.rewards_voters_balance
                    })
                    .sum()
            };

            let before = sc.global_state().get();
            let supply_before = sc.core_token_supply().get();
            let paid_before = producers_balance(&sc);

            let mut gstate = before.clone();
            sc.distribute_rewards(&mut gstate, T0 + 3 * SECONDS_PER_DAY + 3_600);
            sc.global_state().set(&gstate);

            outcome = (
                before,
                gstate,
                sc.core_token_supply().get() - supply_before,
                producers_balance(&sc) - paid_before,
                sc.pool_balance(Pool::Rewards).get(),
            );
        });

    let (before, after, minted, paid, rewards_pool) = outcome;
    let (to_perblock, to_pervote) = split_emission(minted).unwrap();
    assert!(minted > 0);
    assert_eq!(to_perblock + to_pervote, minted);
    assert_eq!(before.total_unpaid_blocks, 3);
    assert_eq!(after.total_unpaid_blocks, 0);
    assert_eq!(
        before.perblock_bucket + before.pervote_bucket + minted,
        after.perblock_bucket + after.pervote_bucket + paid
    );
    assert_eq!(rewards_pool, minted);
    assert_eq!(after.last_rewards_bucket_fill, T0 + 3 * SECONDS_PER_DAY + 3_600);
}

#[test]
fn test_single_voter_claims_producer_voter_balance() {
    let mut world = setup();
    delegate(&mut world, ALICE, ALICE, 50 * U, 50 * U, false);
    delegate(&mut world, BOB, BOB, ACTIVATION_VOTES / 2, ACTIVATION_VOTES / 2, false);
    register(&mut world, PRODUCER_A, 5_000);
    register(&mut world, PRODUCER_B, 5_000);
    vote(&mut world, ALICE, PRODUCER_A, 50 * U);
    vote(&mut world, BOB, PRODUCER_B, ACTIVATION_VOTES);

    on_block(&mut world, 10, PRODUCER_A);
    on_block(&mut world, 11, PRODUCER_B);

    // The block hook fills and pays out the buckets after three days.
    set_time(&mut world, T0 + 3 * SECONDS_PER_DAY);
    on_block(&mut world, 200, PRODUCER_A);

    let claim_time = T0 + CLAIM_REWARDS_PERIOD;
    set_time(&mut world, claim_time);
    let (voters_balance, rewards_pool) = read(&mut world, |sc| {
        (
            sc.producer_info(&PRODUCER_A.to_managed_address()).get().rewards_voters_balance,
            sc.pool_balance(Pool::Rewards).get(),
        )
    });
    assert!(voters_balance > 0);

    // Only ALICE votes on A, so her voteage is the whole of A's voteage.
    world
        .tx()
        .from(ALICE)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            let paid = sc.claimrewards(PRODUCER_A.to_managed_address());
            assert_eq!(paid, voters_balance);
        });

    let (balance_left, total_voteage, vote_voteage, last_claim, pool_after) = read(&mut world, |sc| {
        let alice = ALICE.to_managed_address();
        let producer = PRODUCER_A.to_managed_address();
        let info = sc.producer_info(&producer).get();
        (
            info.rewards_voters_balance,
            info.total_voteage,
            sc.votes(&alice, &producer).get().voteage,
            sc.voters(&alice).get().last_claim_time,
            sc.pool_balance(Pool::Rewards).get(),
        )
    });
    assert_eq!(balance_left, 0);
    assert_eq!(total_voteage, 0);
    assert_eq!(vote_voteage, 0);
    assert_eq!(last_claim, claim_time);
    assert_eq!(pool_after, rewards_pool - voters_balance);
    world
        .check_account(ALICE)
        .esdt_balance(CORE, INITIAL_BALANCE - 100 * U + voters_balance);

    world
        .tx()
        .from(ALICE)
        .to(PLATFORM)
        .returns(ExpectError(4, "already claimed rewards within past period"))
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.claimrewards(PRODUCER_A.to_managed_address());
        });
}

// ============================================================
// Election
// ============================================================

fn proposed_schedule(world: &mut ScenarioWorld) -> (u64, Vec<[u8; 32]>) {
    read(world, |sc| {
        let producers = sc
            .proposed_schedule()
            .iter()
            .map(|entry| entry.producer_name.to_byte_array())
            .collect();
        (sc.schedule_version().get(), producers)
    })
}

#[test]
fn test_shrinking_producer_set_keeps_published_schedule() {
    let mut world = setup();
    delegate(&mut world, BOB, BOB, 1_000_000 * U, 600_000 * U, false);
    register(&mut world, PRODUCER_A, 5_000);
    register(&mut world, PRODUCER_B, 5_000);
    register(&mut world, PRODUCER_C, 5_000);
    vote(&mut world, BOB, PRODUCER_A, 600_000 * U);
    vote(&mut world, BOB, PRODUCER_B, 500_000 * U);
    vote(&mut world, BOB, PRODUCER_C, 400_000 * U);

    on_block(&mut world, 200, PRODUCER_A);
    let (version, first) = proposed_schedule(&mut world);
    assert_eq!(version, 1);
    assert_eq!(first.len(), 3);
    assert!(first.contains(&PRODUCER_C.eval_to_array()));

    world
        .tx()
        .from(PRODUCER_C)
        .to(PLATFORM)
        .whitebox(besio_platform::contract_obj, |sc| {
            sc.unregprod();
        });
    on_block(&mut world, 400, PRODUCER_A);

    let (version, retained) = proposed_schedule(&mut world);
    assert_eq!(version, 1);
    assert_eq!(retained, first);

    register(&mut world, PRODUCER_D, 5_000);
    vote(&mut world, BOB, PRODUCER_D, 100_000 * U);
    on_block(&mut world, 600, PRODUCER_A);

    let (version, replaced) = proposed_schedule(&mut world);
    assert_eq!(version, 2);
    assert_eq!(replaced.len(), 3);
    assert!(replaced.contains(&PRODUCER_D.eval_to_array()));
    assert!(!replaced.contains(&PRODUCER_C.eval_to_array()));
}
