use super::*;
use crate::events::{DividendClaimedEvent, DividendDepositedEvent};
use snapshot_token::{SnapshotToken, SnapshotTokenClient};
use soroban_sdk::{
    testutils::{Address as _, Events, Ledger},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, String, Symbol, TryFromVal,
};

const SCALE: i128 = 10_000_000;
const DAY: u64 = 86_400;
const NOW: u64 = 1_700_000_000;
const PERIOD: u64 = 30 * DAY;

struct Setup<'a> {
    env: Env,
    client: DividendDistributorClient<'a>,
    token: SnapshotTokenClient<'a>,
    payout: TokenClient<'a>,
    payout_admin: StellarAssetClient<'a>,
    owner: Address,
    investor1: Address,
    investor2: Address,
    investor3: Address,
}

/// Holders own 600, 300 and 100 tokens at ledger 100; the owner holds
/// 1,000,000 payout units approved to the distributor. The ledger is moved to
/// 101 so the balances are sealed.
fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(NOW);
    env.ledger().set_sequence_number(100);

    let owner = Address::generate(&env);
    let investor1 = Address::generate(&env);
    let investor2 = Address::generate(&env);
    let investor3 = Address::generate(&env);

    let token = SnapshotTokenClient::new(&env, &env.register(SnapshotToken, ()));
    token.initialize(
        &owner,
        &String::from_str(&env, "Sale Token"),
        &String::from_str(&env, "SALE"),
        &7,
        &(1_000_000 * SCALE),
    );
    token.mint(&owner, &investor1, &(600 * SCALE));
    token.mint(&owner, &investor2, &(300 * SCALE));
    token.mint(&owner, &investor3, &(100 * SCALE));

    let client = DividendDistributorClient::new(&env, &env.register(DividendDistributor, ()));
    client.initialize(&owner, &token.address);

    let issuer = Address::generate(&env);
    let payout_sac = env.register_stellar_asset_contract_v2(issuer);
    let payout_admin = StellarAssetClient::new(&env, &payout_sac.address());
    let payout = TokenClient::new(&env, &payout_sac.address());
    payout_admin.mint(&owner, &1_000_000);
    payout.approve(&owner, &client.address, &1_000_000, &100_000);

    env.ledger().set_sequence_number(101);

    Setup {
        env,
        client,
        token,
        payout,
        payout_admin,
        owner,
        investor1,
        investor2,
        investor3,
    }
}

#[test]
fn test_initialize() {
    let s = setup();

    assert_eq!(s.client.owner(), s.owner);
    assert_eq!(s.client.token(), s.token.address);
    assert_eq!(s.client.dividend_count(), 0);
    assert_eq!(s.client.try_get_dividend(&0), Err(Ok(Error::InvalidIndex)));

    assert_eq!(
        s.client.try_initialize(&s.owner, &s.token.address),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn test_initialize_with_itself_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let client = DividendDistributorClient::new(&env, &env.register(DividendDistributor, ()));
    let result = client.try_initialize(&Address::generate(&env), &client.address);
    assert_eq!(result, Err(Ok(Error::InvalidAddress)));
}

#[test]
fn test_deposit_dividend() {
    let s = setup();

    let index = s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);
    assert_eq!(index, 0);

    let event = s
        .env
        .events()
        .all()
        .iter()
        .find(|(_, topics, _)| {
            topics
                .get(0)
                .and_then(|t| Symbol::try_from_val(&s.env, &t).ok())
                .map_or(false, |t| t == Symbol::new(&s.env, "dividend_deposited"))
        })
        .map(|(_, _, data)| DividendDepositedEvent::try_from_val(&s.env, &data).unwrap())
        .unwrap();
    assert_eq!(
        event,
        DividendDepositedEvent {
            dividend_index: 0,
            payout_token: s.payout.address.clone(),
            payout_amount: 100_000,
            claim_period: PERIOD,
            record_date: 100,
        }
    );

    let dividend = s.client.get_dividend(&0);
    assert_eq!(dividend.payout_token, s.payout.address);
    assert_eq!(dividend.record_counter, 100);
    assert_eq!(dividend.record_time, NOW);
    assert_eq!(dividend.claim_period_end, NOW + PERIOD);
    assert_eq!(dividend.amount, 100_000);
    assert_eq!(dividend.claimed_amount, 0);
    assert_eq!(dividend.total_supply, 1_000 * SCALE);
    assert!(!dividend.recycled);

    assert_eq!(s.client.dividend_count(), 1);
    assert_eq!(s.payout.balance(&s.client.address), 100_000);
    assert_eq!(s.payout.balance(&s.owner), 900_000);
}

#[test]
fn test_deposit_validation() {
    let s = setup();

    assert_eq!(
        s.client.try_deposit_dividend(&s.payout.address, &PERIOD, &0),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        s.client.try_deposit_dividend(&s.payout.address, &0, &100),
        Err(Ok(Error::InvalidPeriod))
    );
    assert_eq!(
        s.client.try_deposit_dividend(&s.client.address, &PERIOD, &100),
        Err(Ok(Error::InvalidAddress))
    );
    // more than the allowance
    assert!(s
        .client
        .try_deposit_dividend(&s.payout.address, &PERIOD, &2_000_000)
        .is_err());
    assert_eq!(s.client.dividend_count(), 0);
}

#[test]
fn test_claims_are_pro_rata() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);

    assert_eq!(s.client.claimable(&s.investor1, &0), 60_000);
    assert_eq!(s.client.claim_dividend(&s.investor1, &0), 60_000);
    assert_eq!(s.client.claim_dividend(&s.investor2, &0), 30_000);
    assert_eq!(s.client.claim_dividend(&s.investor3, &0), 10_000);

    assert_eq!(s.payout.balance(&s.investor1), 60_000);
    assert_eq!(s.payout.balance(&s.investor2), 30_000);
    assert_eq!(s.payout.balance(&s.investor3), 10_000);
    assert_eq!(s.payout.balance(&s.client.address), 0);
    assert_eq!(s.client.get_dividend(&0).claimed_amount, 100_000);
    assert!(s.client.has_claimed(&s.investor1, &0));
}

#[test]
fn test_double_claim_fails() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);

    s.client.claim_dividend(&s.investor1, &0);
    assert_eq!(
        s.client.try_claim_dividend(&s.investor1, &0),
        Err(Ok(Error::AlreadyClaimed))
    );
    assert_eq!(s.client.claimable(&s.investor1, &0), 0);
    assert_eq!(s.payout.balance(&s.investor1), 60_000);
}

#[test]
fn test_zero_entitlement_claim_succeeds_repeatedly() {
    let s = setup();
    let outsider = Address::generate(&s.env);
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);

    assert_eq!(s.client.claim_dividend(&outsider, &0), 0);

    let event = s
        .env
        .events()
        .all()
        .iter()
        .find(|(_, topics, _)| {
            topics
                .get(0)
                .and_then(|t| Symbol::try_from_val(&s.env, &t).ok())
                .map_or(false, |t| t == Symbol::new(&s.env, "dividend_claimed"))
        })
        .map(|(_, _, data)| DividendClaimedEvent::try_from_val(&s.env, &data).unwrap())
        .unwrap();
    assert_eq!(event.claimed_amount, 0);
    assert_eq!(event.claimer, outsider);

    // nothing was paid, so the claimer is not marked
    assert!(!s.client.has_claimed(&outsider, &0));
    assert_eq!(s.client.claim_dividend(&outsider, &0), 0);
}

#[test]
fn test_claim_invalid_index() {
    let s = setup();

    assert_eq!(
        s.client.try_claim_dividend(&s.investor1, &0),
        Err(Ok(Error::InvalidIndex))
    );
    assert_eq!(
        s.client.try_claim_all_dividends(&s.investor1, &0),
        Err(Ok(Error::InvalidIndex))
    );
}

#[test]
fn test_claim_period_and_recycle() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);
    s.client.claim_dividend(&s.investor1, &0);

    assert_eq!(
        s.client.try_recycle_dividend(&0),
        Err(Ok(Error::ClaimPeriodNotOver))
    );

    s.env.ledger().set_timestamp(NOW + PERIOD);
    assert_eq!(
        s.client.try_claim_dividend(&s.investor2, &0),
        Err(Ok(Error::ClaimPeriodOver))
    );
    assert_eq!(s.client.claimable(&s.investor2, &0), 0);

    assert_eq!(s.client.recycle_dividend(&0), 40_000);
    assert_eq!(s.payout.balance(&s.owner), 940_000);
    assert!(s.client.get_dividend(&0).recycled);

    assert_eq!(
        s.client.try_recycle_dividend(&0),
        Err(Ok(Error::DividendRecycled))
    );
    assert_eq!(
        s.client.try_claim_dividend(&s.investor2, &0),
        Err(Ok(Error::DividendRecycled))
    );
    assert_eq!(
        s.client.try_recycle_dividend(&1),
        Err(Ok(Error::InvalidIndex))
    );
}

#[test]
fn test_rounding_remainder_is_recycled() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &7);

    assert_eq!(s.client.claim_dividend(&s.investor1, &0), 4);
    assert_eq!(s.client.claim_dividend(&s.investor2, &0), 2);
    // 7 × 100 / 1000 rounds down to nothing
    assert_eq!(s.client.claim_dividend(&s.investor3, &0), 0);

    s.env.ledger().set_timestamp(NOW + PERIOD);
    assert_eq!(s.client.recycle_dividend(&0), 1);
    assert_eq!(s.payout.balance(&s.client.address), 0);
}

#[test]
fn test_entitlement_uses_record_counter() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);

    s.env.ledger().set_sequence_number(102);
    s.token.mint(&s.owner, &s.investor3, &(1_000 * SCALE));

    // minted in the current ledger, not sealed yet
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);
    assert_eq!(s.client.get_dividend(&1).total_supply, 1_000 * SCALE);

    s.env.ledger().set_sequence_number(103);
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);
    let third = s.client.get_dividend(&2);
    assert_eq!(third.record_counter, 102);
    assert_eq!(third.total_supply, 2_000 * SCALE);

    assert_eq!(s.client.claim_dividend(&s.investor1, &0), 60_000);
    assert_eq!(s.client.claim_dividend(&s.investor1, &2), 30_000);
    assert_eq!(s.client.claim_dividend(&s.investor3, &0), 10_000);
    assert_eq!(s.client.claim_dividend(&s.investor3, &2), 55_000);
}

#[test]
fn test_claim_all_dividends() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);
    s.client.deposit_dividend(&s.payout.address, &(2 * PERIOD), &50_000);
    s.client.deposit_dividend(&s.payout.address, &(2 * PERIOD), &10_000);

    s.client.claim_dividend(&s.investor1, &1);

    // dividend 0 expires, dividend 1 is already claimed
    s.env.ledger().set_timestamp(NOW + PERIOD);
    assert_eq!(s.client.claim_all_dividends(&s.investor1, &0), 6_000);
    assert!(s.client.has_claimed(&s.investor1, &2));
    assert!(!s.client.has_claimed(&s.investor1, &0));

    assert_eq!(s.client.claim_all_dividends(&s.investor2, &2), 3_000);
    assert_eq!(
        s.client.try_claim_all_dividends(&s.investor2, &3),
        Err(Ok(Error::InvalidIndex))
    );
}

fn claimed_events(s: &Setup) -> soroban_sdk::Vec<DividendClaimedEvent> {
    let mut claimed = soroban_sdk::Vec::new(&s.env);
    for event in s
        .env
        .events()
        .all()
        .iter()
        .filter(|(contract, topics, _)| {
            *contract == s.client.address
                && topics
                    .get(0)
                    .and_then(|t| Symbol::try_from_val(&s.env, &t).ok())
                    .map_or(false, |t| t == Symbol::new(&s.env, "dividend_claimed"))
        })
        .map(|(_, _, data)| DividendClaimedEvent::try_from_val(&s.env, &data).unwrap())
    {
        claimed.push_back(event);
    }
    claimed
}

#[test]
fn test_claim_all_emits_one_event_per_dividend() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &50_000);
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &10_000);

    assert_eq!(s.client.claim_all_dividends(&s.investor2, &0), 48_000);

    let events = claimed_events(&s);
    assert_eq!(events.len(), 3);
    for (index, amount) in [30_000, 15_000, 3_000].into_iter().enumerate() {
        let event = events.get(index as u32).unwrap();
        assert_eq!(event.dividend_index, index as u32);
        assert_eq!(event.claimer, s.investor2);
        assert_eq!(event.claimed_amount, amount);
    }
}

#[test]
fn test_reclaim_token_keeps_what_is_owed() {
    let s = setup();
    s.client.deposit_dividend(&s.payout.address, &PERIOD, &100_000);
    s.payout_admin.mint(&s.client.address, &500);

    assert_eq!(s.client.reclaim_token(&s.payout.address), 500);
    assert_eq!(s.payout.balance(&s.client.address), 100_000);
    assert_eq!(s.client.reclaim_token(&s.payout.address), 0);

    s.client.claim_dividend(&s.investor1, &0);
    assert_eq!(s.client.reclaim_token(&s.payout.address), 0);
    assert_eq!(s.payout.balance(&s.client.address), 40_000);
}

#[test]
fn test_transfer_ownership() {
    let s = setup();
    let new_owner = Address::generate(&s.env);

    s.client.transfer_ownership(&new_owner);
    assert_eq!(s.client.owner(), new_owner);
}
