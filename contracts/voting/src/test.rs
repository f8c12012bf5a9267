use super::*;
use crate::events::{ProposalCreatedEvent, ProposalResultEvent};
use snapshot_token::{SnapshotToken, SnapshotTokenClient};
use soroban_sdk::{
    testutils::{Address as _, Events, Ledger},
    Address, Env, String, Symbol, TryFromVal,
};

const SCALE: i128 = 10_000_000;
const NOW: u64 = 1_700_000_000;

struct Setup<'a> {
    env: Env,
    client: SnapshotVotingClient<'a>,
    token: SnapshotTokenClient<'a>,
    owner: Address,
    investor1: Address,
    investor2: Address,
    investor3: Address,
}

/// Two holders with 800 tokens each at ledger 100, an unpaused token and the
/// ledger moved to 101.
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
    token.mint(&owner, &investor1, &(800 * SCALE));
    token.mint(&owner, &investor2, &(800 * SCALE));
    token.unpause(&owner);

    let client = SnapshotVotingClient::new(&env, &env.register(SnapshotVoting, ()));
    client.initialize(&owner, &token.address);

    env.ledger().set_sequence_number(101);

    Setup {
        env,
        client,
        token,
        owner,
        investor1,
        investor2,
        investor3,
    }
}

fn days(n: u64) -> u64 {
    n * SECONDS_PER_DAY
}

#[test]
fn test_initialize() {
    let s = setup();

    assert_eq!(s.client.owner(), s.owner);
    assert_eq!(s.client.token(), s.token.address);
    assert_eq!(s.client.proposal_count(), 0);
    assert_eq!(s.client.try_get_proposal(&0), Err(Ok(Error::InvalidIndex)));
    assert_eq!(
        s.client.try_initialize(&s.owner, &s.token.address),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn test_create_proposal() {
    let s = setup();

    let index = s
        .client
        .create_proposal(&String::from_str(&s.env, "first proposal"), &50, &60);
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
                .map_or(false, |t| t == Symbol::new(&s.env, "proposal_created"))
        })
        .map(|(_, _, data)| ProposalCreatedEvent::try_from_val(&s.env, &data).unwrap())
        .unwrap();
    assert_eq!(
        event,
        ProposalCreatedEvent {
            creator: s.owner.clone(),
            proposal_index: 0,
            timestamp: NOW,
        }
    );

    let proposal = s.client.get_proposal(&0);
    assert_eq!(proposal.description, String::from_str(&s.env, "first proposal"));
    assert_eq!(proposal.quorum, 50);
    assert_eq!(proposal.created_at, NOW);
    assert_eq!(proposal.voting_end, NOW + days(60));
    assert_eq!(proposal.record_counter, 100);
    assert!(!proposal.result_revealed);
    assert!(!proposal.result);
    assert_eq!(proposal.vote_count, 0);
    assert_eq!(s.client.proposal_count(), 1);
}

#[test]
fn test_create_proposal_validation() {
    let s = setup();
    let description = String::from_str(&s.env, "bad");

    assert_eq!(
        s.client.try_create_proposal(&description, &0, &10),
        Err(Ok(Error::InvalidQuorum))
    );
    assert_eq!(
        s.client.try_create_proposal(&description, &101, &10),
        Err(Ok(Error::InvalidQuorum))
    );
    assert_eq!(
        s.client.try_create_proposal(&description, &50, &0),
        Err(Ok(Error::InvalidDuration))
    );
    assert_eq!(s.client.proposal_count(), 0);
}

#[test]
fn test_voting_power_follows_record_counter() {
    let s = setup();
    s.client
        .create_proposal(&String::from_str(&s.env, "first proposal"), &50, &60);

    s.token.transfer(&s.investor1, &s.investor3, &(400 * SCALE));

    s.env.ledger().set_sequence_number(102);
    s.client
        .create_proposal(&String::from_str(&s.env, "second proposal"), &50, &50);

    // proposal 0 was recorded before the transfer
    assert_eq!(
        s.client.try_cast_vote(&s.investor3, &0, &true),
        Err(Ok(Error::NoVotingPower))
    );
    s.client.cast_vote(&s.investor1, &0, &true);
    assert_eq!(s.client.vote_of(&0, &s.investor1).unwrap().weight, 800 * SCALE);

    s.client.cast_vote(&s.investor1, &1, &true);
    s.client.cast_vote(&s.investor3, &1, &true);
    assert_eq!(s.client.vote_of(&1, &s.investor1).unwrap().weight, 400 * SCALE);
    assert_eq!(s.client.vote_of(&1, &s.investor3).unwrap().weight, 400 * SCALE);
}

#[test]
fn test_cast_vote_validation() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    s.client
        .create_proposal(&String::from_str(&s.env, "proposal"), &50, &10);

    assert_eq!(
        s.client.try_cast_vote(&s.investor1, &5, &true),
        Err(Ok(Error::InvalidIndex))
    );
    assert_eq!(
        s.client.try_cast_vote(&stranger, &0, &true),
        Err(Ok(Error::NoVotingPower))
    );

    s.env.ledger().set_timestamp(NOW + days(10));
    assert_eq!(
        s.client.try_cast_vote(&s.investor1, &0, &true),
        Err(Ok(Error::VotingClosed))
    );
}

#[test]
fn test_change_of_mind() {
    let s = setup();
    s.client
        .create_proposal(&String::from_str(&s.env, "proposal"), &50, &10);

    s.client.cast_vote(&s.investor1, &0, &true);
    s.client.cast_vote(&s.investor2, &0, &true);
    let proposal = s.client.get_proposal(&0);
    assert_eq!(proposal.yes_weight, 1_600 * SCALE);
    assert_eq!(proposal.no_weight, 0);

    s.client.cast_vote(&s.investor1, &0, &false);
    let proposal = s.client.get_proposal(&0);
    assert_eq!(proposal.yes_weight, 800 * SCALE);
    assert_eq!(proposal.no_weight, 800 * SCALE);
    assert_eq!(proposal.vote_count, 2);
    assert!(!s.client.vote_of(&0, &s.investor1).unwrap().support);
}

#[test]
fn test_calculate_results_tie_fails() {
    let s = setup();
    s.client
        .create_proposal(&String::from_str(&s.env, "proposal"), &50, &60);

    s.client.cast_vote(&s.investor1, &0, &true);
    s.client.cast_vote(&s.investor2, &0, &false);

    assert_eq!(
        s.client.try_calculate_results(&5),
        Err(Ok(Error::InvalidIndex))
    );
    assert_eq!(
        s.client.try_calculate_results(&0),
        Err(Ok(Error::VotingOpen))
    );

    s.env.ledger().set_timestamp(NOW + days(60));
    assert!(!s.client.calculate_results(&0));

    let proposal = s.client.get_proposal(&0);
    assert!(proposal.result_revealed);
    assert!(!proposal.result);
    assert_eq!(proposal.vote_count, 2);

    assert_eq!(
        s.client.try_calculate_results(&0),
        Err(Ok(Error::ResultAlreadyRevealed))
    );
}

#[test]
fn test_calculate_results_passes() {
    let s = setup();
    s.token.transfer(&s.investor1, &s.investor3, &(400 * SCALE));
    s.env.ledger().set_sequence_number(102);

    s.client
        .create_proposal(&String::from_str(&s.env, "proposal"), &50, &50);
    s.client.cast_vote(&s.investor1, &0, &true);
    s.client.cast_vote(&s.investor2, &0, &true);
    s.client.cast_vote(&s.investor3, &0, &true);
    s.client.cast_vote(&s.investor1, &0, &false);

    s.env.ledger().set_timestamp(NOW + days(50));
    assert!(s.client.calculate_results(&0));

    let event = s
        .env
        .events()
        .all()
        .iter()
        .find(|(_, topics, _)| {
            topics
                .get(0)
                .and_then(|t| Symbol::try_from_val(&s.env, &t).ok())
                .map_or(false, |t| t == Symbol::new(&s.env, "proposal_result"))
        })
        .map(|(_, _, data)| ProposalResultEvent::try_from_val(&s.env, &data).unwrap())
        .unwrap();
    assert_eq!(
        event,
        ProposalResultEvent {
            proposal_index: 0,
            result: true,
            yes_weight: 1_200 * SCALE,
            no_weight: 400 * SCALE,
        }
    );
}

#[test]
fn test_quorum_not_reached() {
    let s = setup();
    s.client
        .create_proposal(&String::from_str(&s.env, "proposal"), &100, &10);

    s.client.cast_vote(&s.investor1, &0, &true);

    s.env.ledger().set_timestamp(NOW + days(10));
    assert!(!s.client.calculate_results(&0));
}
