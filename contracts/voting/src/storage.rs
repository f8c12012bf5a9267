use soroban_sdk::{contracttype, Address, Env, String};

use crate::error::Error;

pub const SECONDS_PER_DAY: u64 = 86_400;
/// Quorum is expressed over this base
pub const PERCENT_BASE: u32 = 100;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub description: String,
    /// Share of the supply at `record_counter` that has to vote, in percent
    pub quorum: u32,
    pub created_at: u64,
    pub voting_end: u64,
    pub record_counter: u32,
    pub result_revealed: bool,
    pub result: bool,
    pub vote_count: u32,
    pub yes_weight: i128,
    pub no_weight: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vote {
    pub support: bool,
    pub weight: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Token,
    ProposalCount,
    Proposal(u32),
    Vote(u32, Address),
}

pub struct Storage;

impl Storage {
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Initialized)
    }

    pub fn owner(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_owner(env: &Env, owner: &Address) {
        env.storage().instance().set(&DataKey::Owner, owner);
    }

    pub fn token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    // Proposals
    pub fn proposal_count(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::ProposalCount)
            .unwrap_or(0)
    }

    pub fn proposal(env: &Env, index: u32) -> Result<Proposal, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Proposal(index))
            .ok_or(Error::InvalidIndex)
    }

    pub fn set_proposal(env: &Env, index: u32, proposal: &Proposal) {
        env.storage()
            .persistent()
            .set(&DataKey::Proposal(index), proposal);
    }

    pub fn push_proposal(env: &Env, proposal: &Proposal) -> u32 {
        let index = Self::proposal_count(env);
        Self::set_proposal(env, index, proposal);
        env.storage()
            .instance()
            .set(&DataKey::ProposalCount, &(index + 1));
        index
    }

    // Votes
    pub fn vote(env: &Env, index: u32, voter: &Address) -> Option<Vote> {
        env.storage()
            .persistent()
            .get(&DataKey::Vote(index, voter.clone()))
    }

    pub fn set_vote(env: &Env, index: u32, voter: &Address, vote: &Vote) {
        env.storage()
            .persistent()
            .set(&DataKey::Vote(index, voter.clone()), vote);
    }
}
