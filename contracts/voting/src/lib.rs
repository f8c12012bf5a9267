#![no_std]

mod error;
mod events;
mod external;
mod storage;
mod tally;

pub use error::Error;
pub use storage::{Proposal, Vote, PERCENT_BASE, SECONDS_PER_DAY};

use events::*;
use storage::{DataKey, Storage};

use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Symbol};

#[contract]
pub struct SnapshotVoting;

#[contractimpl]
impl SnapshotVoting {
    // ============================================
    // INITIALIZATION & OWNERSHIP
    // ============================================

    /// Initialize voting on the snapshot token `token`
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAddress`: Token is the voting contract itself
    pub fn initialize(env: Env, owner: Address, token: Address) -> Result<(), Error> {
        if Storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if token == env.current_contract_address() {
            return Err(Error::InvalidAddress);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Token, &token);
        Storage::set_owner(&env, &owner);

        Ok(())
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), Error> {
        let owner = Storage::owner(&env)?;
        owner.require_auth();

        Storage::set_owner(&env, &new_owner);
        env.events().publish(
            (Symbol::new(&env, "owner_changed"),),
            OwnershipTransferredEvent {
                previous_owner: owner,
                new_owner,
            },
        );
        Ok(())
    }

    // ============================================
    // PROPOSALS
    // ============================================

    /// Open a proposal weighted by the balances at the last sealed snapshot
    /// counter. Returns the proposal index.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidQuorum`: Quorum outside 1..=100
    /// - `InvalidDuration`: Zero voting days
    pub fn create_proposal(
        env: Env,
        description: String,
        quorum: u32,
        voting_days: u32,
    ) -> Result<u32, Error> {
        let owner = Storage::owner(&env)?;
        owner.require_auth();

        if quorum == 0 || quorum > PERCENT_BASE {
            return Err(Error::InvalidQuorum);
        }
        if voting_days == 0 {
            return Err(Error::InvalidDuration);
        }

        let now = env.ledger().timestamp();
        let voting_end = (voting_days as u64)
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|period| now.checked_add(period))
            .ok_or(Error::InvalidDuration)?;

        let index = Storage::push_proposal(
            &env,
            &Proposal {
                description,
                quorum,
                created_at: now,
                voting_end,
                record_counter: env.ledger().sequence().saturating_sub(1),
                result_revealed: false,
                result: false,
                vote_count: 0,
                yes_weight: 0,
                no_weight: 0,
            },
        );

        env.events().publish(
            (Symbol::new(&env, "proposal_created"),),
            ProposalCreatedEvent {
                creator: owner,
                proposal_index: index,
                timestamp: now,
            },
        );

        Ok(index)
    }

    /// Vote on proposal `index` with the voter's balance at its record
    /// counter. Voting again replaces the earlier choice.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidIndex`: No such proposal
    /// - `VotingClosed`: Voting period has ended
    /// - `NoVotingPower`: Voter held no tokens at the record counter
    pub fn cast_vote(env: Env, voter: Address, index: u32, support: bool) -> Result<(), Error> {
        let token = Storage::token(&env)?;
        voter.require_auth();

        let mut proposal = Storage::proposal(&env, index)?;
        if env.ledger().timestamp() >= proposal.voting_end {
            return Err(Error::VotingClosed);
        }

        let weight = external::balance_of_at(&env, &token, &voter, proposal.record_counter);
        if weight <= 0 {
            return Err(Error::NoVotingPower);
        }

        let previous = Storage::vote(&env, index, &voter);
        let (yes, no) = tally::apply_vote(
            proposal.yes_weight,
            proposal.no_weight,
            previous.as_ref().map(|v| (v.support, v.weight)),
            support,
            weight,
        )
        .ok_or(Error::InvalidAmount)?;

        proposal.yes_weight = yes;
        proposal.no_weight = no;
        if previous.is_none() {
            proposal.vote_count += 1;
        }
        Storage::set_proposal(&env, index, &proposal);
        Storage::set_vote(&env, index, &voter, &Vote { support, weight });

        env.events().publish(
            (Symbol::new(&env, "proposal_voted"), voter.clone()),
            ProposalVotedEvent {
                account: voter,
                proposal_index: index,
                support,
                weight,
            },
        );

        Ok(())
    }

    /// Close the tally of an ended proposal; callable by anyone, once.
    /// Returns whether the proposal passed.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidIndex`: No such proposal
    /// - `VotingOpen`: Voting period still running
    /// - `ResultAlreadyRevealed`: Result already computed
    pub fn calculate_results(env: Env, index: u32) -> Result<bool, Error> {
        let token = Storage::token(&env)?;

        let mut proposal = Storage::proposal(&env, index)?;
        if env.ledger().timestamp() < proposal.voting_end {
            return Err(Error::VotingOpen);
        }
        if proposal.result_revealed {
            return Err(Error::ResultAlreadyRevealed);
        }

        let total_supply = external::total_supply_at(&env, &token, proposal.record_counter);
        let result = tally::passed(
            proposal.yes_weight,
            proposal.no_weight,
            proposal.quorum,
            total_supply,
        )
        .ok_or(Error::InvalidAmount)?;

        proposal.result_revealed = true;
        proposal.result = result;
        Storage::set_proposal(&env, index, &proposal);

        log!(&env, "proposal closed", index, result);

        env.events().publish(
            (Symbol::new(&env, "proposal_result"),),
            ProposalResultEvent {
                proposal_index: index,
                result,
                yes_weight: proposal.yes_weight,
                no_weight: proposal.no_weight,
            },
        );

        Ok(result)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_proposal(env: Env, index: u32) -> Result<Proposal, Error> {
        Storage::proposal(&env, index)
    }

    pub fn proposal_count(env: Env) -> u32 {
        Storage::proposal_count(&env)
    }

    pub fn vote_of(env: Env, index: u32, voter: Address) -> Option<Vote> {
        Storage::vote(&env, index, &voter)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Storage::owner(&env)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        Storage::token(&env)
    }
}

#[cfg(test)]
mod test;
