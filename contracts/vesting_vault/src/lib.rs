#![no_std]

mod error;
mod events;
mod storage;
mod vesting;

pub use error::Error;
pub use storage::{Allocation, Schedule, VestingKind, BATCH_LIMIT};

use events::*;
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol, Vec};

#[contract]
pub struct VestingVault;

#[contractimpl]
impl VestingVault {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the vault
    ///
    /// A `release_time` of 0 leaves the release time unknown until the
    /// crowdsale calls `update_release_time`.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAddress`: Crowdsale is the owner, or token is the vault
    /// - `InvalidSchedule`: Linear schedule with no vesting duration
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        crowdsale: Address,
        schedule: Schedule,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if crowdsale == owner || token == env.current_contract_address() {
            return Err(Error::InvalidAddress);
        }
        if schedule.kind == VestingKind::Linear && schedule.vesting_duration == 0 {
            return Err(Error::InvalidSchedule);
        }

        let known = schedule.release_time > 0;

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Crowdsale, &crowdsale);
        env.storage()
            .instance()
            .set(&DataKey::ReleaseTime, &schedule.release_time);
        env.storage()
            .instance()
            .set(&DataKey::KnownReleaseTime, &known);
        env.storage().instance().set(&DataKey::Schedule, &schedule);
        env.storage().instance().set(&DataKey::TotalBalance, &0i128);
        env.storage()
            .instance()
            .set(&DataKey::Manager(owner), &true);

        Ok(())
    }

    /// Grant the manager role (owner only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AlreadyManager`: Account already a manager
    pub fn add_manager(env: Env, account: Address) -> Result<(), Error> {
        let owner = Self::owner(env.clone())?;
        owner.require_auth();

        let key = DataKey::Manager(account);
        if env.storage().instance().has(&key) {
            return Err(Error::AlreadyManager);
        }
        env.storage().instance().set(&key, &true);
        Ok(())
    }

    /// Revoke the manager role (owner only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Account is not a manager
    pub fn remove_manager(env: Env, account: Address) -> Result<(), Error> {
        let owner = Self::owner(env.clone())?;
        owner.require_auth();

        let key = DataKey::Manager(account);
        if !env.storage().instance().has(&key) {
            return Err(Error::NotManager);
        }
        env.storage().instance().remove(&key);
        Ok(())
    }

    /// Hand ownership to another account
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), Error> {
        let owner = Self::owner(env.clone())?;
        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &new_owner);
        Ok(())
    }

    // ============================================
    // FUNDING
    // ============================================

    /// Credit `amount` to `beneficiary`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Caller is neither a manager nor the crowdsale
    /// - `InvalidAmount`: Amount <= 0
    /// - `FundingClosed`: Funding phase is over
    /// - `ExceedsFundedBalance`: Vault does not hold enough tokens
    pub fn receive_for(
        env: Env,
        caller: Address,
        beneficiary: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::require_funder(&env, &caller)?;
        Self::check_funding_open(&env)?;

        Self::credit(&env, &beneficiary, amount)?;
        Self::check_funded(&env)
    }

    /// Credit several beneficiaries at once
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Caller is neither a manager nor the crowdsale
    /// - `LengthMismatch`: Lists differ in length
    /// - `InvalidBatchLength`: Empty list or `BATCH_LIMIT` entries or more
    /// - `InvalidAmount`: An amount <= 0
    /// - `FundingClosed`: Funding phase is over
    /// - `ExceedsFundedBalance`: Vault does not hold enough tokens
    pub fn batch_receive_for(
        env: Env,
        caller: Address,
        beneficiaries: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), Error> {
        Self::require_funder(&env, &caller)?;

        if beneficiaries.len() != amounts.len() {
            return Err(Error::LengthMismatch);
        }
        if beneficiaries.is_empty() || beneficiaries.len() >= BATCH_LIMIT {
            return Err(Error::InvalidBatchLength);
        }

        Self::check_funding_open(&env)?;

        for (beneficiary, amount) in beneficiaries.iter().zip(amounts.iter()) {
            Self::credit(&env, &beneficiary, amount)?;
        }
        Self::check_funded(&env)
    }

    /// Fix the release time relative to `anchor` (crowdsale only, once)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotCrowdsale`: Caller is not the crowdsale
    /// - `ReleaseTimeAlreadyKnown`: Release time already fixed
    pub fn update_release_time(env: Env, crowdsale: Address, anchor: u64) -> Result<(), Error> {
        let expected: Address = env
            .storage()
            .instance()
            .get(&DataKey::Crowdsale)
            .ok_or(Error::NotInitialized)?;
        crowdsale.require_auth();

        if crowdsale != expected {
            return Err(Error::NotCrowdsale);
        }
        if Self::known_release_time(env.clone()) {
            return Err(Error::ReleaseTimeAlreadyKnown);
        }

        let schedule = Self::schedule(env.clone())?;
        let release_time = anchor.saturating_add(schedule.lock_duration);

        env.storage()
            .instance()
            .set(&DataKey::ReleaseTime, &release_time);
        env.storage()
            .instance()
            .set(&DataKey::KnownReleaseTime, &true);

        env.events().publish(
            (Symbol::new(&env, "release_time_set"),),
            ReleaseTimeUpdatedEvent { release_time },
        );

        Ok(())
    }

    // ============================================
    // RELEASE
    // ============================================

    /// Release the caller's vested tokens
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ReleaseTimeNotReached`: Release time unknown or in the future
    /// - `NoAllocation`: Beneficiary has no allocation
    /// - `NothingToRelease`: Nothing vested since the last release
    pub fn release(env: Env, beneficiary: Address) -> Result<i128, Error> {
        beneficiary.require_auth();
        Self::release_internal(&env, &beneficiary)
    }

    /// Release vested tokens to `beneficiary`; callable by anyone
    ///
    /// # Errors
    /// Same as `release`
    pub fn release_for(env: Env, beneficiary: Address) -> Result<i128, Error> {
        Self::release_internal(&env, &beneficiary)
    }

    /// Sweep tokens not backing any allocation to the owner
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn reclaim_token(env: Env, token: Address) -> Result<i128, Error> {
        let owner = Self::owner(env.clone())?;
        owner.require_auth();

        let this = env.current_contract_address();
        let client = token::Client::new(&env, &token);
        let balance = client.balance(&this);

        let reclaimable = if token == Self::token(env.clone())? {
            balance - Self::total_balance(env.clone())
        } else {
            balance
        };

        if reclaimable > 0 {
            client.transfer(&this, &owner, &reclaimable);
            env.events().publish(
                (Symbol::new(&env, "reclaimed"),),
                TokenReclaimedEvent {
                    token,
                    amount: reclaimable,
                },
            );
        }

        Ok(reclaimable.max(0))
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn initial_balance_of(env: Env, account: Address) -> i128 {
        Self::allocation(&env, &account).map_or(0, |a| a.initial)
    }

    pub fn balance_of(env: Env, account: Address) -> i128 {
        Self::allocation(&env, &account).map_or(0, |a| a.remaining)
    }

    /// Amount `account` could release right now
    pub fn releasable_amount(env: Env, account: Address) -> Result<i128, Error> {
        let allocation = match Self::allocation(&env, &account) {
            Some(a) => a,
            None => return Ok(0),
        };
        if !Self::known_release_time(env.clone()) {
            return Ok(0);
        }
        Self::due(&env, &allocation)
    }

    /// Sum of all unreleased allocations
    pub fn total_balance(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalBalance)
            .unwrap_or(0)
    }

    pub fn known_release_time(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::KnownReleaseTime)
            .unwrap_or(false)
    }

    /// Cliff timestamp, 0 while unknown
    pub fn release_time(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::ReleaseTime)
            .unwrap_or(0)
    }

    /// Full unlock timestamp, 0 while unknown
    pub fn end_time(env: Env) -> Result<u64, Error> {
        let schedule = Self::schedule(env.clone())?;
        if !Self::known_release_time(env.clone()) {
            return Ok(0);
        }
        Ok(Self::end_of(&schedule, Self::release_time(env)))
    }

    /// Funding deadline, 0 when funding runs until the release time
    pub fn update_time(env: Env) -> Result<u64, Error> {
        Ok(Self::schedule(env)?.funding_deadline)
    }

    pub fn schedule(env: Env) -> Result<Schedule, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Schedule)
            .ok_or(Error::NotInitialized)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    pub fn crowdsale(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Crowdsale)
            .ok_or(Error::NotInitialized)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_manager(env: Env, account: Address) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Manager(account))
            .unwrap_or(false)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_funder(env: &Env, caller: &Address) -> Result<(), Error> {
        let crowdsale = Self::crowdsale(env.clone())?;
        caller.require_auth();

        if *caller != crowdsale && !Self::is_manager(env.clone(), caller.clone()) {
            return Err(Error::NotManager);
        }
        Ok(())
    }

    fn check_funding_open(env: &Env) -> Result<(), Error> {
        let schedule = Self::schedule(env.clone())?;
        let now = env.ledger().timestamp();

        let open = if schedule.funding_deadline > 0 {
            now < schedule.funding_deadline
        } else if !Self::known_release_time(env.clone()) {
            true
        } else {
            now < Self::release_time(env.clone())
        };

        if !open {
            return Err(Error::FundingClosed);
        }
        Ok(())
    }

    fn check_funded(env: &Env) -> Result<(), Error> {
        let token = Self::token(env.clone())?;
        let held = token::Client::new(env, &token).balance(&env.current_contract_address());

        if Self::total_balance(env.clone()) > held {
            return Err(Error::ExceedsFundedBalance);
        }
        Ok(())
    }

    fn credit(env: &Env, beneficiary: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut allocation = Self::allocation(env, beneficiary).unwrap_or(Allocation {
            initial: 0,
            remaining: 0,
        });
        allocation.initial = allocation
            .initial
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        allocation.remaining = allocation
            .remaining
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        let total = Self::total_balance(env.clone())
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        env.storage()
            .persistent()
            .set(&DataKey::Allocation(beneficiary.clone()), &allocation);
        env.storage().instance().set(&DataKey::TotalBalance, &total);

        env.events().publish(
            (Symbol::new(env, "received"), beneficiary.clone()),
            ReceivedEvent {
                owner: beneficiary.clone(),
                value: amount,
            },
        );
        Ok(())
    }

    fn release_internal(env: &Env, beneficiary: &Address) -> Result<i128, Error> {
        if !Self::known_release_time(env.clone())
            || env.ledger().timestamp() < Self::release_time(env.clone())
        {
            return Err(Error::ReleaseTimeNotReached);
        }

        let mut allocation = Self::allocation(env, beneficiary).ok_or(Error::NoAllocation)?;
        let amount = Self::due(env, &allocation)?;
        if amount <= 0 {
            return Err(Error::NothingToRelease);
        }

        allocation.remaining -= amount;
        env.storage()
            .persistent()
            .set(&DataKey::Allocation(beneficiary.clone()), &allocation);
        env.storage()
            .instance()
            .set(&DataKey::TotalBalance, &(Self::total_balance(env.clone()) - amount));

        let token = Self::token(env.clone())?;
        token::Client::new(env, &token).transfer(
            &env.current_contract_address(),
            beneficiary,
            &amount,
        );

        log!(env, "released", beneficiary.clone(), amount);

        env.events().publish(
            (Symbol::new(env, "released"), beneficiary.clone()),
            ReleasedEvent {
                owner: beneficiary.clone(),
                value: amount,
            },
        );

        Ok(amount)
    }

    fn due(env: &Env, allocation: &Allocation) -> Result<i128, Error> {
        let schedule = Self::schedule(env.clone())?;
        let cliff = Self::release_time(env.clone());

        vesting::releasable_amount(
            schedule.kind,
            allocation.initial,
            allocation.remaining,
            cliff,
            Self::end_of(&schedule, cliff),
            env.ledger().timestamp(),
        )
        .ok_or(Error::InvalidAmount)
    }

    fn end_of(schedule: &Schedule, cliff: u64) -> u64 {
        match schedule.kind {
            VestingKind::Cliff => cliff,
            VestingKind::Linear => cliff.saturating_add(schedule.vesting_duration),
        }
    }

    fn allocation(env: &Env, account: &Address) -> Option<Allocation> {
        env.storage()
            .persistent()
            .get(&DataKey::Allocation(account.clone()))
    }
}
