#![no_std]

mod error;
mod events;
mod external;
mod payout;
mod storage;

pub use error::Error;
pub use storage::Dividend;

use events::*;
use storage::{DataKey, Storage};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};

#[contract]
pub struct DividendDistributor;

#[contractimpl]
impl DividendDistributor {
    // ============================================
    // INITIALIZATION & OWNERSHIP
    // ============================================

    /// Initialize the distributor for the snapshot token `token`
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAddress`: Token is the distributor itself
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
    // DEPOSIT & RECYCLE
    // ============================================

    /// Deposit `amount` of `payout_token` as a new dividend, pulled from the
    /// owner through a prior allowance. Entitlements are fixed by the token
    /// balances at the last sealed snapshot counter. Returns the dividend index.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InvalidPeriod`: Claim period is zero
    /// - `InvalidAddress`: Payout token is the distributor itself
    pub fn deposit_dividend(
        env: Env,
        payout_token: Address,
        claim_period: u64,
        amount: i128,
    ) -> Result<u32, Error> {
        let owner = Storage::owner(&env)?;
        owner.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if claim_period == 0 {
            return Err(Error::InvalidPeriod);
        }

        let this = env.current_contract_address();
        if payout_token == this {
            return Err(Error::InvalidAddress);
        }

        token::Client::new(&env, &payout_token).transfer_from(&this, &owner, &this, &amount);

        // writes in the current ledger may still change the current counter
        let record_counter = env.ledger().sequence().saturating_sub(1);
        let now = env.ledger().timestamp();
        let total_supply = external::total_supply_at(&env, &Storage::token(&env)?, record_counter);

        let index = Storage::push_dividend(
            &env,
            &Dividend {
                payout_token: payout_token.clone(),
                record_counter,
                record_time: now,
                claim_period_end: now.saturating_add(claim_period),
                amount,
                claimed_amount: 0,
                total_supply,
                recycled: false,
            },
        );

        log!(&env, "dividend deposited", index, amount, record_counter);

        env.events().publish(
            (Symbol::new(&env, "dividend_deposited"), payout_token.clone()),
            DividendDepositedEvent {
                dividend_index: index,
                payout_token,
                payout_amount: amount,
                claim_period,
                record_date: record_counter,
            },
        );

        Ok(index)
    }

    /// Return the unclaimed remainder of an expired dividend to the owner and
    /// close it. Returns the recycled amount.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidIndex`: No such dividend
    /// - `DividendRecycled`: Already recycled
    /// - `ClaimPeriodNotOver`: Claim period still running
    pub fn recycle_dividend(env: Env, index: u32) -> Result<i128, Error> {
        let owner = Storage::owner(&env)?;
        owner.require_auth();

        let mut dividend = Storage::dividend(&env, index)?;
        if dividend.recycled {
            return Err(Error::DividendRecycled);
        }
        if env.ledger().timestamp() < dividend.claim_period_end {
            return Err(Error::ClaimPeriodNotOver);
        }

        let remainder = payout::outstanding(dividend.amount, dividend.claimed_amount);
        dividend.recycled = true;
        Storage::set_dividend(&env, index, &dividend);

        if remainder > 0 {
            token::Client::new(&env, &dividend.payout_token).transfer(
                &env.current_contract_address(),
                &owner,
                &remainder,
            );
        }

        log!(&env, "dividend recycled", index, remainder);

        env.events().publish(
            (Symbol::new(&env, "dividend_recycled"),),
            DividendRecycledEvent {
                dividend_index: index,
                recycled_amount: remainder,
            },
        );

        Ok(remainder)
    }

    /// Sweep whatever `token` balance no open dividend still owes to the
    /// owner. Returns the swept amount.
    pub fn reclaim_token(env: Env, token: Address) -> Result<i128, Error> {
        let owner = Storage::owner(&env)?;
        owner.require_auth();

        let this = env.current_contract_address();
        let client = token::Client::new(&env, &token);

        let mut owed = 0i128;
        for index in 0..Storage::dividend_count(&env) {
            let dividend = Storage::dividend(&env, index)?;
            if dividend.payout_token == token && !dividend.recycled {
                owed = owed
                    .checked_add(payout::outstanding(dividend.amount, dividend.claimed_amount))
                    .ok_or(Error::InvalidAmount)?;
            }
        }

        let reclaimable = client.balance(&this) - owed;
        if reclaimable <= 0 {
            return Ok(0);
        }

        client.transfer(&this, &owner, &reclaimable);
        env.events().publish(
            (Symbol::new(&env, "reclaimed"),),
            TokenReclaimedEvent {
                token,
                amount: reclaimable,
            },
        );

        Ok(reclaimable)
    }

    // ============================================
    // CLAIMS
    // ============================================

    /// Claim the caller's share of dividend `index`. A holder without a
    /// balance at the record counter claims zero and may try again.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidIndex`: No such dividend
    /// - `DividendRecycled`: Dividend was recycled
    /// - `ClaimPeriodOver`: Claim period has ended
    /// - `AlreadyClaimed`: Share already paid out
    pub fn claim_dividend(env: Env, claimer: Address, index: u32) -> Result<i128, Error> {
        Storage::owner(&env)?;
        claimer.require_auth();

        let mut dividend = Storage::dividend(&env, index)?;
        if dividend.recycled {
            return Err(Error::DividendRecycled);
        }
        if env.ledger().timestamp() >= dividend.claim_period_end {
            return Err(Error::ClaimPeriodOver);
        }
        if Storage::has_claimed(&env, index, &claimer) {
            return Err(Error::AlreadyClaimed);
        }

        Self::pay_out(&env, &claimer, index, &mut dividend)
    }

    /// Claim every open dividend from `start_index` on that the caller has
    /// not claimed yet. Returns the total paid out.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidIndex`: `start_index` is past the last dividend
    pub fn claim_all_dividends(env: Env, claimer: Address, start_index: u32) -> Result<i128, Error> {
        Storage::owner(&env)?;
        claimer.require_auth();

        let count = Storage::dividend_count(&env);
        if start_index >= count {
            return Err(Error::InvalidIndex);
        }

        let now = env.ledger().timestamp();
        let mut total = 0i128;
        for index in start_index..count {
            let mut dividend = Storage::dividend(&env, index)?;
            if dividend.recycled
                || now >= dividend.claim_period_end
                || Storage::has_claimed(&env, index, &claimer)
            {
                continue;
            }

            let paid = Self::pay_out(&env, &claimer, index, &mut dividend)?;
            total = total.checked_add(paid).ok_or(Error::InvalidAmount)?;
        }

        Ok(total)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_dividend(env: Env, index: u32) -> Result<Dividend, Error> {
        Storage::dividend(&env, index)
    }

    pub fn dividend_count(env: Env) -> u32 {
        Storage::dividend_count(&env)
    }

    pub fn has_claimed(env: Env, account: Address, index: u32) -> bool {
        Storage::has_claimed(&env, index, &account)
    }

    /// What `account` would receive from dividend `index` right now
    pub fn claimable(env: Env, account: Address, index: u32) -> Result<i128, Error> {
        let dividend = Storage::dividend(&env, index)?;
        if dividend.recycled
            || env.ledger().timestamp() >= dividend.claim_period_end
            || Storage::has_claimed(&env, index, &account)
        {
            return Ok(0);
        }
        Self::entitlement(&env, &account, &dividend)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Storage::owner(&env)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        Storage::token(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn entitlement(env: &Env, account: &Address, dividend: &Dividend) -> Result<i128, Error> {
        let balance =
            external::balance_of_at(env, &Storage::token(env)?, account, dividend.record_counter);
        payout::share(dividend.amount, balance, dividend.total_supply).ok_or(Error::InvalidAmount)
    }

    /// Pay the claimer's share and emit the claim, zero shares included.
    /// Only a positive payout marks the dividend as claimed.
    fn pay_out(
        env: &Env,
        claimer: &Address,
        index: u32,
        dividend: &mut Dividend,
    ) -> Result<i128, Error> {
        let amount = Self::entitlement(env, claimer, dividend)?;

        if amount > 0 {
            dividend.claimed_amount = dividend
                .claimed_amount
                .checked_add(amount)
                .ok_or(Error::InvalidAmount)?;
            if dividend.claimed_amount > dividend.amount {
                return Err(Error::InvalidAmount);
            }
            Storage::set_dividend(env, index, dividend);
            Storage::set_claimed(env, index, claimer);

            token::Client::new(env, &dividend.payout_token).transfer(
                &env.current_contract_address(),
                claimer,
                &amount,
            );
        }

        env.events().publish(
            (Symbol::new(env, "dividend_claimed"), claimer.clone()),
            DividendClaimedEvent {
                dividend_index: index,
                claimer: claimer.clone(),
                claimed_amount: amount,
            },
        );

        Ok(amount)
    }
}

#[cfg(test)]
mod test;
