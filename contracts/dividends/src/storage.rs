use soroban_sdk::{contracttype, Address, Env};

use crate::error::Error;

/// One payout, claimable pro rata to the balances at `record_counter`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dividend {
    pub payout_token: Address,
    /// Snapshot counter balances are read at
    pub record_counter: u32,
    pub record_time: u64,
    pub claim_period_end: u64,
    pub amount: i128,
    pub claimed_amount: i128,
    /// Token supply at `record_counter`
    pub total_supply: i128,
    pub recycled: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Token,
    DividendCount,
    Dividend(u32),
    Claimed(u32, Address),
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

    // Dividends
    pub fn dividend_count(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::DividendCount)
            .unwrap_or(0)
    }

    pub fn dividend(env: &Env, index: u32) -> Result<Dividend, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Dividend(index))
            .ok_or(Error::InvalidIndex)
    }

    pub fn set_dividend(env: &Env, index: u32, dividend: &Dividend) {
        env.storage()
            .persistent()
            .set(&DataKey::Dividend(index), dividend);
    }

    /// Append a dividend and return its index
    pub fn push_dividend(env: &Env, dividend: &Dividend) -> u32 {
        let index = Self::dividend_count(env);
        Self::set_dividend(env, index, dividend);
        env.storage()
            .instance()
            .set(&DataKey::DividendCount, &(index + 1));
        index
    }

    // Claims
    pub fn has_claimed(env: &Env, index: u32, account: &Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Claimed(index, account.clone()))
            .unwrap_or(false)
    }

    pub fn set_claimed(env: &Env, index: u32, account: &Address) {
        env.storage()
            .persistent()
            .set(&DataKey::Claimed(index, account.clone()), &true);
    }
}
