use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::Error;

// Constants
/// Share of each payment converted to tokens, the rest is the compliance fee
pub const FEE_NUMERATOR: i128 = 965;
pub const FEE_DENOMINATOR: i128 = 1_000;
/// Denominator of the round discounts
pub const DISCOUNT_BASE: i128 = 100;
/// Maximum number of entries in a batch call
pub const BATCH_LIMIT: u32 = 300;

/// One pricing tier
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Round {
    /// Cumulative number of tokens sold once the round is over
    pub cap: i128,
    /// Price factor over `DISCOUNT_BASE` (70 = 30% off)
    pub discount: i128,
}

/// Deployment parameters fixed at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    pub token: Address,
    pub payment_token: Address,
    pub wallet: Address,
    pub starting_time: u64,
    pub initial_rate: i128,
    pub initial_fiat_rate: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Config,
    Rate,
    FiatRate,
    Rounds,
    CurrentRound,
    Minted,
    WeiRaised,
    Paused,
    Finalized,
    RoundVaults,
    ReserveVault,
    ManagerCount,
    Manager(Address),
    Whitelisted(Address),
}

pub struct Storage;

impl Storage {
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Initialized)
    }

    // Owner
    pub fn owner(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_owner(env: &Env, owner: &Address) {
        env.storage().instance().set(&DataKey::Owner, owner);
    }

    pub fn config(env: &Env) -> Result<SaleConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    // Pricing
    pub fn rate(env: &Env) -> i128 {
        env.storage().instance().get(&DataKey::Rate).unwrap_or(0)
    }

    pub fn set_rate(env: &Env, rate: i128) {
        env.storage().instance().set(&DataKey::Rate, &rate);
    }

    pub fn fiat_rate(env: &Env) -> i128 {
        env.storage().instance().get(&DataKey::FiatRate).unwrap_or(0)
    }

    pub fn set_fiat_rate(env: &Env, fiat_rate: i128) {
        env.storage().instance().set(&DataKey::FiatRate, &fiat_rate);
    }

    // Rounds
    pub fn rounds(env: &Env) -> Result<Vec<Round>, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Rounds)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_rounds(env: &Env, rounds: &Vec<Round>) {
        env.storage().instance().set(&DataKey::Rounds, rounds);
    }

    pub fn current_round(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::CurrentRound)
            .unwrap_or(0)
    }

    pub fn set_current_round(env: &Env, round: u32) {
        env.storage().instance().set(&DataKey::CurrentRound, &round);
    }

    // Sale totals
    pub fn minted(env: &Env) -> i128 {
        env.storage().instance().get(&DataKey::Minted).unwrap_or(0)
    }

    pub fn set_minted(env: &Env, minted: i128) {
        env.storage().instance().set(&DataKey::Minted, &minted);
    }

    pub fn wei_raised(env: &Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::WeiRaised)
            .unwrap_or(0)
    }

    pub fn set_wei_raised(env: &Env, raised: i128) {
        env.storage().instance().set(&DataKey::WeiRaised, &raised);
    }

    // Flags
    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn set_paused(env: &Env, paused: bool) {
        env.storage().instance().set(&DataKey::Paused, &paused);
    }

    pub fn is_finalized(env: &Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Finalized)
            .unwrap_or(false)
    }

    pub fn set_finalized(env: &Env) {
        env.storage().instance().set(&DataKey::Finalized, &true);
    }

    // Vaults
    pub fn round_vaults(env: &Env) -> Result<Vec<Address>, Error> {
        env.storage()
            .instance()
            .get(&DataKey::RoundVaults)
            .ok_or(Error::NotSetUp)
    }

    pub fn reserve_vault(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::ReserveVault)
            .ok_or(Error::NotSetUp)
    }

    pub fn set_vaults(env: &Env, round_vaults: &Vec<Address>, reserve_vault: &Address) {
        env.storage()
            .instance()
            .set(&DataKey::RoundVaults, round_vaults);
        env.storage()
            .instance()
            .set(&DataKey::ReserveVault, reserve_vault);
    }

    pub fn is_set_up(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::RoundVaults)
    }

    // Managers
    pub fn is_manager(env: &Env, account: &Address) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Manager(account.clone()))
            .unwrap_or(false)
    }

    pub fn manager_count(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::ManagerCount)
            .unwrap_or(0)
    }

    /// Callers check the current membership first.
    pub fn set_manager(env: &Env, account: &Address, granted: bool) {
        let key = DataKey::Manager(account.clone());
        let count = Self::manager_count(env);
        if granted {
            env.storage().instance().set(&key, &true);
            env.storage()
                .instance()
                .set(&DataKey::ManagerCount, &(count + 1));
        } else {
            env.storage().instance().remove(&key);
            env.storage()
                .instance()
                .set(&DataKey::ManagerCount, &count.saturating_sub(1));
        }
    }

    // Whitelist
    pub fn is_whitelisted(env: &Env, account: &Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Whitelisted(account.clone()))
            .unwrap_or(false)
    }

    pub fn set_whitelisted(env: &Env, account: &Address, listed: bool) {
        let key = DataKey::Whitelisted(account.clone());
        if listed {
            env.storage().persistent().set(&key, &true);
        } else {
            env.storage().persistent().remove(&key);
        }
    }
}
