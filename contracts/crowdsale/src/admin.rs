use soroban_sdk::{log, Address, Env, Symbol, Vec};

use crate::error::Error;
use crate::events::{AccountEvent, OwnershipTransferredEvent, RateUpdatedEvent};
use crate::external;
use crate::pricing::rate_for_fiat;
use crate::storage::{DataKey, Round, SaleConfig, Storage, BATCH_LIMIT, DISCOUNT_BASE};

pub struct Admin;

impl Admin {
    pub fn initialize(
        env: &Env,
        owner: &Address,
        config: SaleConfig,
        rounds: &Vec<Round>,
    ) -> Result<(), Error> {
        if Storage::is_initialized(env) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if config.initial_rate <= 0 || config.initial_fiat_rate <= 0 {
            return Err(Error::InvalidRate);
        }
        if config.starting_time <= env.ledger().timestamp() {
            return Err(Error::InvalidStartingTime);
        }
        if config.token == config.wallet || config.token == config.payment_token {
            return Err(Error::InvalidAddress);
        }
        Self::validate_rounds(rounds)?;

        env.storage().instance().set(&DataKey::Initialized, &true);
        Storage::set_owner(env, owner);
        Storage::set_rate(env, config.initial_rate);
        Storage::set_fiat_rate(env, config.initial_fiat_rate);
        Storage::set_rounds(env, rounds);
        Storage::set_current_round(env, 0);
        Storage::set_minted(env, 0);
        Storage::set_wei_raised(env, 0);
        Storage::set_paused(env, false);
        Storage::set_manager(env, owner, true);
        env.storage().instance().set(&DataKey::Config, &config);

        Ok(())
    }

    /// Caps increase strictly and every discount lies in (0, DISCOUNT_BASE].
    pub fn validate_rounds(rounds: &Vec<Round>) -> Result<(), Error> {
        if rounds.is_empty() {
            return Err(Error::InvalidRounds);
        }

        let mut previous_cap = 0i128;
        for round in rounds.iter() {
            if round.cap <= previous_cap {
                return Err(Error::InvalidRounds);
            }
            if round.discount <= 0 || round.discount > DISCOUNT_BASE {
                return Err(Error::InvalidRounds);
            }
            previous_cap = round.cap;
        }
        Ok(())
    }

    /// Wire the round vaults and the reserve vault, then hand the sale over
    /// to `new_owner`.
    pub fn setup(
        env: &Env,
        new_owner: &Address,
        round_vaults: &Vec<Address>,
        reserve_vault: &Address,
    ) -> Result<(), Error> {
        let owner = Storage::owner(env)?;
        owner.require_auth();

        if Storage::is_set_up(env) {
            return Err(Error::AlreadySetUp);
        }
        if round_vaults.len() != Storage::rounds(env)?.len() {
            return Err(Error::LengthMismatch);
        }

        let this = env.current_contract_address();
        if *reserve_vault == this || round_vaults.contains(&this) {
            return Err(Error::InvalidAddress);
        }

        Storage::set_vaults(env, round_vaults, reserve_vault);

        if !Storage::is_manager(env, new_owner) {
            Storage::set_manager(env, new_owner, true);
            Self::publish_account(env, "manager_added", new_owner);
        }
        if owner != *new_owner && Storage::is_manager(env, &owner) {
            Storage::set_manager(env, &owner, false);
            Self::publish_account(env, "manager_removed", &owner);
        }
        Self::set_owner_internal(env, &owner, new_owner);

        log!(env, "crowdsale set up", round_vaults.len(), reserve_vault.clone());
        Ok(())
    }

    // ============================================
    // OWNERSHIP & MANAGERS
    // ============================================

    pub fn transfer_ownership(env: &Env, new_owner: &Address) -> Result<(), Error> {
        let owner = Storage::owner(env)?;
        owner.require_auth();

        Self::set_owner_internal(env, &owner, new_owner);
        Ok(())
    }

    pub fn add_managers(env: &Env, caller: &Address, accounts: &Vec<Address>) -> Result<(), Error> {
        let owner = Storage::owner(env)?;
        caller.require_auth();

        if *caller != owner && !Storage::is_manager(env, caller) {
            return Err(Error::NotManager);
        }
        Self::check_batch(accounts.len())?;

        for account in accounts.iter() {
            if Storage::is_manager(env, &account) {
                return Err(Error::AlreadyManager);
            }
            Storage::set_manager(env, &account, true);
            Self::publish_account(env, "manager_added", &account);
        }
        Ok(())
    }

    pub fn remove_manager(env: &Env, account: &Address) -> Result<(), Error> {
        let owner = Storage::owner(env)?;
        owner.require_auth();

        Self::revoke_manager(env, account)
    }

    pub fn renounce_manager(env: &Env, account: &Address) -> Result<(), Error> {
        Storage::owner(env)?;
        account.require_auth();

        Self::revoke_manager(env, account)
    }

    /// Authenticate `manager` and check the role
    pub fn require_manager(env: &Env, manager: &Address) -> Result<(), Error> {
        if !Storage::is_initialized(env) {
            return Err(Error::NotInitialized);
        }
        manager.require_auth();

        if !Storage::is_manager(env, manager) {
            return Err(Error::NotManager);
        }
        Ok(())
    }

    // ============================================
    // WHITELIST
    // ============================================

    pub fn add_whitelisteds(env: &Env, manager: &Address, accounts: &Vec<Address>) -> Result<(), Error> {
        Self::require_manager(env, manager)?;
        Self::check_batch(accounts.len())?;

        for account in accounts.iter() {
            if Storage::is_whitelisted(env, &account) {
                return Err(Error::AlreadyWhitelisted);
            }
            Storage::set_whitelisted(env, &account, true);
            Self::publish_account(env, "whitelist_added", &account);
        }
        Ok(())
    }

    pub fn remove_whitelisteds(
        env: &Env,
        manager: &Address,
        accounts: &Vec<Address>,
    ) -> Result<(), Error> {
        Self::require_manager(env, manager)?;
        Self::check_batch(accounts.len())?;

        for account in accounts.iter() {
            if !Storage::is_whitelisted(env, &account) {
                return Err(Error::NotWhitelisted);
            }
            Storage::set_whitelisted(env, &account, false);
            Self::publish_account(env, "whitelist_removed", &account);
        }
        Ok(())
    }

    // ============================================
    // PAUSE & RATE
    // ============================================

    pub fn pause(env: &Env, manager: &Address) -> Result<(), Error> {
        Self::require_manager(env, manager)?;

        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Storage::set_paused(env, true);
        Self::publish_account(env, "paused", manager);
        Ok(())
    }

    /// Resume the sale once the crowdsale holds the token's minter role
    pub fn unpause(env: &Env, manager: &Address) -> Result<(), Error> {
        Self::require_manager(env, manager)?;

        if !Storage::is_paused(env) {
            return Err(Error::NotPaused);
        }

        let config = Storage::config(env)?;
        if !external::is_minter(env, &config.token, &env.current_contract_address()) {
            return Err(Error::MinterRoleMissing);
        }

        Storage::set_paused(env, false);
        Self::publish_account(env, "unpaused", manager);
        Ok(())
    }

    pub fn update_rate(env: &Env, manager: &Address, fiat_rate: i128) -> Result<i128, Error> {
        Self::require_manager(env, manager)?;

        if fiat_rate <= 0 {
            return Err(Error::InvalidRate);
        }

        let config = Storage::config(env)?;
        let rate = rate_for_fiat(fiat_rate, config.initial_rate, config.initial_fiat_rate)
            .ok_or(Error::InvalidRate)?;
        if rate <= 0 {
            return Err(Error::InvalidRate);
        }

        Storage::set_fiat_rate(env, fiat_rate);
        Storage::set_rate(env, rate);

        env.events().publish(
            (Symbol::new(env, "rate_updated"),),
            RateUpdatedEvent { fiat_rate, rate },
        );
        Ok(rate)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    /// Non-empty and strictly below `BATCH_LIMIT`
    pub fn check_batch(len: u32) -> Result<(), Error> {
        if len == 0 || len >= BATCH_LIMIT {
            return Err(Error::InvalidBatchLength);
        }
        Ok(())
    }

    fn revoke_manager(env: &Env, account: &Address) -> Result<(), Error> {
        if !Storage::is_manager(env, account) {
            return Err(Error::NotManager);
        }
        if Storage::manager_count(env) <= 1 {
            return Err(Error::LastManager);
        }

        Storage::set_manager(env, account, false);
        Self::publish_account(env, "manager_removed", account);
        Ok(())
    }

    fn set_owner_internal(env: &Env, previous_owner: &Address, new_owner: &Address) {
        Storage::set_owner(env, new_owner);
        env.events().publish(
            (Symbol::new(env, "owner_changed"),),
            OwnershipTransferredEvent {
                previous_owner: previous_owner.clone(),
                new_owner: new_owner.clone(),
            },
        );
    }

    pub fn publish_account(env: &Env, topic: &str, account: &Address) {
        env.events().publish(
            (Symbol::new(env, topic), account.clone()),
            AccountEvent {
                account: account.clone(),
            },
        );
    }
}
