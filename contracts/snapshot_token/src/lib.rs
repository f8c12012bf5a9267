#![no_std]

mod error;
mod events;
mod snapshots;
mod storage;

pub use error::Error;
pub use storage::{AllowanceValue, Snapshot, SnapshotSubject};

use events::*;
use storage::{DataKey, Storage, TokenMetadata};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, String, Symbol, Vec};

#[contract]
pub struct SnapshotToken;

#[contractimpl]
impl SnapshotToken {
    // ============================================
    // INITIALIZATION & ROLE SETUP
    // ============================================

    /// Initialize the token. The admin becomes owner, minter and manager,
    /// and the token starts paused.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidCap`: Cap must be positive
    pub fn initialize(
        env: Env,
        admin: Address,
        name: String,
        symbol: String,
        decimals: u32,
        cap: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if cap <= 0 {
            return Err(Error::InvalidCap);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(
            &DataKey::Metadata,
            &TokenMetadata {
                name,
                symbol,
                decimals,
            },
        );
        env.storage().instance().set(&DataKey::Cap, &cap);
        Storage::set_owner(&env, &admin);
        Storage::set_total_supply(&env, 0);
        Storage::set_paused(&env, true);
        Storage::set_minter(&env, &admin, true);
        Storage::set_manager(&env, &admin, true);

        Ok(())
    }

    /// One-time hand-over to the sale: mints the vault allocations, gives the
    /// crowdsale the minter and manager roles, strips the current owner of
    /// both roles and transfers ownership to `new_owner` (who stays a manager).
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AlreadySetUp`: Role setup already executed
    /// - `InvalidAddress`: Crowdsale is this token
    /// - `InvalidAmount`: An allocation is not positive
    /// - `CapExceeded`: Allocations exceed the cap
    pub fn role_setup(
        env: Env,
        new_owner: Address,
        crowdsale: Address,
        allocations: Vec<(Address, i128)>,
    ) -> Result<(), Error> {
        let owner = Storage::owner(&env).ok_or(Error::NotInitialized)?;
        owner.require_auth();

        if env.storage().instance().has(&DataKey::RoleSetupDone) {
            return Err(Error::AlreadySetUp);
        }

        if crowdsale == env.current_contract_address() {
            return Err(Error::InvalidAddress);
        }

        for (vault, amount) in allocations.iter() {
            Self::mint_internal(&env, &owner, &vault, amount)?;
        }

        if Storage::is_minter(&env, &owner) {
            Storage::set_minter(&env, &owner, false);
            Self::publish_role(&env, "minter_removed", &owner);
        }
        if Storage::is_manager(&env, &owner) {
            Storage::set_manager(&env, &owner, false);
            Self::publish_role(&env, "manager_removed", &owner);
        }
        if !Storage::is_manager(&env, &new_owner) {
            Storage::set_manager(&env, &new_owner, true);
            Self::publish_role(&env, "manager_added", &new_owner);
        }
        if !Storage::is_minter(&env, &crowdsale) {
            Storage::set_minter(&env, &crowdsale, true);
            Self::publish_role(&env, "minter_added", &crowdsale);
        }
        if !Storage::is_manager(&env, &crowdsale) {
            Storage::set_manager(&env, &crowdsale, true);
            Self::publish_role(&env, "manager_added", &crowdsale);
        }

        Self::set_owner_internal(&env, &owner, &new_owner);
        env.storage().instance().set(&DataKey::RoleSetupDone, &true);

        log!(&env, "role setup done", crowdsale, allocations.len());

        Ok(())
    }

    // ============================================
    // MINT & BURN
    // ============================================

    /// Mint new tokens. Allowed while paused.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotMinter`: Caller does not hold the minter role
    /// - `InvalidAmount`: Amount <= 0
    /// - `CapExceeded`: Total supply would exceed the cap
    pub fn mint(env: Env, minter: Address, to: Address, amount: i128) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        minter.require_auth();

        if !Storage::is_minter(&env, &minter) {
            return Err(Error::NotMinter);
        }

        Self::mint_internal(&env, &minter, &to, amount)
    }

    /// Burn tokens from the caller's balance
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount < 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        from.require_auth();

        Self::burn_internal(&env, &from, amount)
    }

    /// Burn tokens on behalf of `from`, consuming the spender's allowance
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount < 0
    /// - `InsufficientAllowance`: Allowance too low
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn_from(env: Env, spender: Address, from: Address, amount: i128) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        spender.require_auth();

        Self::spend_allowance(&env, &from, &spender, amount)?;
        Self::burn_internal(&env, &from, amount)
    }

    // ============================================
    // TRANSFERS & ALLOWANCES
    // ============================================

    /// Transfer tokens between accounts
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Token is paused
    /// - `InvalidAmount`: Amount < 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        from.require_auth();

        Self::move_balance(&env, &from, &to, amount)
    }

    /// Transfer tokens on behalf of `from`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Token is paused
    /// - `InvalidAmount`: Amount < 0
    /// - `InsufficientAllowance`: Allowance too low
    /// - `InsufficientBalance`: Not enough balance
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        spender.require_auth();

        Self::spend_allowance(&env, &from, &spender, amount)?;
        Self::move_balance(&env, &from, &to, amount)
    }

    /// Set the allowance of `spender` over the tokens of `from`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Token is paused
    /// - `InvalidAmount`: Amount < 0
    /// - `InvalidExpiration`: Non-zero allowance expiring in the past
    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        from.require_auth();

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            return Err(Error::InvalidExpiration);
        }

        Self::write_allowance(
            &env,
            &from,
            &spender,
            AllowanceValue {
                amount,
                expiration_ledger,
            },
        );
        Ok(())
    }

    /// Raise the allowance of `spender`, keeping its expiration
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Token is paused
    /// - `InvalidAmount`: Amount < 0 or overflow
    pub fn increase_allowance(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        from.require_auth();

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let mut current = Self::live_allowance(&env, &from, &spender);
        current.amount = current
            .amount
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        Self::write_allowance(&env, &from, &spender, current);
        Ok(())
    }

    /// Lower the allowance of `spender`, keeping its expiration
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Token is paused
    /// - `InvalidAmount`: Amount < 0
    /// - `InsufficientAllowance`: Decrease larger than the allowance
    pub fn decrease_allowance(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        from.require_auth();

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let mut current = Self::live_allowance(&env, &from, &spender);
        if current.amount < amount {
            return Err(Error::InsufficientAllowance);
        }
        current.amount -= amount;

        Self::write_allowance(&env, &from, &spender, current);
        Ok(())
    }

    // ============================================
    // PAUSE
    // ============================================

    /// Pause transfers and approvals
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Caller is not a manager
    /// - `ContractPaused`: Already paused
    pub fn pause(env: Env, manager: Address) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        Self::require_manager(&env, &manager)?;

        if Storage::is_paused(&env) {
            return Err(Error::ContractPaused);
        }
        Storage::set_paused(&env, true);

        env.events().publish(
            (Symbol::new(&env, "paused"),),
            PauseEvent { account: manager },
        );
        Ok(())
    }

    /// Resume transfers and approvals
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Caller is not a manager
    /// - `NotPaused`: Not paused
    pub fn unpause(env: Env, manager: Address) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        Self::require_manager(&env, &manager)?;

        if !Storage::is_paused(&env) {
            return Err(Error::NotPaused);
        }
        Storage::set_paused(&env, false);

        env.events().publish(
            (Symbol::new(&env, "unpaused"),),
            PauseEvent { account: manager },
        );
        Ok(())
    }

    // ============================================
    // ROLES & OWNERSHIP
    // ============================================

    /// Grant the minter role (callable by a minter)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotMinter`: Caller is not a minter
    /// - `RoleAlreadyGranted`: Account already a minter
    pub fn add_minter(env: Env, minter: Address, account: Address) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        minter.require_auth();

        if !Storage::is_minter(&env, &minter) {
            return Err(Error::NotMinter);
        }
        if Storage::is_minter(&env, &account) {
            return Err(Error::RoleAlreadyGranted);
        }

        Storage::set_minter(&env, &account, true);
        Self::publish_role(&env, "minter_added", &account);
        Ok(())
    }

    /// Give up the minter role
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotMinter`: Account is not a minter
    pub fn renounce_minter(env: Env, account: Address) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        account.require_auth();

        if !Storage::is_minter(&env, &account) {
            return Err(Error::NotMinter);
        }

        Storage::set_minter(&env, &account, false);
        Self::publish_role(&env, "minter_removed", &account);
        Ok(())
    }

    /// Grant the manager role (callable by the owner or a manager)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Caller is neither owner nor manager
    /// - `RoleAlreadyGranted`: Account already a manager
    pub fn add_manager(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        let owner = Storage::owner(&env).ok_or(Error::NotInitialized)?;
        caller.require_auth();

        if caller != owner && !Storage::is_manager(&env, &caller) {
            return Err(Error::NotManager);
        }
        if Storage::is_manager(&env, &account) {
            return Err(Error::RoleAlreadyGranted);
        }

        Storage::set_manager(&env, &account, true);
        Self::publish_role(&env, "manager_added", &account);
        Ok(())
    }

    /// Revoke the manager role (owner only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Account is not a manager
    /// - `LastManager`: Account is the only manager left
    pub fn remove_manager(env: Env, account: Address) -> Result<(), Error> {
        let owner = Storage::owner(&env).ok_or(Error::NotInitialized)?;
        owner.require_auth();

        Self::revoke_manager(&env, &account)
    }

    /// Give up the manager role
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotManager`: Account is not a manager
    /// - `LastManager`: Account is the only manager left
    pub fn renounce_manager(env: Env, account: Address) -> Result<(), Error> {
        Self::check_initialized(&env)?;
        account.require_auth();

        Self::revoke_manager(&env, &account)
    }

    /// Hand ownership to another account
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), Error> {
        let owner = Storage::owner(&env).ok_or(Error::NotInitialized)?;
        owner.require_auth();

        Self::set_owner_internal(&env, &owner, &new_owner);
        Ok(())
    }

    /// Sweep any token held by this contract (itself included) to the owner
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn reclaim_token(env: Env, token: Address) -> Result<(), Error> {
        let owner = Storage::owner(&env).ok_or(Error::NotInitialized)?;
        owner.require_auth();

        let this = env.current_contract_address();
        if token == this {
            let amount = Storage::balance(&env, &this);
            return Self::move_balance(&env, &this, &owner, amount);
        }

        let client = token::Client::new(&env, &token);
        let amount = client.balance(&this);
        if amount > 0 {
            client.transfer(&this, &owner, &amount);
        }
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn balance(env: Env, id: Address) -> i128 {
        Storage::balance(&env, &id)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        Self::live_allowance(&env, &from, &spender).amount
    }

    pub fn total_supply(env: Env) -> i128 {
        Storage::total_supply(&env)
    }

    pub fn cap(env: Env) -> i128 {
        Storage::cap(&env)
    }

    /// Balance of `account` as of ledger sequence `counter`
    ///
    /// # Errors
    /// - `FutureQuery`: `counter` is beyond the current ledger sequence
    pub fn balance_of_at(env: Env, account: Address, counter: u32) -> Result<i128, Error> {
        snapshots::value_at(&env, &SnapshotSubject::Account(account), counter)
    }

    /// Total supply as of ledger sequence `counter`
    ///
    /// # Errors
    /// - `FutureQuery`: `counter` is beyond the current ledger sequence
    pub fn total_supply_at(env: Env, counter: u32) -> Result<i128, Error> {
        snapshots::value_at(&env, &SnapshotSubject::TotalSupply, counter)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        Ok(Self::metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        Ok(Self::metadata(&env)?.symbol)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        Ok(Self::metadata(&env)?.decimals)
    }

    pub fn paused(env: Env) -> bool {
        Storage::is_paused(&env)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Storage::owner(&env).ok_or(Error::NotInitialized)
    }

    pub fn is_minter(env: Env, account: Address) -> bool {
        Storage::is_minter(&env, &account)
    }

    pub fn is_manager(env: Env, account: Address) -> bool {
        Storage::is_manager(&env, &account)
    }

    pub fn num_managers(env: Env) -> u32 {
        Storage::manager_count(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_initialized(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        Self::check_initialized(env)?;
        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn require_manager(env: &Env, manager: &Address) -> Result<(), Error> {
        manager.require_auth();
        if !Storage::is_manager(env, manager) {
            return Err(Error::NotManager);
        }
        Ok(())
    }

    fn metadata(env: &Env) -> Result<TokenMetadata, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Metadata)
            .ok_or(Error::NotInitialized)
    }

    fn revoke_manager(env: &Env, account: &Address) -> Result<(), Error> {
        if !Storage::is_manager(env, account) {
            return Err(Error::NotManager);
        }
        if Storage::manager_count(env) <= 1 {
            return Err(Error::LastManager);
        }

        Storage::set_manager(env, account, false);
        Self::publish_role(env, "manager_removed", account);
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

    fn publish_role(env: &Env, topic: &str, account: &Address) {
        env.events().publish(
            (Symbol::new(env, topic), account.clone()),
            RoleEvent {
                account: account.clone(),
            },
        );
    }

    fn mint_internal(env: &Env, minter: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let new_supply = Storage::total_supply(env)
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        if new_supply > Storage::cap(env) {
            return Err(Error::CapExceeded);
        }

        let new_balance = Storage::balance(env, to)
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        Storage::set_total_supply(env, new_supply);
        Storage::set_balance(env, to, new_balance);

        Self::record_account(env, to)?;
        Self::record_total_supply(env)?;

        env.events().publish(
            (Symbol::new(env, "mint"), to.clone()),
            MintEvent {
                minter: minter.clone(),
                to: to.clone(),
                amount,
            },
        );
        Ok(())
    }

    fn burn_internal(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let balance = Storage::balance(env, from);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }

        Storage::set_balance(env, from, balance - amount);
        Storage::set_total_supply(env, Storage::total_supply(env) - amount);

        Self::record_account(env, from)?;
        Self::record_total_supply(env)?;

        env.events().publish(
            (Symbol::new(env, "burn"), from.clone()),
            BurnEvent {
                from: from.clone(),
                amount,
            },
        );
        Ok(())
    }

    fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let from_balance = Storage::balance(env, from);
        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }
        Storage::set_balance(env, from, from_balance - amount);

        let to_balance = Storage::balance(env, to)
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        Storage::set_balance(env, to, to_balance);

        Self::record_account(env, from)?;
        Self::record_account(env, to)?;

        env.events().publish(
            (Symbol::new(env, "transfer"), from.clone(), to.clone()),
            TransferEvent {
                from: from.clone(),
                to: to.clone(),
                amount,
            },
        );
        Ok(())
    }

    /// Current allowance, with expired entries read as zero.
    fn live_allowance(env: &Env, from: &Address, spender: &Address) -> AllowanceValue {
        match Storage::allowance(env, from, spender) {
            Some(value) if value.expiration_ledger >= env.ledger().sequence() => value,
            Some(value) => AllowanceValue {
                amount: 0,
                expiration_ledger: value.expiration_ledger,
            },
            None => AllowanceValue {
                amount: 0,
                expiration_ledger: u32::MAX,
            },
        }
    }

    fn write_allowance(env: &Env, from: &Address, spender: &Address, value: AllowanceValue) {
        Storage::set_allowance(env, from, spender, &value);
        env.events().publish(
            (Symbol::new(env, "approve"), from.clone(), spender.clone()),
            ApprovalEvent {
                from: from.clone(),
                spender: spender.clone(),
                amount: value.amount,
                expiration_ledger: value.expiration_ledger,
            },
        );
    }

    fn spend_allowance(
        env: &Env,
        from: &Address,
        spender: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let mut current = Self::live_allowance(env, from, spender);
        if current.amount < amount {
            return Err(Error::InsufficientAllowance);
        }
        if amount > 0 {
            current.amount -= amount;
            Storage::set_allowance(env, from, spender, &current);
        }
        Ok(())
    }

    fn record_account(env: &Env, account: &Address) -> Result<(), Error> {
        let counter = env.ledger().sequence();
        let value = Storage::balance(env, account);
        snapshots::write(env, &SnapshotSubject::Account(account.clone()), counter, value)?;

        env.events().publish(
            (Symbol::new(env, "acct_snap"), account.clone()),
            AccountSnapshotCreated {
                account: account.clone(),
                counter,
                value,
            },
        );
        Ok(())
    }

    fn record_total_supply(env: &Env) -> Result<(), Error> {
        let counter = env.ledger().sequence();
        let value = Storage::total_supply(env);
        snapshots::write(env, &SnapshotSubject::TotalSupply, counter, value)?;

        env.events().publish(
            (Symbol::new(env, "supply_snap"),),
            TotalSupplySnapshotCreated { counter, value },
        );
        Ok(())
    }
}
