#![no_std]

mod admin;
mod error;
mod events;
mod external;
mod pricing;
mod sale;
mod storage;

pub use error::Error;
pub use events::{NonEthTokenPurchasedEvent, RoundStartedEvent, TokensPurchasedEvent};
pub use storage::{Round, SaleConfig, BATCH_LIMIT, DISCOUNT_BASE, FEE_DENOMINATOR, FEE_NUMERATOR};

use admin::Admin;
use sale::Sale;
use storage::Storage;

use soroban_sdk::{contract, contractimpl, vec, Address, Env, Vec};

#[contract]
pub struct Crowdsale;

#[contractimpl]
impl Crowdsale {
    // ============================================
    // INITIALIZATION & SETUP
    // ============================================

    /// Initialize the sale. `rounds` lists the cumulative cap and discount of
    /// every round; the last cap is the hard cap.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidRate`: Rate or fiat rate not positive
    /// - `InvalidStartingTime`: Starting time not in the future
    /// - `InvalidAddress`: Token equals the wallet or the payment token
    /// - `InvalidRounds`: Empty table, caps not increasing, or discount out of range
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        payment_token: Address,
        wallet: Address,
        starting_time: u64,
        rate: i128,
        fiat_rate: i128,
        rounds: Vec<Round>,
    ) -> Result<(), Error> {
        let config = SaleConfig {
            token,
            payment_token,
            wallet,
            starting_time,
            initial_rate: rate,
            initial_fiat_rate: fiat_rate,
        };
        Admin::initialize(&env, &owner, config, &rounds)
    }

    /// Wire one vault per round plus the reserve vault and hand ownership
    /// over (owner only, once)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AlreadySetUp`: Setup already executed
    /// - `LengthMismatch`: Not exactly one vault per round
    /// - `InvalidAddress`: A vault is the crowdsale itself
    pub fn setup(
        env: Env,
        new_owner: Address,
        round_vaults: Vec<Address>,
        reserve_vault: Address,
    ) -> Result<(), Error> {
        Admin::setup(&env, &new_owner, &round_vaults, &reserve_vault)
    }

    // ============================================
    // PURCHASES
    // ============================================

    /// Buy tokens for `beneficiary` with `value` units of the payment token.
    /// Returns the number of tokens minted.
    ///
    /// # Errors
    /// - `NotManager`: Purchaser is not a manager
    /// - `NotSetUp`: Vaults not wired yet
    /// - `NotStarted`: Sale not started
    /// - `ContractPaused`: Sale is paused
    /// - `AlreadyFinalized`: Sale is finalized
    /// - `NotWhitelisted`: Beneficiary not whitelisted
    /// - `HardCapReached`: Nothing left to sell
    /// - `InvalidAmount`: Value not positive or too small to buy a token
    /// - `ExceedsHardCap`: Purchase larger than the remaining supply
    pub fn buy_tokens(
        env: Env,
        purchaser: Address,
        beneficiary: Address,
        value: i128,
    ) -> Result<i128, Error> {
        Sale::buy_tokens(&env, &purchaser, &beneficiary, value)
    }

    /// Credit a purchase paid outside the chain
    ///
    /// # Errors
    /// Same as `buy_tokens`
    pub fn non_eth_purchase(
        env: Env,
        manager: Address,
        beneficiary: Address,
        token_amount: i128,
    ) -> Result<(), Error> {
        Sale::non_eth_purchase(&env, &manager, &beneficiary, token_amount)
    }

    /// Batch form of `non_eth_purchase`; all or nothing
    ///
    /// # Errors
    /// - `LengthMismatch`: Lists differ in length
    /// - `InvalidBatchLength`: Empty list or `BATCH_LIMIT` entries or more
    /// - any `non_eth_purchase` error
    pub fn non_eth_purchases(
        env: Env,
        manager: Address,
        beneficiaries: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), Error> {
        Sale::non_eth_purchases(&env, &manager, &beneficiaries, &amounts)
    }

    // ============================================
    // ROUNDS & LIFECYCLE
    // ============================================

    /// Close the current round early; returns the new round index
    ///
    /// # Errors
    /// - `NotManager`: Caller is not a manager
    /// - `NotStarted`: Sale not started
    /// - `HardCapReached`: Nothing left to sell
    /// - `LastRound`: Current round is the last one
    pub fn close_current_round(env: Env, manager: Address) -> Result<u32, Error> {
        Sale::close_current_round(&env, &manager)
    }

    /// Recompute the rate from a new fiat rate; returns the new rate
    ///
    /// # Errors
    /// - `NotManager`: Caller is not a manager
    /// - `InvalidRate`: Fiat rate not positive
    pub fn update_rate(env: Env, manager: Address, fiat_rate: i128) -> Result<i128, Error> {
        Admin::update_rate(&env, &manager, fiat_rate)
    }

    /// Close the sale once the hard cap is reached
    ///
    /// # Errors
    /// - `NotManager`: Caller is not a manager
    /// - `AlreadyFinalized`: Already finalized
    /// - `HardCapNotReached`: Tokens left to sell
    pub fn finalize(env: Env, manager: Address) -> Result<(), Error> {
        Sale::finalize(&env, &manager)
    }

    pub fn pause(env: Env, manager: Address) -> Result<(), Error> {
        Admin::pause(&env, &manager)
    }

    /// # Errors
    /// - `NotPaused`: Sale is not paused
    /// - `MinterRoleMissing`: Crowdsale cannot mint the token
    pub fn unpause(env: Env, manager: Address) -> Result<(), Error> {
        Admin::unpause(&env, &manager)
    }

    // ============================================
    // WHITELIST
    // ============================================

    pub fn add_whitelisted(env: Env, manager: Address, account: Address) -> Result<(), Error> {
        Admin::add_whitelisteds(&env, &manager, &vec![&env, account])
    }

    /// # Errors
    /// - `InvalidBatchLength`: Empty list or `BATCH_LIMIT` entries or more
    /// - `AlreadyWhitelisted`: An account is already on the list
    pub fn add_whitelisteds(env: Env, manager: Address, accounts: Vec<Address>) -> Result<(), Error> {
        Admin::add_whitelisteds(&env, &manager, &accounts)
    }

    pub fn remove_whitelisted(env: Env, manager: Address, account: Address) -> Result<(), Error> {
        Admin::remove_whitelisteds(&env, &manager, &vec![&env, account])
    }

    /// # Errors
    /// - `InvalidBatchLength`: Empty list or `BATCH_LIMIT` entries or more
    /// - `NotWhitelisted`: An account is not on the list
    pub fn remove_whitelisteds(
        env: Env,
        manager: Address,
        accounts: Vec<Address>,
    ) -> Result<(), Error> {
        Admin::remove_whitelisteds(&env, &manager, &accounts)
    }

    // ============================================
    // MANAGERS & OWNERSHIP
    // ============================================

    pub fn add_manager(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        Admin::add_managers(&env, &caller, &vec![&env, account])
    }

    pub fn add_managers(env: Env, caller: Address, accounts: Vec<Address>) -> Result<(), Error> {
        Admin::add_managers(&env, &caller, &accounts)
    }

    pub fn remove_manager(env: Env, account: Address) -> Result<(), Error> {
        Admin::remove_manager(&env, &account)
    }

    pub fn renounce_manager(env: Env, account: Address) -> Result<(), Error> {
        Admin::renounce_manager(&env, &account)
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), Error> {
        Admin::transfer_ownership(&env, &new_owner)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn current_round(env: Env) -> u32 {
        Storage::current_round(&env)
    }

    pub fn current_round_cap(env: Env) -> Result<i128, Error> {
        Sale::current_round_cap(&env)
    }

    pub fn current_round_cap_reached(env: Env) -> Result<bool, Error> {
        Ok(Storage::minted(&env) >= Sale::current_round_cap(&env)?)
    }

    pub fn cap_of_round(env: Env, round: u32) -> Result<i128, Error> {
        Ok(Self::round(&env, round)?.cap)
    }

    pub fn discount_of_round(env: Env, round: u32) -> Result<i128, Error> {
        Ok(Self::round(&env, round)?.discount)
    }

    pub fn rounds(env: Env) -> Result<Vec<Round>, Error> {
        Storage::rounds(&env)
    }

    pub fn round_vault(env: Env, round: u32) -> Result<Address, Error> {
        Storage::round_vaults(&env)?
            .get(round)
            .ok_or(Error::InvalidIndex)
    }

    pub fn reserve_vault(env: Env) -> Result<Address, Error> {
        Storage::reserve_vault(&env)
    }

    pub fn hard_cap(env: Env) -> Result<i128, Error> {
        Sale::hard_cap(&env)
    }

    pub fn hard_cap_reached(env: Env) -> Result<bool, Error> {
        Sale::hard_cap_reached(&env)
    }

    pub fn minted_by_crowdsale(env: Env) -> i128 {
        Storage::minted(&env)
    }

    pub fn wei_raised(env: Env) -> i128 {
        Storage::wei_raised(&env)
    }

    pub fn rate(env: Env) -> i128 {
        Storage::rate(&env)
    }

    pub fn fiat_rate(env: Env) -> i128 {
        Storage::fiat_rate(&env)
    }

    pub fn config(env: Env) -> Result<SaleConfig, Error> {
        Storage::config(&env)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        Ok(Storage::config(&env)?.token)
    }

    pub fn starting_time(env: Env) -> Result<u64, Error> {
        Ok(Storage::config(&env)?.starting_time)
    }

    pub fn is_started(env: Env) -> Result<bool, Error> {
        Sale::is_started(&env)
    }

    pub fn paused(env: Env) -> bool {
        Storage::is_paused(&env)
    }

    pub fn finalized(env: Env) -> bool {
        Storage::is_finalized(&env)
    }

    pub fn is_whitelisted(env: Env, account: Address) -> bool {
        Storage::is_whitelisted(&env, &account)
    }

    pub fn is_manager(env: Env, account: Address) -> bool {
        Storage::is_manager(&env, &account)
    }

    pub fn num_managers(env: Env) -> u32 {
        Storage::manager_count(&env)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Storage::owner(&env)
    }

    fn round(env: &Env, round: u32) -> Result<Round, Error> {
        Storage::rounds(env)?
            .get(round)
            .ok_or(Error::InvalidIndex)
    }
}
