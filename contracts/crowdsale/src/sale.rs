use soroban_sdk::{log, token, Address, Env, Symbol, Vec};

use crate::admin::Admin;
use crate::error::Error;
use crate::events::{
    FinalizedEvent, NonEthTokenPurchasedEvent, RoundStartedEvent, TokensPurchasedEvent,
};
use crate::external;
use crate::pricing::{self, Portion};
use crate::storage::Storage;

pub struct Sale;

impl Sale {
    // ============================================
    // PURCHASES
    // ============================================

    /// Payment-token purchase: `value` moves from the purchaser to the sale
    /// wallet, the amount net of the fee is priced round by round.
    pub fn buy_tokens(
        env: &Env,
        purchaser: &Address,
        beneficiary: &Address,
        value: i128,
    ) -> Result<i128, Error> {
        Admin::require_manager(env, purchaser)?;
        Self::check_purchase(env, beneficiary)?;

        if value <= 0 {
            return Err(Error::InvalidAmount);
        }

        let available = pricing::available_after_fee(value).ok_or(Error::InvalidAmount)?;
        let portions = pricing::split_payment(
            env,
            &Storage::rounds(env)?,
            Storage::current_round(env),
            Storage::minted(env),
            available,
            Storage::rate(env),
        )?;
        let amount = pricing::total_tokens(&portions);
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Storage::config(env)?;
        token::Client::new(env, &config.payment_token).transfer(purchaser, &config.wallet, &value);

        let raised = Storage::wei_raised(env)
            .checked_add(value)
            .ok_or(Error::InvalidAmount)?;
        Storage::set_wei_raised(env, raised);

        Self::deliver(env, beneficiary, &portions)?;

        env.events().publish(
            (Symbol::new(env, "tokens_purchased"), beneficiary.clone()),
            TokensPurchasedEvent {
                purchaser: purchaser.clone(),
                beneficiary: beneficiary.clone(),
                value,
                amount,
            },
        );

        Ok(amount)
    }

    /// Purchase settled off-chain, the token amount is already priced.
    pub fn non_eth_purchase(
        env: &Env,
        manager: &Address,
        beneficiary: &Address,
        token_amount: i128,
    ) -> Result<(), Error> {
        Admin::require_manager(env, manager)?;
        Self::check_purchase(env, beneficiary)?;
        Self::purchase_tokens(env, beneficiary, token_amount)
    }

    pub fn non_eth_purchases(
        env: &Env,
        manager: &Address,
        beneficiaries: &Vec<Address>,
        amounts: &Vec<i128>,
    ) -> Result<(), Error> {
        Admin::require_manager(env, manager)?;

        if beneficiaries.len() != amounts.len() {
            return Err(Error::LengthMismatch);
        }
        Admin::check_batch(beneficiaries.len())?;

        for (beneficiary, amount) in beneficiaries.iter().zip(amounts.iter()) {
            Self::check_purchase(env, &beneficiary)?;
            Self::purchase_tokens(env, &beneficiary, amount)?;
        }
        Ok(())
    }

    // ============================================
    // ROUNDS & FINALIZATION
    // ============================================

    /// End the current round early. Its cap shrinks to what has been sold so
    /// the unsold tokens roll over to the later rounds.
    pub fn close_current_round(env: &Env, manager: &Address) -> Result<u32, Error> {
        Admin::require_manager(env, manager)?;
        Self::check_started(env)?;

        if Self::hard_cap_reached(env)? {
            return Err(Error::HardCapReached);
        }

        let mut rounds = Storage::rounds(env)?;
        let current = Storage::current_round(env);
        if current + 1 >= rounds.len() {
            return Err(Error::LastRound);
        }

        let mut round = rounds.get(current).ok_or(Error::InvalidIndex)?;
        round.cap = Storage::minted(env);
        rounds.set(current, round);
        Storage::set_rounds(env, &rounds);

        Self::advance_rounds(env)?;
        Ok(Storage::current_round(env))
    }

    pub fn finalize(env: &Env, manager: &Address) -> Result<(), Error> {
        Admin::require_manager(env, manager)?;

        if Storage::is_finalized(env) {
            return Err(Error::AlreadyFinalized);
        }
        if !Self::hard_cap_reached(env)? {
            return Err(Error::HardCapNotReached);
        }

        Storage::set_finalized(env);

        env.events().publish(
            (Symbol::new(env, "finalized"),),
            FinalizedEvent {
                minted: Storage::minted(env),
                wei_raised: Storage::wei_raised(env),
            },
        );
        Ok(())
    }

    pub fn hard_cap(env: &Env) -> Result<i128, Error> {
        Ok(Storage::rounds(env)?
            .last()
            .ok_or(Error::NotInitialized)?
            .cap)
    }

    pub fn hard_cap_reached(env: &Env) -> Result<bool, Error> {
        Ok(Storage::minted(env) >= Self::hard_cap(env)?)
    }

    /// Cap of the current round, or the hard cap once every round is over
    pub fn current_round_cap(env: &Env) -> Result<i128, Error> {
        let rounds = Storage::rounds(env)?;
        let index = Storage::current_round(env).min(rounds.len() - 1);
        Ok(rounds.get(index).ok_or(Error::InvalidIndex)?.cap)
    }

    pub fn is_started(env: &Env) -> Result<bool, Error> {
        Ok(env.ledger().timestamp() >= Storage::config(env)?.starting_time)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_started(env: &Env) -> Result<(), Error> {
        if !Self::is_started(env)? {
            return Err(Error::NotStarted);
        }
        Ok(())
    }

    /// Sale conditions every purchase has to meet; the caller's role is
    /// checked separately.
    fn check_purchase(env: &Env, beneficiary: &Address) -> Result<(), Error> {
        if !Storage::is_set_up(env) {
            return Err(Error::NotSetUp);
        }
        Self::check_started(env)?;
        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        if Storage::is_finalized(env) {
            return Err(Error::AlreadyFinalized);
        }
        if !Storage::is_whitelisted(env, beneficiary) {
            return Err(Error::NotWhitelisted);
        }
        if Self::hard_cap_reached(env)? {
            return Err(Error::HardCapReached);
        }
        Ok(())
    }

    fn purchase_tokens(env: &Env, beneficiary: &Address, token_amount: i128) -> Result<(), Error> {
        if token_amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let portions = pricing::split_tokens(
            env,
            &Storage::rounds(env)?,
            Storage::current_round(env),
            Storage::minted(env),
            token_amount,
        )?;

        Self::deliver(env, beneficiary, &portions)?;

        env.events().publish(
            (Symbol::new(env, "non_eth_purchased"), beneficiary.clone()),
            NonEthTokenPurchasedEvent {
                beneficiary: beneficiary.clone(),
                token_amount,
            },
        );
        Ok(())
    }

    /// Mint each portion into its round's vault, credit the beneficiary there
    /// and move past every round whose cap has been reached.
    fn deliver(env: &Env, beneficiary: &Address, portions: &Vec<Portion>) -> Result<(), Error> {
        let config = Storage::config(env)?;
        let vaults = Storage::round_vaults(env)?;

        for portion in portions.iter() {
            let vault = vaults.get(portion.round).ok_or(Error::InvalidIndex)?;

            external::mint(env, &config.token, &vault, portion.tokens);
            external::credit_vault(env, &vault, beneficiary, portion.tokens);

            let minted = Storage::minted(env)
                .checked_add(portion.tokens)
                .ok_or(Error::InvalidAmount)?;
            Storage::set_minted(env, minted);

            Self::advance_rounds(env)?;
        }
        Ok(())
    }

    /// Advance past every round whose cap is reached. Each finished round
    /// starts its vault lock; finishing the last one starts the reserve's.
    fn advance_rounds(env: &Env) -> Result<(), Error> {
        let rounds = Storage::rounds(env)?;
        let vaults = Storage::round_vaults(env)?;
        let minted = Storage::minted(env);
        let now = env.ledger().timestamp();
        let mut current = Storage::current_round(env);

        while let Some(round) = rounds.get(current) {
            if minted < round.cap {
                break;
            }

            let vault = vaults.get(current).ok_or(Error::InvalidIndex)?;
            external::anchor_vault(env, &vault, now);
            current += 1;

            if current < rounds.len() {
                env.events().publish(
                    (Symbol::new(env, "round_started"),),
                    RoundStartedEvent {
                        round_number: current,
                    },
                );
                log!(env, "round started", current, minted);
            } else {
                external::anchor_vault(env, &Storage::reserve_vault(env)?, now);
            }
        }

        Storage::set_current_round(env, current);
        Ok(())
    }
}
