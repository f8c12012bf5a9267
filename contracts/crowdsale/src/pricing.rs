use soroban_sdk::{contracttype, Env, Vec};

use crate::error::Error;
use crate::storage::{Round, DISCOUNT_BASE, FEE_DENOMINATOR, FEE_NUMERATOR};

/// Tokens sold within a single round
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Portion {
    pub round: u32,
    pub tokens: i128,
}

/// Payment left after the compliance fee
///
/// Formula: available = value × 965 / 1000
pub fn available_after_fee(value: i128) -> Option<i128> {
    value
        .checked_mul(FEE_NUMERATOR)?
        .checked_div(FEE_DENOMINATOR)
}

/// Tokens bought by `payment` at a round's discount
///
/// Formula: tokens = payment × rate × DISCOUNT_BASE / discount
///
/// Example:
/// - payment: 10, rate: 389, discount: 70
/// - tokens: 10 × 389 × 100 / 70 = 5,557
pub fn tokens_for_payment(payment: i128, rate: i128, discount: i128) -> Option<i128> {
    payment
        .checked_mul(rate)?
        .checked_mul(DISCOUNT_BASE)?
        .checked_div(discount)
}

/// Smallest payment covering `tokens` at a round's discount (rounded up, so
/// the buyer never gets a round's tokens below its price)
pub fn payment_for_tokens(tokens: i128, rate: i128, discount: i128) -> Option<i128> {
    let numerator = tokens.checked_mul(discount)?;
    let denominator = rate.checked_mul(DISCOUNT_BASE)?;
    let quotient = numerator.checked_div(denominator)?;
    if numerator % denominator == 0 {
        Some(quotient)
    } else {
        quotient.checked_add(1)
    }
}

/// Rate derived from a new fiat rate, keeping the initial rate / fiat ratio
///
/// Example: initial 389 tokens at fiat 12,500; fiat 11,024 gives 343
pub fn rate_for_fiat(fiat_rate: i128, initial_rate: i128, initial_fiat_rate: i128) -> Option<i128> {
    fiat_rate
        .checked_mul(initial_rate)?
        .checked_div(initial_fiat_rate)
}

/// Split a payment across rounds, starting at `round` with `minted` tokens
/// already sold. Each round's share is priced at that round's discount; a
/// payment that fills a round spends only what the filled part costs and the
/// rest carries over to the next round.
///
/// # Errors
/// - `ExceedsHardCap`: payment buys more than the remaining supply
/// - `InvalidAmount`: arithmetic overflow
pub fn split_payment(
    env: &Env,
    rounds: &Vec<Round>,
    mut round: u32,
    mut minted: i128,
    payment: i128,
    rate: i128,
) -> Result<Vec<Portion>, Error> {
    let mut portions = Vec::new(env);
    let mut remaining = payment;

    while remaining > 0 {
        let tier = match rounds.get(round) {
            Some(tier) => tier,
            None => {
                // leftover dust that cannot buy a single token is not an overflow
                let last = rounds.last().ok_or(Error::InvalidRounds)?;
                let tokens = tokens_for_payment(remaining, rate, last.discount)
                    .ok_or(Error::InvalidAmount)?;
                if tokens > 0 {
                    return Err(Error::ExceedsHardCap);
                }
                break;
            }
        };

        let room = tier.cap - minted;
        if room <= 0 {
            round += 1;
            continue;
        }

        let tokens =
            tokens_for_payment(remaining, rate, tier.discount).ok_or(Error::InvalidAmount)?;
        if tokens == 0 {
            break;
        }

        if tokens < room {
            portions.push_back(Portion { round, tokens });
            break;
        }

        let cost = payment_for_tokens(room, rate, tier.discount).ok_or(Error::InvalidAmount)?;
        portions.push_back(Portion {
            round,
            tokens: room,
        });
        minted += room;
        remaining = remaining.saturating_sub(cost);
        round += 1;
    }

    Ok(portions)
}

/// Split an already priced token amount across rounds by their caps.
///
/// # Errors
/// - `ExceedsHardCap`: amount is larger than the remaining supply
pub fn split_tokens(
    env: &Env,
    rounds: &Vec<Round>,
    mut round: u32,
    mut minted: i128,
    amount: i128,
) -> Result<Vec<Portion>, Error> {
    let mut portions = Vec::new(env);
    let mut remaining = amount;

    while remaining > 0 {
        let tier = rounds.get(round).ok_or(Error::ExceedsHardCap)?;

        let room = tier.cap - minted;
        if room <= 0 {
            round += 1;
            continue;
        }

        let take = remaining.min(room);
        portions.push_back(Portion {
            round,
            tokens: take,
        });
        minted += take;
        remaining -= take;
        round += 1;
    }

    Ok(portions)
}

/// Sum of the tokens in `portions`
pub fn total_tokens(portions: &Vec<Portion>) -> i128 {
    portions.iter().map(|p| p.tokens).sum()
}
