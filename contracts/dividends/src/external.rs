//! Snapshot reads on the dividend-bearing token.

use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

pub fn balance_of_at(env: &Env, token: &Address, account: &Address, counter: u32) -> i128 {
    env.invoke_contract::<i128>(
        token,
        &Symbol::new(env, "balance_of_at"),
        vec![env, account.into_val(env), counter.into_val(env)],
    )
}

pub fn total_supply_at(env: &Env, token: &Address, counter: u32) -> i128 {
    env.invoke_contract::<i128>(
        token,
        &Symbol::new(env, "total_supply_at"),
        vec![env, counter.into_val(env)],
    )
}
