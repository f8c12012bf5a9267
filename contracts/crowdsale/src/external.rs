//! Calls into the sale token and the vesting vaults.

use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

/// Mint `amount` of the sale token to `to`, with the crowdsale as minter
pub fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    env.invoke_contract::<()>(
        token,
        &Symbol::new(env, "mint"),
        vec![
            env,
            env.current_contract_address().into_val(env),
            to.into_val(env),
            amount.into_val(env),
        ],
    );
}

pub fn is_minter(env: &Env, token: &Address, account: &Address) -> bool {
    env.invoke_contract::<bool>(
        token,
        &Symbol::new(env, "is_minter"),
        vec![env, account.into_val(env)],
    )
}

/// Credit `amount` to `beneficiary` inside `vault`
pub fn credit_vault(env: &Env, vault: &Address, beneficiary: &Address, amount: i128) {
    env.invoke_contract::<()>(
        vault,
        &Symbol::new(env, "receive_for"),
        vec![
            env,
            env.current_contract_address().into_val(env),
            beneficiary.into_val(env),
            amount.into_val(env),
        ],
    );
}

/// Start the lock of `vault` at `anchor` unless its release time is fixed already
pub fn anchor_vault(env: &Env, vault: &Address, anchor: u64) {
    let known = env.invoke_contract::<bool>(
        vault,
        &Symbol::new(env, "known_release_time"),
        vec![env],
    );
    if known {
        return;
    }

    env.invoke_contract::<()>(
        vault,
        &Symbol::new(env, "update_release_time"),
        vec![
            env,
            env.current_contract_address().into_val(env),
            anchor.into_val(env),
        ],
    );
}
