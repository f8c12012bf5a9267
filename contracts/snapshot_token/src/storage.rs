use soroban_sdk::{contracttype, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SnapshotSubject {
    TotalSupply,
    Account(Address),
}

/// Value of a subject as of a given ledger sequence.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pub counter: u32,
    pub value: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Metadata,
    Cap,
    TotalSupply,
    Paused,
    RoleSetupDone,
    ManagerCount,
    Minter(Address),
    Manager(Address),
    Balance(Address),
    Allowance(Address, Address), // (from, spender)
    SnapshotCount(SnapshotSubject),
    Snapshot(SnapshotSubject, u32),
}

pub struct Storage;

impl Storage {
    // Owner
    pub fn owner(env: &Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Owner)
    }

    pub fn set_owner(env: &Env, owner: &Address) {
        env.storage().instance().set(&DataKey::Owner, owner);
    }

    // Supply
    pub fn total_supply(env: &Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    pub fn set_total_supply(env: &Env, supply: i128) {
        env.storage().instance().set(&DataKey::TotalSupply, &supply);
    }

    pub fn cap(env: &Env) -> i128 {
        env.storage().instance().get(&DataKey::Cap).unwrap_or(0)
    }

    // Pause flag
    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn set_paused(env: &Env, paused: bool) {
        env.storage().instance().set(&DataKey::Paused, &paused);
    }

    // Roles
    pub fn is_minter(env: &Env, account: &Address) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Minter(account.clone()))
            .unwrap_or(false)
    }

    pub fn set_minter(env: &Env, account: &Address, granted: bool) {
        let key = DataKey::Minter(account.clone());
        if granted {
            env.storage().instance().set(&key, &true);
        } else {
            env.storage().instance().remove(&key);
        }
    }

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

    /// Grants or revokes the manager role, keeping the manager count in sync.
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

    // Balances
    pub fn balance(env: &Env, id: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Balance(id.clone()))
            .unwrap_or(0)
    }

    pub fn set_balance(env: &Env, id: &Address, amount: i128) {
        let key = DataKey::Balance(id.clone());
        if amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &amount);
        }
    }

    // Allowances
    pub fn allowance(env: &Env, from: &Address, spender: &Address) -> Option<AllowanceValue> {
        env.storage()
            .persistent()
            .get(&DataKey::Allowance(from.clone(), spender.clone()))
    }

    pub fn set_allowance(env: &Env, from: &Address, spender: &Address, value: &AllowanceValue) {
        let key = DataKey::Allowance(from.clone(), spender.clone());
        if value.amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, value);
        }
    }
}
