use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DividendDepositedEvent {
    pub dividend_index: u32,
    pub payout_token: Address,
    pub payout_amount: i128,
    pub claim_period: u64,
    /// Snapshot counter the entitlements are computed at
    pub record_date: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DividendClaimedEvent {
    pub dividend_index: u32,
    pub claimer: Address,
    pub claimed_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DividendRecycledEvent {
    pub dividend_index: u32,
    pub recycled_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenReclaimedEvent {
    pub token: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}
