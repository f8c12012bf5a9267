use soroban_sdk::{contracttype, Address};

/// Maximum number of entries in a batch call
pub const BATCH_LIMIT: u32 = 300;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VestingKind {
    /// Everything unlocks at the release time
    Cliff = 0,
    /// Linear unlock from the release time to `release_time + vesting_duration`
    Linear = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schedule {
    pub kind: VestingKind,
    /// Unix timestamp of the cliff. 0 means the crowdsale anchors it later.
    pub release_time: u64,
    /// Added to the crowdsale anchor when the release time is set late
    pub lock_duration: u64,
    /// Seconds from the cliff to full unlock (linear vaults only)
    pub vesting_duration: u64,
    /// Funding cut-off; 0 means funding runs until the release time
    pub funding_deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub initial: i128,
    pub remaining: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Token,
    Crowdsale,
    Schedule,
    ReleaseTime,
    KnownReleaseTime,
    TotalBalance,
    Manager(Address),
    Allocation(Address),
}
