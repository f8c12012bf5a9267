use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller is neither a manager nor the crowdsale
    NotManager = 10,
    /// Caller is not the crowdsale
    NotCrowdsale = 11,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 20,
    /// Beneficiary and amount lists differ in length
    LengthMismatch = 21,
    /// Batch is empty or too long
    InvalidBatchLength = 22,
    /// Collaborator address conflicts with owner or vault
    InvalidAddress = 23,
    /// Linear schedule without a vesting duration
    InvalidSchedule = 24,

    // ============================================
    // STATE ERRORS (30-49)
    // ============================================
    /// Funding phase is over
    FundingClosed = 30,
    /// Allocations would exceed the tokens held by the vault
    ExceedsFundedBalance = 31,
    /// Release time already fixed
    ReleaseTimeAlreadyKnown = 32,
    /// Release time unknown or not reached
    ReleaseTimeNotReached = 33,
    /// Beneficiary has no allocation
    NoAllocation = 34,
    /// Nothing vested beyond what was already released
    NothingToRelease = 35,
    /// Manager role already granted
    AlreadyManager = 36,
}
