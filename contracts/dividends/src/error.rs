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
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 20,
    /// Token address conflicts with the distributor
    InvalidAddress = 21,
    /// Dividend index out of range
    InvalidIndex = 22,
    /// Claim period must be positive
    InvalidPeriod = 23,

    // ============================================
    // STATE ERRORS (30-49)
    // ============================================
    /// Claim period has ended
    ClaimPeriodOver = 30,
    /// Claim period still running
    ClaimPeriodNotOver = 31,
    /// Account already claimed this dividend
    AlreadyClaimed = 32,
    /// Dividend was recycled
    DividendRecycled = 33,
}
