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
    /// `role_setup` was already executed
    AlreadySetUp = 3,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller does not hold the minter role
    NotMinter = 11,
    /// Caller does not hold the manager role
    NotManager = 12,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Amount must be positive (or non-negative for allowances)
    InvalidAmount = 20,
    /// Cap must be positive
    InvalidCap = 21,
    /// Account already holds the requested role
    RoleAlreadyGranted = 22,
    /// Allowance expiration lies in the past
    InvalidExpiration = 23,
    /// Collaborator address refers to this contract
    InvalidAddress = 24,

    // ============================================
    // STATE ERRORS (30-49)
    // ============================================
    /// Token transfers are paused
    ContractPaused = 30,
    /// Token is not paused
    NotPaused = 31,
    /// Mint would push total supply above the cap
    CapExceeded = 32,
    /// Removing this manager would leave the token without one
    LastManager = 33,
    /// Snapshot query for a counter that has not happened yet
    FutureQuery = 34,
    /// Snapshot written with a counter lower than the last one recorded
    NonMonotonicSnapshot = 35,

    // ============================================
    // BALANCE ERRORS (50-59)
    // ============================================
    /// Balance too low
    InsufficientBalance = 50,
    /// Allowance too low
    InsufficientAllowance = 51,
}
