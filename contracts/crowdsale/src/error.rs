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
    /// `setup` was already executed
    AlreadySetUp = 3,
    /// Vaults not wired yet
    NotSetUp = 4,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller is not a manager
    NotManager = 10,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 20,
    /// Rate and fiat rate must be positive
    InvalidRate = 21,
    /// Round caps must increase strictly, discounts lie in (0, DISCOUNT_BASE]
    InvalidRounds = 22,
    /// Starting time must lie in the future
    InvalidStartingTime = 23,
    /// Collaborator addresses conflict
    InvalidAddress = 24,
    /// List lengths differ
    LengthMismatch = 25,
    /// Batch is empty or too long
    InvalidBatchLength = 26,
    /// Round index out of range
    InvalidIndex = 27,

    // ============================================
    // STATE ERRORS (30-49)
    // ============================================
    /// Crowdsale is paused
    ContractPaused = 30,
    /// Crowdsale is not paused
    NotPaused = 31,
    /// Starting time not reached
    NotStarted = 32,
    /// Crowdsale already finalized
    AlreadyFinalized = 33,
    /// Hard cap already reached
    HardCapReached = 34,
    /// Hard cap not reached yet
    HardCapNotReached = 35,
    /// Purchase would go beyond the hard cap
    ExceedsHardCap = 36,
    /// Beneficiary is not whitelisted
    NotWhitelisted = 37,
    /// Account already whitelisted
    AlreadyWhitelisted = 38,
    /// Current round is the last one
    LastRound = 39,
    /// Account already a manager
    AlreadyManager = 40,
    /// Removing this manager would leave none
    LastManager = 41,
    /// Crowdsale lacks the token minter role
    MinterRoleMissing = 42,
}
