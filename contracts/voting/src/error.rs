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
    /// Quorum must lie in 1..=100
    InvalidQuorum = 20,
    /// Voting period must be at least one day
    InvalidDuration = 21,
    /// Proposal index out of range
    InvalidIndex = 22,
    /// Token is the voting contract itself
    InvalidAddress = 23,
    /// Arithmetic overflow in the tally
    InvalidAmount = 24,

    // ============================================
    // STATE ERRORS (30-49)
    // ============================================
    /// Voting period has ended
    VotingClosed = 30,
    /// Voting period still running
    VotingOpen = 31,
    /// Result already computed
    ResultAlreadyRevealed = 32,
    /// Voter held no tokens at the record counter
    NoVotingPower = 33,
}
