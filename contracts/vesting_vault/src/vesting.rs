use crate::storage::VestingKind;

/// Amount of `allocation` unlocked at `now`.
///
/// Formula (linear): vested = allocation × (now - cliff) / (end - cliff)
///
/// Example:
/// - allocation: 1,000, cliff: Day 0, end: Day 100
/// - At Day 25: vested = 1,000 × 25 / 100 = 250
/// - At or after Day 100: vested = 1,000
pub fn vested_amount(
    kind: VestingKind,
    allocation: i128,
    cliff: u64,
    end: u64,
    now: u64,
) -> Option<i128> {
    if now < cliff {
        return Some(0);
    }

    match kind {
        VestingKind::Cliff => Some(allocation),
        VestingKind::Linear => {
            if now >= end {
                return Some(allocation);
            }
            let elapsed = (now - cliff) as i128;
            let duration = (end - cliff) as i128;
            allocation.checked_mul(elapsed)?.checked_div(duration)
        }
    }
}

/// Vested amount not yet paid out, never above what is left.
pub fn releasable_amount(
    kind: VestingKind,
    allocation: i128,
    remaining: i128,
    cliff: u64,
    end: u64,
    now: u64,
) -> Option<i128> {
    let vested = vested_amount(kind, allocation, cliff, end, now)?;
    let released = allocation.checked_sub(remaining)?;
    let due = vested.checked_sub(released)?;
    Some(due.clamp(0, remaining))
}
