use crate::storage::PERCENT_BASE;

/// Whether a closed proposal passed
///
/// Quorum: (yes + no) × 100 >= quorum × total_supply
/// Majority: yes > no
///
/// Example:
/// - yes: 1,200, no: 400, quorum: 50, supply: 1,600
/// - 1,600 × 100 >= 50 × 1,600 and 1,200 > 400, so it passes
pub fn passed(yes: i128, no: i128, quorum: u32, total_supply: i128) -> Option<bool> {
    let turnout = yes.checked_add(no)?.checked_mul(PERCENT_BASE as i128)?;
    let required = (quorum as i128).checked_mul(total_supply)?;
    Some(turnout >= required && yes > no)
}

/// Tallies after `weight` is cast for `support`, withdrawing the voter's
/// `previous` (support, weight) first if there is one
pub fn apply_vote(
    yes: i128,
    no: i128,
    previous: Option<(bool, i128)>,
    support: bool,
    weight: i128,
) -> Option<(i128, i128)> {
    let (mut yes, mut no) = (yes, no);
    match previous {
        Some((true, old)) => yes = yes.checked_sub(old)?,
        Some((false, old)) => no = no.checked_sub(old)?,
        None => {}
    }
    if support {
        yes = yes.checked_add(weight)?;
    } else {
        no = no.checked_add(weight)?;
    }
    Some((yes, no))
}
