/// Pro-rata share of a payout
///
/// Formula: share = amount × balance / total_supply
///
/// Rounds down, so the shares of all holders never add up to more than
/// `amount`. An empty supply entitles nobody.
pub fn share(amount: i128, balance: i128, total_supply: i128) -> Option<i128> {
    if total_supply <= 0 || balance <= 0 {
        return Some(0);
    }
    amount.checked_mul(balance)?.checked_div(total_supply)
}

/// What a dividend still owes its holders
pub fn outstanding(amount: i128, claimed: i128) -> i128 {
    (amount - claimed).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_pro_rata() {
        assert_eq!(share(100_000, 600, 1_000), Some(60_000));
        assert_eq!(share(100_000, 1_000, 1_000), Some(100_000));
    }

    #[test]
    fn test_share_rounds_down() {
        assert_eq!(share(100, 1, 3), Some(33));
        assert_eq!(share(100, 2, 3), Some(66));
    }

    #[test]
    fn test_share_without_balance_or_supply() {
        assert_eq!(share(100, 0, 1_000), Some(0));
        assert_eq!(share(100, 10, 0), Some(0));
    }

    #[test]
    fn test_share_overflow() {
        assert_eq!(share(i128::MAX, 2, 3), None);
    }

    #[test]
    fn test_outstanding() {
        assert_eq!(outstanding(100, 99), 1);
        assert_eq!(outstanding(100, 100), 0);
    }
}
