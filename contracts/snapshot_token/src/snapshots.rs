//! Append-only balance history keyed by ledger sequence.
//!
//! Each subject (total supply or one account) owns an ordered list of
//! `Snapshot { counter, value }` records with strictly increasing counters.
//! Several writes within the same ledger collapse into the last record.

use soroban_sdk::Env;

use crate::error::Error;
use crate::storage::{DataKey, Snapshot, SnapshotSubject};

pub fn count(env: &Env, subject: &SnapshotSubject) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::SnapshotCount(subject.clone()))
        .unwrap_or(0)
}

pub fn get(env: &Env, subject: &SnapshotSubject, index: u32) -> Option<Snapshot> {
    env.storage()
        .persistent()
        .get(&DataKey::Snapshot(subject.clone(), index))
}

pub fn latest(env: &Env, subject: &SnapshotSubject) -> Option<Snapshot> {
    match count(env, subject) {
        0 => None,
        len => get(env, subject, len - 1),
    }
}

/// Records `value` for `subject` at `counter`.
///
/// # Errors
/// - `NonMonotonicSnapshot`: `counter` is lower than the last recorded counter
pub fn write(
    env: &Env,
    subject: &SnapshotSubject,
    counter: u32,
    value: i128,
) -> Result<(), Error> {
    let len = count(env, subject);
    let snapshot = Snapshot { counter, value };

    if let Some(last) = latest(env, subject) {
        if counter < last.counter {
            return Err(Error::NonMonotonicSnapshot);
        }
        if counter == last.counter {
            env.storage()
                .persistent()
                .set(&DataKey::Snapshot(subject.clone(), len - 1), &snapshot);
            return Ok(());
        }
    }

    env.storage()
        .persistent()
        .set(&DataKey::Snapshot(subject.clone(), len), &snapshot);
    env.storage()
        .persistent()
        .set(&DataKey::SnapshotCount(subject.clone()), &(len + 1));

    Ok(())
}

/// Value of `subject` as of `counter`: the latest record whose counter is
/// not greater than `counter`, or 0 if there is none.
///
/// # Errors
/// - `FutureQuery`: `counter` is beyond the current ledger sequence
pub fn value_at(env: &Env, subject: &SnapshotSubject, counter: u32) -> Result<i128, Error> {
    if counter > env.ledger().sequence() {
        return Err(Error::FutureQuery);
    }

    let len = count(env, subject);
    let index = latest_at_or_before(len, counter, |i| {
        get(env, subject, i).map_or(u32::MAX, |s| s.counter)
    });

    Ok(index
        .and_then(|i| get(env, subject, i))
        .map_or(0, |s| s.value))
}

/// Binary search over `len` ascending counters for the last index whose
/// counter is `<= target`.
pub(crate) fn latest_at_or_before<F>(len: u32, target: u32, counter_at: F) -> Option<u32>
where
    F: Fn(u32) -> u32,
{
    let (mut lo, mut hi) = (0u32, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if counter_at(mid) <= target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo.checked_sub(1)
}
