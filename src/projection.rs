// src/projection.rs
//! Pure projection math for unsettled hands.
//!
//! The minimum-interest schedule is linear in the hands remaining: every hand
//! still to come must contribute one unit of minimum interest, so the floor
//! discount is largest for hand #1 and shrinks to a single unit for the last
//! hand. These functions take the pool and hand explicitly; nothing here
//! touches storage, which is what lets the engine and the contribution
//! tracker share one formula.

use uuid::Uuid;

use crate::distribution::Distribution;
use crate::hand::Hand;
use crate::pool::Pool;

/// Distance from the final hand, counting the hand itself: the last hand is
/// 1 step from the end, hand #1 is `tenure` steps.
pub fn steps_from_end(pool: &Pool, hand: &Hand) -> u32 {
    pool.tenure - hand.number + 1
}

/// Expected payout for an unsettled hand under the minimum-interest schedule.
/// Doubles as the bid-price ceiling when the hand is auctioned.
pub fn projected_payout(pool: &Pool, hand: &Hand) -> i64 {
    let deduction = pool.min_interest.of(pool.amount);
    pool.amount - steps_from_end(pool, hand) as i64 * deduction
}

/// Interest the pool must earn on this hand for a bid to be acceptable.
pub fn required_interest(pool: &Pool, hand: &Hand) -> i64 {
    pool.amount - projected_payout(pool, hand)
}

/// Interest the pool actually earns if the hand settles at `bid_price`.
pub fn earned_interest(pool: &Pool, bid_price: i64) -> i64 {
    pool.amount - bid_price
}

/// Effective discount of `payout` off the face value, in basis points.
pub fn interest_rate_bps(pool_amount: i64, payout: i64) -> u32 {
    if pool_amount <= 0 {
        return 0;
    }
    ((pool_amount - payout) as i128 * 10_000 / pool_amount as i128) as u32
}

/// Payout amount for a hand: the settled bid when distributions exist, the
/// projection otherwise.
pub fn payout_amount(pool: &Pool, hand: &Hand, distributions: &[Distribution]) -> i64 {
    if distributions.is_empty() {
        projected_payout(pool, hand)
    } else {
        distributions.iter().map(|d| d.amount).sum()
    }
}

/// The authoritative per-person share of a payout. Display/projection only;
/// settlement postings use the exact largest-remainder split.
pub fn contribution_per_person(payout: i64, member_count: usize) -> i64 {
    if member_count == 0 {
        return 0;
    }
    payout / member_count as i64
}

/// A specific member's exact share of `total`, matching the assignment the
/// settlement made: shares in largest-remainder order over the sorted roster.
pub fn member_share(total: i64, members: &[Uuid], person: Uuid) -> Option<i64> {
    let index = members.iter().position(|m| *m == person)?;
    Some(crate::money::split_equal(total, members.len())[index])
}
