//! Winner selection over a virtual ticket array.
//!
//! Draws are a partial Fisher-Yates shuffle of `[0, total_tickets)` that only
//! records the slots it has touched, so memory is proportional to the number
//! of winners rather than the number of tickets sold. Every random word is
//! derived from one seed and the draw number, which makes the outcome a pure
//! function of `(seed, total_tickets, winners)`.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hashv;
use arrayref::array_ref;

use crate::error::AllocationError;

/// Selects `min(winners, total_tickets)` distinct ticket indices.
///
/// Winners are returned in draw order.
pub fn select_winners(seed: &[u8; 32], total_tickets: u32, winners: u32) -> Result<Vec<u32>> {
    let draws = winners.min(total_tickets);
    let mut touched: BTreeMap<u32, u32> = BTreeMap::new();
    let mut chosen = Vec::with_capacity(draws as usize);

    for draw in 0..draws {
        let remaining = total_tickets - draw;
        let last = remaining - 1;
        let slot = unbiased_range(seed_word(seed, draw), u64::from(remaining))? as u32;

        let ticket = touched.get(&slot).copied().unwrap_or(slot);
        chosen.push(ticket);

        let replacement = touched.get(&last).copied().unwrap_or(last);
        touched.insert(slot, replacement);
        touched.remove(&last);
    }

    Ok(chosen)
}

/// Random word for draw `draw`: the first 8 bytes of SHA-256(seed || draw).
pub fn seed_word(seed: &[u8; 32], draw: u32) -> u64 {
    let digest = hashv(&[&seed[..], &draw.to_le_bytes()[..]]).to_bytes();
    u64::from_le_bytes(*array_ref![digest, 0, 8])
}

/// Cryptographic mixing function with strong avalanche properties.
/// Based on the splitmix64 finalizer.
fn mix(a: u64, b: u64) -> u64 {
    let mut z = a.wrapping_add(b);

    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z = z ^ (z >> 31);

    z
}

/// Maps a random word into `[0, range)` without modulo bias.
fn unbiased_range(x: u64, range: u64) -> Result<u64> {
    require!(range > 0, AllocationError::ArithmeticOverflow);

    if range.is_power_of_two() {
        return Ok(x & (range - 1));
    }

    // Largest multiple of `range` that fits; words at or above it would favour low slots.
    let threshold = u64::MAX - (u64::MAX % range);

    let mut value = x;
    const MAX_ATTEMPTS: u8 = 3;
    for i in 0..MAX_ATTEMPTS {
        if value < threshold {
            return Ok(value % range);
        }
        value = mix(value, value.wrapping_add(u64::from(i) + 1));
    }

    // Only reachable with probability below (range / 2^64)^3.
    Ok(value % range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    fn assert_distinct_in_range(winners: &[u32], total: u32) {
        let mut sorted = winners.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), winners.len());
        assert!(winners.iter().all(|ticket| *ticket < total));
    }

    #[test]
    fn draws_requested_count_of_distinct_tickets() {
        let winners = select_winners(&seed(1), 24, 10).unwrap();
        assert_eq!(winners.len(), 10);
        assert_distinct_in_range(&winners, 24);
    }

    #[test]
    fn same_seed_same_winners() {
        let first = select_winners(&seed(9), 1_000, 50).unwrap();
        let second = select_winners(&seed(9), 1_000, 50).unwrap();
        assert_eq!(first, second);

        let other = select_winners(&seed(10), 1_000, 50).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn undersold_pool_returns_every_ticket() {
        let mut winners = select_winners(&seed(3), 7, 10).unwrap();
        winners.sort_unstable();
        assert_eq!(winners, (0..7).collect::<Vec<_>>());

        assert!(select_winners(&seed(3), 0, 10).unwrap().is_empty());
        assert!(select_winners(&seed(3), 10, 0).unwrap().is_empty());
    }

    #[test]
    fn large_pool_with_few_winners() {
        let winners = select_winners(&seed(42), u32::MAX, 64).unwrap();
        assert_eq!(winners.len(), 64);
        assert_distinct_in_range(&winners, u32::MAX);
    }

    #[test]
    fn every_ticket_can_win() {
        let total = 12;
        let mut hits = vec![0u32; total as usize];
        for byte in 0..=255u8 {
            for ticket in select_winners(&seed(byte), total, 3).unwrap() {
                hits[ticket as usize] += 1;
            }
        }
        // 768 picks over 12 tickets, 64 expected each
        assert!(hits.iter().all(|count| *count > 20 && *count < 120), "{hits:?}");
    }

    #[test]
    fn unbiased_range_respects_bounds() {
        assert_eq!(unbiased_range(0xff, 16).unwrap(), 0xf);
        assert_eq!(unbiased_range(u64::MAX, 1).unwrap(), 0);
        assert!(unbiased_range(u64::MAX, 1_000_003).unwrap() < 1_000_003);
        assert!(unbiased_range(5, 0).is_err());
    }
}
