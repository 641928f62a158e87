//! Top spender ranking.
//!
//! The database aggregates completed purchases per user; [`standings`] turns
//! those totals into the public leaderboard so ordering, filtering and the
//! size cap live in one place regardless of which store produced them.

use serde::{Deserialize, Serialize};

use crate::types::{Price, UserId};

/// Number of places on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// Aggregated completed spend for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpenderTotals {
    pub user_id: UserId,
    pub minecraft_username: String,
    pub total_spent: Price,
    pub total_purchases: u32,
}

/// A ranked leaderboard row. Ranks start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub minecraft_username: String,
    pub total_spent: Price,
    pub total_purchases: u32,
}

/// Rank spenders: positive totals only, highest first, at most
/// [`LEADERBOARD_SIZE`] entries. Ties keep the earlier account ahead.
#[must_use]
pub fn standings(totals: impl IntoIterator<Item = SpenderTotals>) -> Vec<LeaderboardEntry> {
    let mut totals: Vec<_> = totals
        .into_iter()
        .filter(|t| t.total_spent > Price::ZERO)
        .collect();
    totals.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    totals
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .zip(1_u32..)
        .map(|(t, rank)| LeaderboardEntry {
            rank,
            user_id: t.user_id,
            minecraft_username: t.minecraft_username,
            total_spent: t.total_spent,
            total_purchases: t.total_purchases,
        })
        .collect()
}
