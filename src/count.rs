use serde::{Deserialize, Serialize};

use crate::{Card, Rank};

/// Hi-Lo weight for one rank: 2-6 count +1, 7-9 are neutral, tens and aces
/// count -1. The weights over a full deck sum to zero.
pub fn hi_lo_weight(rank: Rank) -> i32 {
    match rank {
        Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
        Rank::Seven | Rank::Eight | Rank::Nine => 0,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
    }
}

/// Running Hi-Lo count over one continuous shoe.
///
/// Feed every card exactly once, at the moment it becomes visible to the
/// player. Cards dealt face down (the dealer hole card) are registered on
/// reveal, not on draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTracker {
    running: i32,
}

impl CountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one exposed card.
    pub fn see(&mut self, card: Card) {
        self.running += hi_lo_weight(card.rank);
    }

    /// Counting is only meaningful within one shoe; reset whenever the shoe
    /// is rebuilt.
    pub fn reset(&mut self) {
        self.running = 0;
    }

    pub fn running_count(&self) -> i32 {
        self.running
    }

    /// Running count normalized by decks left in the shoe, floored at a
    /// quarter deck so a nearly empty shoe cannot blow the ratio up.
    /// Returned unrounded; rounding is a display concern.
    pub fn true_count(&self, cards_remaining: usize) -> f64 {
        let decks_remaining = (cards_remaining as f64 / 52.0).max(0.25);
        self.running as f64 / decks_remaining
    }
}
