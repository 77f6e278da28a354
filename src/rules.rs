use serde::{Deserialize, Serialize};

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, &'static str> {
        if denominator == 0 {
            return Err("Denominator cannot be zero");
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn calculate_payout(&self, stake: u64) -> u64 {
        (stake * self.numerator as u64) / self.denominator as u64
    }
}

/// Configurable table rules for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Dealer hits on soft 17. The canonical ruleset stands.
    pub dealer_hits_soft_17: bool,

    /// Allow doubling on a hand created by a split.
    pub double_after_split: bool,

    /// Maximum number of splits per round. 1 means a pair may be split once
    /// and the resulting hands never resplit.
    pub max_splits: u8,

    /// Blackjack payout multiplier (commonly 3:2 or 6:5)
    pub blackjack_payout: PayoutRatio,

    /// Number of decks in the shoe
    pub num_decks: u8,

    /// Cut card: reshuffle between rounds once fewer than this many cards
    /// remain. Reshuffling resets the running count.
    pub reshuffle_at: usize,
}

impl Default for TableRules {
    fn default() -> Self {
        // Canonical ruleset: six decks, stand on soft 17, double after
        // split, single-level split, 3:2 naturals.
        Self {
            dealer_hits_soft_17: false,
            double_after_split: true,
            max_splits: 1,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            num_decks: 6,
            reshuffle_at: 15,
        }
    }
}

impl TableRules {
    /// Single deck rules (often found in casinos, but with 6:5 blackjack)
    pub fn single_deck() -> Self {
        Self {
            dealer_hits_soft_17: true,
            double_after_split: false,
            max_splits: 1,
            blackjack_payout: PayoutRatio::SIX_TO_FIVE,
            num_decks: 1,
            reshuffle_at: 15,
        }
    }
}
