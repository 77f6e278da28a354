//! Table-driven basic strategy for the canonical ruleset (six decks,
//! dealer stands on soft 17, double after split allowed).
//!
//! The advisor is pure and advisory: the round state machine never applies
//! a recommendation on the player's behalf, and never checks legality here.
//! Doubling or splitting may be recommended on hands where the action is not
//! currently legal; the host decides what to surface in that case.

use serde::{Deserialize, Serialize};

use crate::hand::{hand_value, is_soft};
use crate::{Card, Rank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
}

/// A recommendation plus a short coaching line. The rationale is display
/// text only; no downstream logic consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub action: Action,
    pub rationale: String,
}

use Action::{Double as D, Hit as H, Split as P, Stand as S};

// Columns are the dealer upcard: 2 3 4 5 6 7 8 9 10 A.
// Jack, queen and king collapse onto the 10 column.

/// Rows keyed by the paired rank: 2 3 4 5 6 7 8 9 10 A.
const PAIRS: [[Action; 10]; 10] = [
    [P, P, P, P, P, P, H, H, H, H], // 2,2
    [P, P, P, P, P, P, H, H, H, H], // 3,3
    [H, H, H, P, P, H, H, H, H, H], // 4,4
    [D, D, D, D, D, D, D, D, H, H], // 5,5 plays as hard 10
    [P, P, P, P, P, H, H, H, H, H], // 6,6
    [P, P, P, P, P, P, H, H, H, H], // 7,7
    [P, P, P, P, P, P, P, P, P, P], // 8,8
    [P, P, P, P, P, S, P, P, S, S], // 9,9
    [S, S, S, S, S, S, S, S, S, S], // 10,10
    [P, P, P, P, P, P, P, P, P, P], // A,A
];

/// Rows keyed by the soft total, 13 through 20.
const SOFT: [[Action; 10]; 8] = [
    [H, H, H, D, D, H, H, H, H, H], // soft 13
    [H, H, H, D, D, H, H, H, H, H], // soft 14
    [H, H, D, D, D, H, H, H, H, H], // soft 15
    [H, H, D, D, D, H, H, H, H, H], // soft 16
    [H, D, D, D, D, H, H, H, H, H], // soft 17
    [S, D, D, D, D, S, S, H, H, H], // soft 18
    [S, S, S, S, S, S, S, S, S, S], // soft 19
    [S, S, S, S, S, S, S, S, S, S], // soft 20
];

/// Rows keyed by the hard total, 5 through 17. Totals below 5 cannot occur
/// with two or more cards; totals above 17 always stand.
const HARD: [[Action; 10]; 13] = [
    [H, H, H, H, H, H, H, H, H, H], // 5
    [H, H, H, H, H, H, H, H, H, H], // 6
    [H, H, H, H, H, H, H, H, H, H], // 7
    [H, H, H, H, H, H, H, H, H, H], // 8
    [H, D, D, D, D, H, H, H, H, H], // 9
    [D, D, D, D, D, D, D, D, H, H], // 10
    [D, D, D, D, D, D, D, D, D, H], // 11
    [H, H, S, S, S, H, H, H, H, H], // 12
    [S, S, S, S, S, H, H, H, H, H], // 13
    [S, S, S, S, S, H, H, H, H, H], // 14
    [S, S, S, S, S, H, H, H, H, H], // 15
    [S, S, S, S, S, H, H, H, H, H], // 16
    [S, S, S, S, S, S, S, S, S, S], // 17
];

/// Table column for a dealer upcard. Every ten-value rank shares the 10
/// column.
fn upcard_column(rank: Rank) -> usize {
    match rank {
        Rank::Ace => 9,
        _ => (rank.value() - 2) as usize,
    }
}

/// Pair-table row for a paired rank; ten-value ranks share the 10 row.
fn pair_row(rank: Rank) -> usize {
    match rank {
        Rank::Ace => 9,
        _ => (rank.value() - 2) as usize,
    }
}

/// Recommended action for a player hand against a dealer upcard.
///
/// Priority: exact two-card pairs consult the pair table, then soft totals
/// 13-20 the soft table, then the hard table.
pub fn recommend(cards: &[Card], upcard: Card) -> Advice {
    let col = upcard_column(upcard.rank);
    let action = if cards.len() == 2 && cards[0].rank == cards[1].rank {
        PAIRS[pair_row(cards[0].rank)][col]
    } else {
        flat_action(cards, col)
    };
    Advice {
        action,
        rationale: rationale(action, cards, upcard),
    }
}

/// Like [`recommend`] but ignores the pair table, for hosts or simulators
/// playing a pair that can no longer be split (split limit, bankroll).
pub fn recommend_without_split(cards: &[Card], upcard: Card) -> Advice {
    let action = flat_action(cards, upcard_column(upcard.rank));
    Advice {
        action,
        rationale: rationale(action, cards, upcard),
    }
}

fn flat_action(cards: &[Card], col: usize) -> Action {
    let total = hand_value(cards);
    if is_soft(cards) && (13..=20).contains(&total) {
        SOFT[(total - 13) as usize][col]
    } else if total >= 18 {
        S
    } else {
        HARD[(total.max(5) - 5) as usize][col]
    }
}

fn rationale(action: Action, cards: &[Card], upcard: Card) -> String {
    let total = hand_value(cards);
    let up = upcard.rank.token();
    match action {
        Action::Hit => format!("{total} against a dealer {up} is too weak to stand on; take a card"),
        Action::Stand => format!("{total} against a dealer {up} wins more often by standing"),
        Action::Double => {
            format!("{total} against a dealer {up} is a favorite; double and take one card")
        }
        Action::Split => format!(
            "a pair of {}s against a dealer {up} plays better as two hands",
            cards[0].rank.token()
        ),
    }
}
