//! Blackjack round engine: multi-deck shoe, soft/hard hand evaluation,
//! Hi-Lo card counting, a basic-strategy advisor, and the round state
//! machine that drives betting, player actions, dealer play and
//! settlement. Presentation is a host concern; the engine only hands out
//! immutable [`Snapshot`]s.

mod card;
mod count;
mod engine;
mod error;
mod hand;
mod rules;
mod shoe;
mod strategy;

pub use card::{Card, ParseCardError, Rank, Suit};
pub use count::{hi_lo_weight, CountTracker};
pub use engine::{DealerView, Engine, HandView, Phase, Snapshot};
pub use error::ActionError;
pub use hand::{
    can_split_cards, hand_value, is_bust, is_natural, is_soft, Hand, HandOutcome, HandState,
};
pub use rules::{PayoutRatio, TableRules};
pub use shoe::Shoe;
pub use strategy::{recommend, recommend_without_split, Action, Advice};
