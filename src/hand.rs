use serde::{Deserialize, Serialize};

use crate::Card;

/// How a player hand was resolved during the player-acting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandState {
    /// Still awaiting a player decision.
    Playing,
    Stood,
    /// Doubled down: one extra card, stake doubled, then stood.
    Doubled,
    Bust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Blackjack,
    Win,
    Push,
    Loss,
}

/// Calculate the value of a blackjack hand.
///
/// Aces count as 11 until the total exceeds 21, at which point they are
/// demoted to 1 one at a time. Yields the maximal total <= 21 when one
/// exists; bust totals are reported as-is.
pub fn hand_value(cards: &[Card]) -> u8 {
    let mut total: u16 = 0;
    let mut aces = 0;

    for card in cards {
        if card.rank.is_ace() {
            aces += 1;
        }
        total += card.rank.value() as u16;
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    u8::try_from(total).unwrap_or(u8::MAX)
}

/// True when an ace is currently being counted as 11.
pub fn is_soft(cards: &[Card]) -> bool {
    let hard: u16 = cards
        .iter()
        .map(|c| if c.rank.is_ace() { 1 } else { c.rank.value() as u16 })
        .sum();
    cards.iter().any(|c| c.rank.is_ace()) && hard + 10 <= 21
}

pub fn is_bust(cards: &[Card]) -> bool {
    hand_value(cards) > 21
}

/// A two-card 21. Note a 21 assembled on a post-split hand is not a natural;
/// [`Hand::is_natural`] applies that restriction.
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}

/// Two cards of the same rank may be split. Rank, not value: a king and a
/// queen both count 10 but do not form a splittable pair.
pub fn can_split_cards(first: &Card, second: &Card) -> bool {
    first.rank == second.rank
}

/// One participant's cards plus the per-hand stake bookkeeping the round
/// needs. Totals are always recomputed from the cards, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub state: HandState,
    /// 1 normally, 2 after a double down. The hand's stake is the round bet
    /// times this multiplier.
    pub stake_multiplier: u8,
    /// Hands created by splitting a pair never count as naturals.
    pub from_split: bool,
    /// Filled in at settlement.
    pub outcome: Option<HandOutcome>,
}

impl Hand {
    pub fn dealt(first: Card, second: Card) -> Self {
        Hand {
            cards: vec![first, second],
            state: HandState::Playing,
            stake_multiplier: 1,
            from_split: false,
            outcome: None,
        }
    }

    /// A one-card hand produced by splitting a pair.
    pub fn split_from(card: Card) -> Self {
        Hand {
            cards: vec![card],
            state: HandState::Playing,
            stake_multiplier: 1,
            from_split: true,
            outcome: None,
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn total(&self) -> u8 {
        hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        is_bust(&self.cards)
    }

    pub fn is_natural(&self) -> bool {
        !self.from_split && is_natural(&self.cards)
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.state, HandState::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn test_hand_value_simple() {
        assert_eq!(hand_value(&cards(&["2H", "3S"])), 5);
    }

    #[test]
    fn test_hand_value_face_cards() {
        assert_eq!(hand_value(&cards(&["KH", "QS"])), 20);
        assert_eq!(hand_value(&cards(&["JH", "10S"])), 20);
    }

    #[test]
    fn test_hand_value_soft_ace() {
        assert_eq!(hand_value(&cards(&["AH", "6S"])), 17);
    }

    #[test]
    fn test_hand_value_hard_ace() {
        assert_eq!(hand_value(&cards(&["AH", "6S", "9C"])), 16);
    }

    #[test]
    fn test_hand_value_multiple_aces() {
        assert_eq!(hand_value(&cards(&["AH", "AS", "9C"])), 21);
        assert_eq!(hand_value(&cards(&["AH", "AS", "AD", "AC"])), 14);
    }

    #[test]
    fn test_hand_value_order_independent() {
        let hand = cards(&["AH", "6S", "9C", "3D"]);
        let value = hand_value(&hand);
        let mut h = hand.clone();
        for i in 0..4 {
            for j in 0..4 {
                h.swap(i, j);
                assert_eq!(hand_value(&h), value);
            }
        }
    }

    #[test]
    fn test_no_ace_hand_is_plain_sum() {
        let hand = cards(&["2H", "7S", "KC"]);
        assert!(!is_soft(&hand));
        let sum: u8 = hand.iter().map(|c| c.rank.value()).sum();
        assert_eq!(hand_value(&hand), sum);
    }

    #[test]
    fn test_is_soft() {
        assert!(is_soft(&cards(&["AH", "6S"])));
        assert!(!is_soft(&cards(&["AH", "6S", "9C"])));
        assert!(!is_soft(&cards(&["KH", "QS"])));
        // Two aces: one stays at 11.
        assert!(is_soft(&cards(&["AH", "AS"])));
    }

    #[test]
    fn test_is_bust() {
        assert!(is_bust(&cards(&["KH", "QS", "5C"])));
        assert!(!is_bust(&cards(&["KH", "QS"])));
        assert!(!is_bust(&cards(&["AH", "KH", "QS"])));
    }

    #[test]
    fn test_is_natural() {
        assert!(is_natural(&cards(&["AH", "KS"])));
        assert!(is_natural(&cards(&["10D", "AC"])));
        assert!(!is_natural(&cards(&["7H", "7S", "7C"])));
        assert!(!is_natural(&cards(&["KH", "QS"])));
    }

    #[test]
    fn test_split_hand_21_is_not_natural() {
        let mut hand = Hand::split_from("AH".parse().unwrap());
        hand.add_card("KS".parse().unwrap());
        assert_eq!(hand.total(), 21);
        assert!(!hand.is_natural());
    }

    #[test]
    fn test_can_split_rank_not_value() {
        assert!(can_split_cards(&"8H".parse().unwrap(), &"8S".parse().unwrap()));
        assert!(!can_split_cards(&"KH".parse().unwrap(), &"QS".parse().unwrap()));
        assert!(can_split_cards(&"KH".parse().unwrap(), &"KS".parse().unwrap()));
    }

    #[test]
    fn test_hand_dealt() {
        let hand = Hand::dealt("KH".parse().unwrap(), "7S".parse().unwrap());
        assert_eq!(hand.total(), 17);
        assert_eq!(hand.state, HandState::Playing);
        assert_eq!(hand.stake_multiplier, 1);
        assert!(!hand.is_resolved());
    }

    #[test]
    fn test_hand_cannot_split_three_cards() {
        let mut hand = Hand::dealt("8H".parse().unwrap(), "8S".parse().unwrap());
        assert!(hand.can_split());
        hand.add_card("2C".parse().unwrap());
        assert!(!hand.can_split());
    }
}
