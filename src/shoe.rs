use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use crate::Card;

/// A multi-deck dealing shoe.
///
/// Cards are drawn from the top (end of the vector). The random source is
/// injected so that shuffles are reproducible under test; production use
/// seeds from OS entropy via [`Shoe::new`].
pub struct Shoe {
    cards: Vec<Card>,
    decks: u8,
    rng: Box<dyn RngCore + Send>,
    epoch: u64,
}

impl Shoe {
    /// A freshly shuffled shoe of `decks` standard decks, entropy-seeded.
    pub fn new(decks: u8) -> Self {
        Self::with_rng(decks, StdRng::from_entropy())
    }

    /// A freshly shuffled shoe using the supplied random source.
    pub fn with_rng<R: RngCore + Send + 'static>(decks: u8, rng: R) -> Self {
        let mut shoe = Shoe {
            cards: Vec::new(),
            decks: decks.max(1),
            rng: Box::new(rng),
            epoch: 0,
        };
        shoe.rebuild();
        shoe
    }

    /// A deterministic shoe stub: the given cards are drawn in order.
    /// Once exhausted the shoe rebuilds into `decks` shuffled decks like
    /// any other shoe.
    pub fn stacked(decks: u8, cards: Vec<Card>) -> Self {
        let mut ordered = cards;
        ordered.reverse(); // drawn from the top
        Shoe {
            cards: ordered,
            decks: decks.max(1),
            rng: Box::new(StdRng::from_entropy()),
            epoch: 0,
        }
    }

    /// Remove and return the top card. Never fails: an exhausted shoe is
    /// rebuilt and reshuffled first, bumping [`Shoe::epoch`].
    pub fn draw(&mut self) -> Card {
        if self.cards.is_empty() {
            log::debug!("shoe exhausted mid-draw, rebuilding {} decks", self.decks);
            self.rebuild();
        }
        // Rebuild guarantees at least one card.
        self.cards.pop().unwrap()
    }

    /// Discard the remaining cards and bring in `decks` freshly shuffled
    /// decks. Bumps the epoch.
    pub fn reshuffle(&mut self) {
        self.rebuild();
    }

    /// True when the shoe has reached the cut card and should be reshuffled
    /// between rounds.
    pub fn needs_shuffle(&self, threshold: usize) -> bool {
        self.cards.len() < threshold
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn decks(&self) -> u8 {
        self.decks
    }

    /// Incremented on every rebuild. Card counting is only meaningful within
    /// one epoch; callers tracking a count must reset it when this changes.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn rebuild(&mut self) {
        self.cards.clear();
        for _ in 0..self.decks {
            self.cards.extend(Card::deck());
        }
        self.cards.shuffle(&mut self.rng);
        self.epoch += 1;
    }
}

impl std::fmt::Debug for Shoe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shoe")
            .field("remaining", &self.cards.len())
            .field("decks", &self.decks)
            .field("epoch", &self.epoch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_shoe_size() {
        let shoe = Shoe::new(6);
        assert_eq!(shoe.remaining(), 6 * 52);
        let shoe = Shoe::new(1);
        assert_eq!(shoe.remaining(), 52);
    }

    #[test]
    fn test_shoe_composition() {
        let mut shoe = Shoe::with_rng(6, ChaCha8Rng::seed_from_u64(7));
        let mut per_rank = std::collections::HashMap::new();
        for _ in 0..6 * 52 {
            *per_rank.entry(shoe.draw().rank).or_insert(0u32) += 1;
        }
        for rank in Rank::ALL {
            assert_eq!(per_rank[&rank], 24, "6 decks carry 24 of each rank");
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let mut a = Shoe::with_rng(2, ChaCha8Rng::seed_from_u64(42));
        let mut b = Shoe::with_rng(2, ChaCha8Rng::seed_from_u64(42));
        for _ in 0..2 * 52 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = Shoe::with_rng(1, ChaCha8Rng::seed_from_u64(1));
        let mut b = Shoe::with_rng(1, ChaCha8Rng::seed_from_u64(2));
        let first_a: Vec<Card> = (0..10).map(|_| a.draw()).collect();
        let first_b: Vec<Card> = (0..10).map(|_| b.draw()).collect();
        assert_ne!(first_a, first_b);
    }

    #[test]
    fn test_draw_never_fails() {
        let mut shoe = Shoe::with_rng(1, ChaCha8Rng::seed_from_u64(3));
        let start_epoch = shoe.epoch();
        for _ in 0..52 {
            shoe.draw();
        }
        assert_eq!(shoe.remaining(), 0);
        shoe.draw(); // rebuilds transparently
        assert_eq!(shoe.remaining(), 51);
        assert_eq!(shoe.epoch(), start_epoch + 1);
    }

    #[test]
    fn test_stacked_draws_in_order() {
        let cards: Vec<Card> = ["AS", "9D", "KH", "8C"]
            .iter()
            .map(|c| c.parse().unwrap())
            .collect();
        let mut shoe = Shoe::stacked(1, cards.clone());
        for card in cards {
            assert_eq!(shoe.draw(), card);
        }
    }

    #[test]
    fn test_needs_shuffle_threshold() {
        let mut shoe = Shoe::with_rng(1, ChaCha8Rng::seed_from_u64(9));
        assert!(!shoe.needs_shuffle(15));
        for _ in 0..40 {
            shoe.draw();
        }
        assert_eq!(shoe.remaining(), 12);
        assert!(shoe.needs_shuffle(15));
        shoe.reshuffle();
        assert_eq!(shoe.remaining(), 52);
        assert!(!shoe.needs_shuffle(15));
    }
}
