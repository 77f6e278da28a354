use serde::{Deserialize, Serialize};

use crate::count::CountTracker;
use crate::error::ActionError;
use crate::hand::{hand_value, is_natural, is_soft, Hand, HandOutcome, HandState};
use crate::rules::TableRules;
use crate::shoe::Shoe;
use crate::strategy::{self, Advice};
use crate::Card;

/// Authoritative round phase. The dealt state is transient: by the time
/// `start_round` returns, the machine has already advanced to the first
/// player decision. Dealer play likewise runs to completion inside whichever
/// action resolves the last player hand, so callers observe `DealerActing`
/// only through snapshots taken by a host driving the engine step by step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Betting,
    PlayerActing,
    DealerActing,
    Settled,
}

/// One player hand as exposed to hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandView {
    pub cards: Vec<Card>,
    pub total: u8,
    pub soft: bool,
    pub state: HandState,
    /// Chips riding on this hand (bet times the double multiplier).
    pub stake: u64,
    pub outcome: Option<HandOutcome>,
}

/// Dealer cards as exposed to hosts. Until the hole card is revealed only
/// the upcard appears here; hosts render a card back for the hole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealerView {
    pub cards: Vec<Card>,
    pub hole_revealed: bool,
    /// Total over the cards listed above, i.e. the upcard alone until the
    /// reveal.
    pub total: u8,
}

/// Immutable state snapshot handed to the presentation layer after every
/// action. The engine owns all mutable state; hosts only ever see these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub player_hands: Vec<HandView>,
    /// Index of the hand awaiting a decision while `PlayerActing`.
    pub active_hand: Option<usize>,
    pub dealer: DealerView,
    pub bet: u64,
    pub bankroll: i64,
    pub running_count: i32,
    /// Unrounded; round for display only.
    pub true_count: f64,
    pub cards_remaining: usize,
    /// Basic-strategy advice for the active hand, present only in coaching
    /// mode. The engine never applies this itself; hosts compare it with the
    /// action the player actually took.
    pub advice: Option<Advice>,
}

/// Blackjack round engine: owns the shoe, the running count, the bankroll
/// and the round state machine. Fully synchronous; every action either
/// completes and returns a fresh snapshot or is rejected unchanged.
#[derive(Debug)]
pub struct Engine {
    rules: TableRules,
    shoe: Shoe,
    counter: CountTracker,
    /// Shoe epoch the counter has been tracking; a mismatch means the shoe
    /// was rebuilt and counting continuity broke.
    counted_epoch: u64,
    coaching: bool,
    bankroll: i64,
    phase: Phase,
    bet: u64,
    hands: Vec<Hand>,
    active: usize,
    dealer: Vec<Card>,
    hole_revealed: bool,
}

impl Engine {
    /// Engine with an entropy-shuffled shoe of `rules.num_decks` decks.
    pub fn new(rules: TableRules, bankroll: i64) -> Self {
        let shoe = Shoe::new(rules.num_decks);
        Self::with_shoe(rules, bankroll, shoe)
    }

    /// Engine over a caller-supplied shoe, for seeded or stacked play.
    pub fn with_shoe(rules: TableRules, bankroll: i64, shoe: Shoe) -> Self {
        Engine {
            rules,
            counted_epoch: shoe.epoch(),
            shoe,
            counter: CountTracker::new(),
            coaching: false,
            bankroll,
            phase: Phase::Betting,
            bet: 0,
            hands: Vec::new(),
            active: 0,
            dealer: Vec::new(),
            hole_revealed: false,
        }
    }

    /// Coaching mode attaches basic-strategy advice to snapshots.
    pub fn set_coaching(&mut self, on: bool) {
        self.coaching = on;
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bankroll(&self) -> i64 {
        self.bankroll
    }

    /// Deal a new round: player, dealer upcard, player, dealer hole, in that
    /// order. Legal from `Betting` or `Settled`. The hole card's count
    /// exposure is deferred until the dealer reveal.
    pub fn start_round(&mut self, bet: u64) -> Result<Snapshot, ActionError> {
        match self.phase {
            Phase::Betting | Phase::Settled => {}
            phase => return Err(ActionError::WrongPhase { action: "deal", phase }),
        }
        if bet == 0 {
            return Err(ActionError::BetTooLow);
        }
        if self.bankroll < bet as i64 {
            return Err(ActionError::InsufficientBankroll {
                need: bet,
                have: self.bankroll,
            });
        }

        if self.shoe.needs_shuffle(self.rules.reshuffle_at) {
            log::debug!(
                "cut card reached with {} cards left, reshuffling",
                self.shoe.remaining()
            );
            self.shoe.reshuffle();
            self.sync_count_epoch();
        }

        self.bet = bet;
        self.dealer.clear();
        self.hole_revealed = false;

        let first = self.draw_exposed();
        let upcard = self.draw_exposed();
        self.dealer.push(upcard);
        let second = self.draw_exposed();
        let hole = self.draw_hidden();
        self.dealer.push(hole);

        self.hands = vec![Hand::dealt(first, second)];
        self.active = 0;
        self.phase = Phase::PlayerActing;
        log::debug!(
            "dealt round: player {} vs dealer {}, bet {bet}",
            hand_value(&self.hands[0].cards),
            upcard
        );
        Ok(self.snapshot())
    }

    /// Draw one card into the active hand. A bust resolves the hand and
    /// control moves on.
    pub fn hit(&mut self) -> Result<Snapshot, ActionError> {
        self.require_player_turn("hit")?;
        let card = self.draw_exposed();
        let hand = &mut self.hands[self.active];
        hand.add_card(card);
        if hand.is_bust() {
            hand.state = HandState::Bust;
            self.advance();
        }
        Ok(self.snapshot())
    }

    /// Resolve the active hand as stood.
    pub fn stand(&mut self) -> Result<Snapshot, ActionError> {
        self.require_player_turn("stand")?;
        self.hands[self.active].state = HandState::Stood;
        self.advance();
        Ok(self.snapshot())
    }

    /// Double the active hand's stake, draw exactly one card, then stand.
    /// Only legal on a two-card hand with enough bankroll to cover the
    /// extra stake.
    pub fn double_down(&mut self) -> Result<Snapshot, ActionError> {
        self.require_player_turn("double")?;
        let hand = &self.hands[self.active];
        if hand.cards.len() != 2 {
            return Err(ActionError::NotTwoCards("double"));
        }
        if hand.from_split && !self.rules.double_after_split {
            return Err(ActionError::DoubleAfterSplitDisabled);
        }
        let need = self.committed_stake() + self.bet;
        if self.bankroll < need as i64 {
            return Err(ActionError::InsufficientBankroll {
                need,
                have: self.bankroll,
            });
        }

        let card = self.draw_exposed();
        let hand = &mut self.hands[self.active];
        hand.stake_multiplier = 2;
        hand.add_card(card);
        hand.state = if hand.is_bust() {
            HandState::Bust
        } else {
            HandState::Doubled
        };
        self.advance();
        Ok(self.snapshot())
    }

    /// Split the active two-card pair into two hands, each immediately drawn
    /// one card. The active index stays on the first resulting hand.
    pub fn split(&mut self) -> Result<Snapshot, ActionError> {
        self.require_player_turn("split")?;
        let hand = &self.hands[self.active];
        if hand.cards.len() != 2 {
            return Err(ActionError::NotTwoCards("split"));
        }
        if hand.cards[0].rank != hand.cards[1].rank {
            return Err(ActionError::RanksDiffer);
        }
        // Every hand past the first exists because of a split.
        let splits_used = (self.hands.len() - 1) as u8;
        if splits_used >= self.rules.max_splits {
            return Err(ActionError::SplitLimitReached(self.rules.max_splits));
        }
        let need = self.committed_stake() + self.bet;
        if self.bankroll < need as i64 {
            return Err(ActionError::InsufficientBankroll {
                need,
                have: self.bankroll,
            });
        }

        let second = self.hands[self.active].cards.remove(1);
        self.hands[self.active].from_split = true;
        let mut new_hand = Hand::split_from(second);

        let to_first = self.draw_exposed();
        self.hands[self.active].add_card(to_first);
        let to_second = self.draw_exposed();
        new_hand.add_card(to_second);

        self.hands.insert(self.active + 1, new_hand);
        Ok(self.snapshot())
    }

    /// State as visible to a host right now.
    pub fn snapshot(&self) -> Snapshot {
        let dealer_cards: Vec<Card> = if self.hole_revealed {
            self.dealer.clone()
        } else {
            self.dealer.iter().take(1).copied().collect()
        };
        let advice = if self.coaching && self.phase == Phase::PlayerActing {
            self.dealer
                .first()
                .map(|&up| strategy::recommend(&self.hands[self.active].cards, up))
        } else {
            None
        };

        Snapshot {
            phase: self.phase,
            player_hands: self
                .hands
                .iter()
                .map(|h| HandView {
                    cards: h.cards.clone(),
                    total: h.total(),
                    soft: h.is_soft(),
                    state: h.state,
                    stake: self.bet * h.stake_multiplier as u64,
                    outcome: h.outcome,
                })
                .collect(),
            active_hand: (self.phase == Phase::PlayerActing).then_some(self.active),
            dealer: DealerView {
                total: hand_value(&dealer_cards),
                cards: dealer_cards,
                hole_revealed: self.hole_revealed,
            },
            bet: self.bet,
            bankroll: self.bankroll,
            running_count: self.counter.running_count(),
            true_count: self.counter.true_count(self.shoe.remaining()),
            cards_remaining: self.shoe.remaining(),
            advice,
        }
    }

    // ── internals ──

    fn require_player_turn(&self, action: &'static str) -> Result<(), ActionError> {
        if self.phase != Phase::PlayerActing {
            return Err(ActionError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Chips at risk across all hands this round.
    fn committed_stake(&self) -> u64 {
        self.hands
            .iter()
            .map(|h| self.bet * h.stake_multiplier as u64)
            .sum()
    }

    /// Draw a card that becomes visible immediately.
    fn draw_exposed(&mut self) -> Card {
        let card = self.shoe.draw();
        self.sync_count_epoch();
        self.counter.see(card);
        card
    }

    /// Draw the dealer hole card; its count contribution waits for the
    /// reveal.
    fn draw_hidden(&mut self) -> Card {
        let card = self.shoe.draw();
        self.sync_count_epoch();
        card
    }

    fn sync_count_epoch(&mut self) {
        if self.shoe.epoch() != self.counted_epoch {
            self.counted_epoch = self.shoe.epoch();
            self.counter.reset();
            log::debug!("shoe rebuilt, running count reset");
        }
    }

    /// Move to the next unresolved player hand, or run the dealer out and
    /// settle once every hand has been resolved by an explicit action.
    fn advance(&mut self) {
        match self.hands.iter().position(|h| !h.is_resolved()) {
            Some(i) => self.active = i,
            None => {
                self.phase = Phase::DealerActing;
                self.reveal_hole();
                self.play_dealer();
                self.settle();
            }
        }
    }

    fn reveal_hole(&mut self) {
        self.hole_revealed = true;
        // Deferred count exposure happens now.
        let hole = self.dealer[1];
        self.counter.see(hole);
        log::trace!("hole card revealed: {hole}");
    }

    fn play_dealer(&mut self) {
        loop {
            let total = hand_value(&self.dealer);
            let soft = is_soft(&self.dealer);
            let hits = total < 17 || (total == 17 && soft && self.rules.dealer_hits_soft_17);
            if !hits {
                break;
            }
            let card = self.draw_exposed();
            self.dealer.push(card);
        }
    }

    fn settle(&mut self) {
        let dealer_total = hand_value(&self.dealer);
        let dealer_natural = is_natural(&self.dealer);
        let mut net: i64 = 0;

        for hand in &mut self.hands {
            let stake = self.bet * hand.stake_multiplier as u64;
            let total = hand_value(&hand.cards);
            let natural = hand.is_natural();

            let (outcome, delta) = if natural && !dealer_natural {
                let payout = self.rules.blackjack_payout.calculate_payout(stake);
                (HandOutcome::Blackjack, payout as i64)
            } else if dealer_natural && !natural {
                (HandOutcome::Loss, -(stake as i64))
            } else if total > 21 {
                (HandOutcome::Loss, -(stake as i64))
            } else if dealer_total > 21 {
                (HandOutcome::Win, stake as i64)
            } else if total > dealer_total {
                (HandOutcome::Win, stake as i64)
            } else if total < dealer_total {
                (HandOutcome::Loss, -(stake as i64))
            } else {
                (HandOutcome::Push, 0)
            };

            hand.outcome = Some(outcome);
            net += delta;
        }

        self.bankroll += net;
        self.phase = Phase::Settled;
        log::debug!(
            "round settled: net {net:+}, bankroll {}, dealer {}",
            self.bankroll,
            dealer_total
        );
    }
}
