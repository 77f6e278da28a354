use clap::Parser;
use pontoon::{
    recommend, recommend_without_split, Action, ActionError, Engine, HandOutcome, Phase, Shoe,
    TableRules,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(
    name = "table-sim",
    about = "Play basic strategy against the engine for many rounds and report the results"
)]
struct Args {
    /// Number of rounds to play
    #[arg(long, default_value = "10000")]
    rounds: u64,

    /// Flat bet per round
    #[arg(long, default_value = "10")]
    bet: u64,

    /// Starting bankroll
    #[arg(long, default_value = "1000000")]
    bankroll: i64,

    /// Number of decks in the shoe
    #[arg(long, default_value = "6")]
    num_decks: u8,

    /// Dealer hits soft 17
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    dealer_hits_soft_17: bool,

    /// Shuffle seed; omit for OS entropy
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Default)]
struct Tally {
    blackjacks: u64,
    wins: u64,
    pushes: u64,
    losses: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let rules = TableRules {
        dealer_hits_soft_17: args.dealer_hits_soft_17,
        num_decks: args.num_decks,
        ..TableRules::default()
    };
    let shoe = match args.seed {
        Some(seed) => Shoe::with_rng(rules.num_decks, StdRng::seed_from_u64(seed)),
        None => Shoe::new(rules.num_decks),
    };
    let mut engine = Engine::with_shoe(rules, args.bankroll, shoe);

    let mut tally = Tally::default();
    let mut rounds_played = 0u64;

    for _ in 0..args.rounds {
        if engine.start_round(args.bet).is_err() {
            eprintln!("bankroll exhausted after {rounds_played} rounds");
            break;
        }
        rounds_played += 1;

        let snap = loop {
            let snap = engine.snapshot();
            if snap.phase != Phase::PlayerActing {
                break snap;
            }
            let hand = &snap.player_hands[snap.active_hand.unwrap_or(0)];
            let upcard = snap.dealer.cards[0];
            let advice = recommend(&hand.cards, upcard);

            let result = match advice.action {
                Action::Hit => engine.hit(),
                Action::Stand => engine.stand(),
                Action::Double => engine.double_down(),
                Action::Split => engine.split(),
            };
            match result {
                Ok(_) => {}
                Err(ActionError::SplitLimitReached(_))
                | Err(ActionError::InsufficientBankroll { .. })
                | Err(ActionError::NotTwoCards(_))
                | Err(ActionError::DoubleAfterSplitDisabled) => {
                    // Recommended action is not legal here; play the hand
                    // on its total instead.
                    let fallback = recommend_without_split(&hand.cards, upcard);
                    let fell_back = match fallback.action {
                        Action::Stand => engine.stand(),
                        _ => engine.hit(),
                    };
                    fell_back.expect("hit/stand are always legal on the active hand");
                }
                Err(err) => panic!("unexpected engine rejection: {err}"),
            }
        };

        for hand in &snap.player_hands {
            match hand.outcome {
                Some(HandOutcome::Blackjack) => tally.blackjacks += 1,
                Some(HandOutcome::Win) => tally.wins += 1,
                Some(HandOutcome::Push) => tally.pushes += 1,
                Some(HandOutcome::Loss) => tally.losses += 1,
                None => {}
            }
        }
    }

    let final_snap = engine.snapshot();
    let net = final_snap.bankroll - args.bankroll;
    let hands = tally.blackjacks + tally.wins + tally.pushes + tally.losses;
    let units = net as f64 / args.bet as f64;

    println!("rounds played:   {rounds_played}");
    println!("hands resolved:  {hands}");
    println!(
        "  blackjacks {}  wins {}  pushes {}  losses {}",
        tally.blackjacks, tally.wins, tally.pushes, tally.losses
    );
    println!("net chips:       {net:+}");
    println!("net units:       {units:+.1}");
    if rounds_played > 0 {
        println!(
            "return per bet:  {:+.4}%",
            100.0 * net as f64 / (rounds_played * args.bet) as f64
        );
    }
    println!(
        "final count:     running {} / true {:.2} ({} cards left)",
        final_snap.running_count, final_snap.true_count, final_snap.cards_remaining
    );
}
