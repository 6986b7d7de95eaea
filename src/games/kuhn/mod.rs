//! Kuhn Poker definition for the solver.
//!
//! Kuhn Poker is a simplified poker game with a known Nash equilibrium, small
//! enough that every information set can be held and updated each iteration.
//!
//! ## Game Rules
//!
//! - 3 cards: Jack < Queen < King
//! - 2 players, each antes 1 chip
//! - Each player receives 1 card
//! - Player 0 acts first: Bet (1 chip) or Pass
//! - Higher card wins at showdown
//!
//! ## Game Tree
//!
//! ```text
//! P0 (first to act)
//! ├── Pass
//! │   └── P1
//! │       ├── Pass → Showdown (±1)
//! │       └── Bet
//! │           └── P0
//! │               ├── Pass → P1 wins 1
//! │               └── Bet → Showdown (±2)
//! └── Bet
//!     └── P1
//!         ├── Pass → P0 wins 1
//!         └── Bet → Showdown (±2)
//! ```
//!
//! ## Known Nash Equilibrium
//!
//! - **P0 with Jack**: Bet with probability α ∈ [0, 1/3]
//! - **P0 with Queen**: Always Pass
//! - **P0 with King**: Bet with probability 3α
//! - **P1 facing Bet with Jack**: Always Fold
//! - **P1 facing Bet with Queen**: Call with probability 1/3
//! - **P1 facing Bet with King**: Always Call
//!
//! **Expected Value**: P0 EV = -1/18 ≈ -0.0556

use std::fmt;

use serde::Serialize;

use crate::cfr::error::SolverError;
use crate::cfr::game::{history_string, Action, Card, Game};
use crate::cfr::info_set::InfoSetKey;

/// Cards in Kuhn Poker, ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum KuhnCard {
    /// Lowest card.
    Jack,
    /// Middle card.
    Queen,
    /// Highest card.
    King,
}

impl Card for KuhnCard {
    fn symbol(&self) -> char {
        match self {
            KuhnCard::Jack => 'J',
            KuhnCard::Queen => 'Q',
            KuhnCard::King => 'K',
        }
    }
}

impl fmt::Display for KuhnCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnCard::Jack => write!(f, "Jack"),
            KuhnCard::Queen => write!(f, "Queen"),
            KuhnCard::King => write!(f, "King"),
        }
    }
}

/// Actions in Kuhn Poker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KuhnAction {
    /// Bet (or call if facing a bet)
    Bet,
    /// Pass (check if no bet, fold if facing a bet)
    Pass,
}

impl Action for KuhnAction {
    fn symbol(&self) -> char {
        match self {
            KuhnAction::Bet => 'b',
            KuhnAction::Pass => 'p',
        }
    }

    fn index(&self) -> usize {
        match self {
            KuhnAction::Bet => 0,
            KuhnAction::Pass => 1,
        }
    }
}

impl fmt::Display for KuhnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnAction::Bet => write!(f, "Bet"),
            KuhnAction::Pass => write!(f, "Pass"),
        }
    }
}

/// The deck, in the order information sets are listed.
pub const DECK: [KuhnCard; 3] = [KuhnCard::King, KuhnCard::Queen, KuhnCard::Jack];

/// The action alphabet, in index order.
pub const ACTIONS: [KuhnAction; 2] = [KuhnAction::Bet, KuhnAction::Pass];

/// Kuhn Poker game.
#[derive(Debug, Clone, Default)]
pub struct KuhnPoker;

impl KuhnPoker {
    /// Create a new Kuhn Poker game.
    pub fn new() -> Self {
        Self
    }

    /// A fixed, hand-worked strategy profile as `(key, [bet, pass])` pairs.
    ///
    /// Useful for checking a single iteration against values worked out on
    /// paper; apply it with [`crate::cfr::CfrSolver::set_strategy`].
    pub fn reference_profile() -> Vec<(InfoSetKey<KuhnCard, KuhnAction>, [f64; 2])> {
        use KuhnAction::{Bet, Pass};
        use KuhnCard::{Jack, King, Queen};

        vec![
            // player 0
            (InfoSetKey::root(King), [2.0 / 3.0, 1.0 / 3.0]),
            (InfoSetKey::root(Queen), [0.5, 0.5]),
            (InfoSetKey::root(Jack), [1.0 / 3.0, 2.0 / 3.0]),
            (InfoSetKey::new(King, vec![Pass, Bet]), [1.0, 0.0]),
            (InfoSetKey::new(Queen, vec![Pass, Bet]), [0.5, 0.5]),
            (InfoSetKey::new(Jack, vec![Pass, Bet]), [0.0, 1.0]),
            // player 1
            (InfoSetKey::new(King, vec![Bet]), [1.0, 0.0]),
            (InfoSetKey::new(King, vec![Pass]), [1.0, 0.0]),
            (InfoSetKey::new(Queen, vec![Bet]), [0.5, 0.5]),
            (InfoSetKey::new(Queen, vec![Pass]), [2.0 / 3.0, 1.0 / 3.0]),
            (InfoSetKey::new(Jack, vec![Bet]), [0.0, 1.0]),
            (InfoSetKey::new(Jack, vec![Pass]), [1.0 / 3.0, 2.0 / 3.0]),
        ]
    }
}

impl Game for KuhnPoker {
    type Card = KuhnCard;
    type Action = KuhnAction;

    fn deck(&self) -> &[KuhnCard] {
        &DECK
    }

    fn actions(&self) -> &[KuhnAction] {
        &ACTIONS
    }

    fn decision_histories(&self) -> Vec<Vec<KuhnAction>> {
        use KuhnAction::{Bet, Pass};
        vec![vec![], vec![Pass], vec![Bet], vec![Pass, Bet]]
    }

    fn is_terminal(&self, history: &[KuhnAction]) -> bool {
        use KuhnAction::{Bet, Pass};
        // "pp" - both pass, showdown
        // "bb" - bet, call
        // "bp" - bet, fold
        // "pbb" - pass, bet, call
        // "pbp" - pass, bet, fold
        matches!(
            history,
            [Pass, Pass] | [Bet, Bet] | [Bet, Pass] | [Pass, Bet, Bet] | [Pass, Bet, Pass]
        )
    }

    fn payoff(&self, cards: [KuhnCard; 2], history: &[KuhnAction]) -> Result<[i32; 2], SolverError> {
        use KuhnAction::{Bet, Pass};

        let showdown = |stake: i32| {
            if cards[0] > cards[1] {
                [stake, -stake]
            } else {
                [-stake, stake]
            }
        };

        match history {
            [Pass, Pass] => Ok(showdown(1)),
            [Bet, Bet] | [Pass, Bet, Bet] => Ok(showdown(2)),
            // Folds pay the ante to whoever bet, whatever the cards
            [Bet, Pass] => Ok([1, -1]),
            [Pass, Bet, Pass] => Ok([-1, 1]),
            _ => Err(SolverError::NotTerminal {
                history: history_string(history),
            }),
        }
    }
}
