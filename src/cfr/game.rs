//! Game trait definition for the solver.
//!
//! The solver works on small two-player zero-sum games where each player is
//! dealt one private card and players alternate moves from a fixed action
//! alphabet. The game itself is static data: a deck, an alphabet, the set of
//! histories at which someone still has to act, and a payoff table for the
//! histories that end the game.

use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use crate::cfr::error::SolverError;

/// Trait for actions of the public action alphabet.
pub trait Action: Copy + Eq + Hash + Debug + Send + Sync {
    /// Single-character symbol used in identifiers (e.g. `b` for bet).
    fn symbol(&self) -> char;

    /// Position of this action in the game's action alphabet.
    fn index(&self) -> usize;
}

/// Trait for private cards.
///
/// The `Ord` implementation is the card ranking: the greater card wins a
/// showdown.
pub trait Card: Copy + Eq + Ord + Hash + Debug + Serialize + Send + Sync {
    /// Single-character symbol used in identifiers (e.g. `K` for king).
    fn symbol(&self) -> char;
}

/// Static description of a two-player private-card game.
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl Game for MyGame {
///     type Card = MyCard;
///     type Action = MyAction;
///
///     // ... implement required methods
/// }
/// ```
pub trait Game {
    /// The type of a private card.
    type Card: Card;

    /// The type of a public action.
    type Action: Action;

    /// Every card in the deck, in a fixed order.
    fn deck(&self) -> &[Self::Card];

    /// The action alphabet, in a fixed order. Strategies, utilities and
    /// cumulative gains are indexed by position in this slice, which must
    /// agree with [`Action::index`].
    fn actions(&self) -> &[Self::Action];

    /// Every history at which a player still has to act.
    fn decision_histories(&self) -> Vec<Vec<Self::Action>>;

    /// Whether `history` ends the game.
    fn is_terminal(&self, history: &[Self::Action]) -> bool;

    /// Exact payoff pair `(player 0, player 1)` for a terminal history.
    ///
    /// `cards[i]` is the private card held by player `i`.
    ///
    /// # Errors
    /// Returns [`SolverError::NotTerminal`] if `history` does not end the game.
    fn payoff(
        &self,
        cards: [Self::Card; 2],
        history: &[Self::Action],
    ) -> Result<[i32; 2], SolverError>;

    /// The player to act after `history`: decided only by its length parity.
    fn current_player(&self, history: &[Self::Action]) -> usize {
        history.len() % 2
    }

    /// The deck minus `card`, in deck order.
    fn opponent_cards(&self, card: Self::Card) -> Vec<Self::Card> {
        self.deck().iter().copied().filter(|&c| c != card).collect()
    }
}

/// Render a history as its string of action symbols.
pub fn history_string<A: Action>(history: &[A]) -> String {
    history.iter().map(Action::symbol).collect()
}
