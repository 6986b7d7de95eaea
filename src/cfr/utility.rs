//! Backward-induction utility evaluation.
//!
//! For each information set and each action, the expected payoff to the
//! acting player is computed from their belief over the opponent's card,
//! the opponent's current strategy at the next decision, and either a
//! terminal payoff or the expected utility of the acting player's own next
//! information set. Keys are visited longest history first, so that own
//! next information set has already been evaluated this iteration.

use crate::cfr::error::SolverError;
use crate::cfr::game::{Action, Game};
use crate::cfr::info_set::InfoSetKey;
use crate::cfr::storage::InfoSetStore;

/// Recompute `utility` and `expected_utility` for every information set.
///
/// Beliefs must already be current for this iteration.
pub fn update_utilities<G: Game>(
    game: &G,
    store: &mut InfoSetStore<G::Card, G::Action>,
) -> Result<(), SolverError> {
    let keys = store.all_decision_info_sets().to_vec();
    for key in keys.iter().rev() {
        let utility = action_utilities(game, store, key)?;
        let data = store.get_mut(key)?;
        data.expected_utility = data
            .strategy
            .iter()
            .zip(&utility)
            .map(|(&s, &u)| s * u)
            .sum();
        data.utility = utility;
    }
    Ok(())
}

/// Expected payoff to the player at `key` of each action in the alphabet.
pub fn action_utilities<G: Game>(
    game: &G,
    store: &InfoSetStore<G::Card, G::Action>,
    key: &InfoSetKey<G::Card, G::Action>,
) -> Result<Vec<f64>, SolverError> {
    let player = key.player();
    let belief = &store.get(key)?.belief;

    let mut utilities = Vec::with_capacity(game.actions().len());
    for &action in game.actions() {
        let next = key.child(action);
        let terminal = game.is_terminal(&next.history);

        let mut value = 0.0;
        for &(card, probability) in belief {
            let cards = seat(player, key.card, card);

            if terminal {
                value += probability * payoff_for(game, cards, &next.history, player)?;
                continue;
            }

            // Opponent moves next; weight each reply by their strategy.
            let opponent = store.get(&next.with_card(card))?;
            for &reply in game.actions() {
                let weight = probability * opponent.strategy[reply.index()];
                let after = next.child(reply);
                let outcome = if game.is_terminal(&after.history) {
                    payoff_for(game, cards, &after.history, player)?
                } else {
                    store.get(&after)?.expected_utility
                };
                value += weight * outcome;
            }
        }
        utilities.push(value);
    }
    Ok(utilities)
}

/// Arrange own and opponent cards by seat.
fn seat<C>(player: usize, own: C, opponent: C) -> [C; 2] {
    if player == 0 {
        [own, opponent]
    } else {
        [opponent, own]
    }
}

fn payoff_for<G: Game>(
    game: &G,
    cards: [G::Card; 2],
    history: &[G::Action],
    player: usize,
) -> Result<f64, SolverError> {
    Ok(f64::from(game.payoff(cards, history)?[player]))
}
