//! Belief propagation over the opponent's hidden card.
//!
//! At the first decision of the game the acting player knows nothing beyond
//! their own card, so the belief is uniform over the rest of the deck. After
//! that, the last public action was taken by the opponent, and Bayes' rule
//! gives a posterior proportional to the probability that each candidate
//! opponent card would have produced that action.

use crate::cfr::error::SolverError;
use crate::cfr::game::Game;
use crate::cfr::info_set::InfoSetKey;
use crate::cfr::storage::InfoSetStore;

/// Recompute the belief of every information set in the store.
pub fn update_beliefs<G: Game>(
    game: &G,
    store: &mut InfoSetStore<G::Card, G::Action>,
) -> Result<(), SolverError> {
    let keys = store.all_decision_info_sets().to_vec();
    for key in &keys {
        let belief = belief_for(game, store, key)?;
        store.get_mut(key)?.belief = belief;
    }
    Ok(())
}

/// Posterior over the opponent's card at `key`, from the opponent's current
/// strategies one action earlier.
///
/// # Errors
/// - [`SolverError::NotFound`] if a prior opponent information set is missing
/// - [`SolverError::Normalization`] if no candidate card could have produced
///   the observed action
pub fn belief_for<G: Game>(
    game: &G,
    store: &InfoSetStore<G::Card, G::Action>,
    key: &InfoSetKey<G::Card, G::Action>,
) -> Result<Vec<(G::Card, f64)>, SolverError> {
    let opponents = game.opponent_cards(key.card);

    let (Some(observed), Some(prior)) = (key.last_action(), key.ancestor(1)) else {
        let uniform = 1.0 / opponents.len() as f64;
        return Ok(opponents.into_iter().map(|card| (card, uniform)).collect());
    };

    let weights = opponents
        .into_iter()
        .map(|card| Ok((card, store.strategy_for(&prior.with_card(card), observed)?)))
        .collect::<Result<Vec<_>, SolverError>>()?;

    let total: f64 = weights.iter().map(|&(_, w)| w).sum();
    if total <= 0.0 {
        return Err(SolverError::Normalization {
            stage: "belief",
            key: key.to_string(),
        });
    }

    Ok(weights
        .into_iter()
        .map(|(card, w)| (card, w / total))
        .collect())
}
