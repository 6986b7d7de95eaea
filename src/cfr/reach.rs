//! Reach likelihood of each information set under the current strategies.
//!
//! This is a forward pass: it must visit keys in non-decreasing history
//! length so that every earlier information set it reads already holds this
//! iteration's value. The store's evaluation order guarantees that.

use crate::cfr::error::SolverError;
use crate::cfr::game::Game;
use crate::cfr::info_set::InfoSetKey;
use crate::cfr::storage::InfoSetStore;

/// Recompute `likelihood` for every information set in the store.
pub fn update_reach<G: Game>(
    game: &G,
    store: &mut InfoSetStore<G::Card, G::Action>,
) -> Result<(), SolverError> {
    let keys = store.all_decision_info_sets().to_vec();
    for key in &keys {
        let likelihood = reach_for(game, store, key)?;
        store.get_mut(key)?.likelihood = likelihood;
    }
    Ok(())
}

/// Likelihood of reaching `key`, given the already-updated likelihoods of
/// shorter histories.
///
/// - root: `1 / deck size`
/// - one action: mean over opponent cards of the opponent's root likelihood
///   times the opponent's probability of the observed action
/// - longer: mean over opponent cards of the likelihood of the own
///   information set two actions earlier times the opponent's probability of
///   the observed action
pub fn reach_for<G: Game>(
    game: &G,
    store: &InfoSetStore<G::Card, G::Action>,
    key: &InfoSetKey<G::Card, G::Action>,
) -> Result<f64, SolverError> {
    let (Some(observed), Some(prior)) = (key.last_action(), key.ancestor(1)) else {
        return Ok(1.0 / game.deck().len() as f64);
    };

    let earlier = key.ancestor(2);
    let opponents = game.opponent_cards(key.card);

    let mut total = 0.0;
    for &card in &opponents {
        let opponent_key = prior.with_card(card);
        let before = match &earlier {
            Some(own) => store.get(own)?.likelihood,
            None => store.get(&opponent_key)?.likelihood,
        };
        total += before * store.strategy_for(&opponent_key, observed)?;
    }
    Ok(total / opponents.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::kuhn::{KuhnAction, KuhnCard, KuhnPoker};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use KuhnAction::{Bet, Pass};
    use KuhnCard::{Jack, King, Queen};

    fn setup() -> (KuhnPoker, InfoSetStore<KuhnCard, KuhnAction>) {
        let game = KuhnPoker::new();
        let mut store = InfoSetStore::new();
        store.initialize(&game);
        (game, store)
    }

    fn likelihood(store: &InfoSetStore<KuhnCard, KuhnAction>, card: KuhnCard, history: &[KuhnAction]) -> f64 {
        store
            .get(&InfoSetKey::new(card, history.to_vec()))
            .unwrap()
            .likelihood
    }

    #[test]
    fn test_uniform_reach() {
        let (game, mut store) = setup();
        update_reach(&game, &mut store).unwrap();

        for card in [King, Queen, Jack] {
            assert!((likelihood(&store, card, &[]) - 1.0 / 3.0).abs() < 1e-12);
            assert!((likelihood(&store, card, &[Bet]) - 1.0 / 6.0).abs() < 1e-12);
            assert!((likelihood(&store, card, &[Pass]) - 1.0 / 6.0).abs() < 1e-12);
            assert!((likelihood(&store, card, &[Pass, Bet]) - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_reach_chains_through_two_actions_prior() {
        let (game, mut store) = setup();
        store.get_mut(&InfoSetKey::new(Queen, vec![Pass])).unwrap().strategy = vec![1.0, 0.0];
        store.get_mut(&InfoSetKey::new(Jack, vec![Pass])).unwrap().strategy = vec![0.5, 0.5];
        update_reach(&game, &mut store).unwrap();

        // (1/3 * 1.0 + 1/3 * 0.5) / 2
        assert!((likelihood(&store, King, &[Pass, Bet]) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_random_strategies_partition_by_length() {
        let (game, mut store) = setup();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            for key in store.all_decision_info_sets().to_vec() {
                let p: f64 = rng.gen_range(0.0..=1.0);
                store.get_mut(&key).unwrap().strategy = vec![p, 1.0 - p];
            }
            update_reach(&game, &mut store).unwrap();

            let mut by_length = [0.0; 3];
            for (key, data) in store.iter() {
                assert!((0.0..=1.0).contains(&data.likelihood));
                by_length[key.history.len()] += data.likelihood;
            }
            assert!((by_length[0] - 1.0).abs() < 1e-9);
            assert!((by_length[1] - 1.0).abs() < 1e-9);
            assert!(by_length[2] <= 1.0 + 1e-9);
        }
    }
}
