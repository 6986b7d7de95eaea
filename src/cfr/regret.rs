//! Regret accumulation and regret matching.

use crate::cfr::error::SolverError;
use crate::cfr::game::{Action, Card};
use crate::cfr::storage::InfoSetStore;

/// Add each action's reach-weighted positive regret to its cumulative gain.
///
/// # Returns
/// The sum of all unweighted instantaneous gains across every information
/// set and action: the per-iteration convergence metric.
pub fn accumulate_regret<C: Card, A: Action>(
    store: &mut InfoSetStore<C, A>,
) -> Result<f64, SolverError> {
    let keys = store.all_decision_info_sets().to_vec();
    let mut total_gain = 0.0;

    for key in &keys {
        let data = store.get_mut(key)?;
        let gains: Vec<f64> = data.instant_gains().collect();
        let likelihood = data.likelihood;

        for (cumulative, gain) in data.cumulative_gain.iter_mut().zip(gains) {
            *cumulative += gain * likelihood;
            total_gain += gain;
        }
    }

    Ok(total_gain)
}

/// Set every strategy proportional to its cumulative gains.
pub fn update_strategies<C: Card, A: Action>(
    store: &mut InfoSetStore<C, A>,
) -> Result<(), SolverError> {
    let keys = store.all_decision_info_sets().to_vec();
    for key in &keys {
        let data = store.get_mut(key)?;
        data.strategy = regret_match(&data.cumulative_gain).ok_or_else(|| {
            SolverError::Normalization {
                stage: "strategy",
                key: key.to_string(),
            }
        })?;
    }
    Ok(())
}

/// Normalize non-negative cumulative gains into a strategy.
///
/// Returns `None` when the gains sum to zero.
#[must_use]
pub fn regret_match(gains: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = gains.iter().sum();
    if total > 0.0 {
        Some(gains.iter().map(|&g| g / total).collect())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::info_set::InfoSetKey;
    use crate::games::kuhn::{KuhnAction, KuhnCard, KuhnPoker};

    use KuhnCard::{King, Queen};

    fn setup() -> InfoSetStore<KuhnCard, KuhnAction> {
        let mut store = InfoSetStore::new();
        store.initialize(&KuhnPoker::new());
        store
    }

    #[test]
    fn test_regret_match_normalizes() {
        let strategy = regret_match(&[1.0, 3.0]).unwrap();
        assert_eq!(strategy, vec![0.25, 0.75]);
        assert!(regret_match(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn test_accumulate_weights_by_likelihood() {
        let mut store = setup();
        let key = InfoSetKey::root(King);
        {
            let data = store.get_mut(&key).unwrap();
            data.utility = vec![1.5, 0.75];
            data.expected_utility = 1.125;
            data.likelihood = 0.5;
        }

        let total = accumulate_regret(&mut store).unwrap();
        assert!((total - 0.375).abs() < 1e-12);

        let data = store.get(&key).unwrap();
        assert!((data.cumulative_gain[0] - (0.5 + 0.375 * 0.5)).abs() < 1e-12);
        assert_eq!(data.cumulative_gain[1], 0.5);

        // Untouched sets have zero utility everywhere, hence no gain
        let other = store.get(&InfoSetKey::root(Queen)).unwrap();
        assert_eq!(other.cumulative_gain, vec![0.5, 0.5]);
    }

    #[test]
    fn test_update_strategies_from_gains() {
        let mut store = setup();
        let key = InfoSetKey::root(King);
        store.get_mut(&key).unwrap().cumulative_gain = vec![0.625, 0.5];
        update_strategies(&mut store).unwrap();

        let strategy = &store.get(&key).unwrap().strategy;
        assert!((strategy[0] - 5.0 / 9.0).abs() < 1e-12);
        assert!((strategy[1] - 4.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_gains_fail_normalization() {
        let mut store = setup();
        store.get_mut(&InfoSetKey::root(Queen)).unwrap().cumulative_gain = vec![0.0, 0.0];
        assert!(matches!(
            update_strategies(&mut store),
            Err(SolverError::Normalization { stage: "strategy", .. })
        ));
    }
}
