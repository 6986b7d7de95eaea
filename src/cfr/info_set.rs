//! Information set identifiers and per-information-set solver state.

use std::fmt;

use serde::Serialize;

use crate::cfr::game::{Action, Card};

/// Identifier of an information set: the acting player's own card plus the
/// public action history. Two decision points share a key exactly when they
/// are indistinguishable to the player acting there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InfoSetKey<C, A> {
    /// Private card of the acting player.
    pub card: C,
    /// Public actions taken so far.
    pub history: Vec<A>,
}

impl<C: Card, A: Action> InfoSetKey<C, A> {
    /// Create a key from a card and a history.
    pub fn new(card: C, history: Vec<A>) -> Self {
        Self { card, history }
    }

    /// Key of the first decision of the game for `card`.
    pub fn root(card: C) -> Self {
        Self::new(card, Vec::new())
    }

    /// Index of the acting player, from the history length parity.
    pub fn player(&self) -> usize {
        self.history.len() % 2
    }

    /// The most recent public action, if any.
    pub fn last_action(&self) -> Option<A> {
        self.history.last().copied()
    }

    /// Same card, history with the last `n` actions stripped.
    ///
    /// Returns `None` if the history is shorter than `n`.
    pub fn ancestor(&self, n: usize) -> Option<Self> {
        let len = self.history.len().checked_sub(n)?;
        Some(Self::new(self.card, self.history[..len].to_vec()))
    }

    /// Same history, different card.
    pub fn with_card(&self, card: C) -> Self {
        Self::new(card, self.history.clone())
    }

    /// Same card, history extended by `action`.
    pub fn child(&self, action: A) -> Self {
        let mut history = self.history.clone();
        history.push(action);
        Self::new(self.card, history)
    }
}

impl<C: Card, A: Action> fmt::Display for InfoSetKey<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.card.symbol())?;
        for action in &self.history {
            write!(f, "{}", action.symbol())?;
        }
        Ok(())
    }
}

/// Mutable solver state held for one information set.
///
/// Per-action vectors are indexed by position in the game's action alphabet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoSetData<C> {
    /// Probability of choosing each action. Sums to 1.
    pub strategy: Vec<f64>,
    /// Running total of reach-weighted positive regret per action. Never
    /// decreases.
    pub cumulative_gain: Vec<f64>,
    /// Expected payoff to the acting player of each action this iteration.
    pub utility: Vec<f64>,
    /// Strategy-weighted average of `utility`.
    pub expected_utility: f64,
    /// Posterior over the opponent's card, one entry per card the acting
    /// player does not hold. Sums to 1.
    pub belief: Vec<(C, f64)>,
    /// Probability that the current strategies reach this information set.
    pub likelihood: f64,
}

impl<C: Card> InfoSetData<C> {
    /// Uniform strategy over `num_actions`, cumulative gain seeded with the
    /// same values so every strategy normalization has a positive total.
    pub fn new(num_actions: usize) -> Self {
        let uniform = 1.0 / num_actions as f64;
        Self {
            strategy: vec![uniform; num_actions],
            cumulative_gain: vec![uniform; num_actions],
            utility: vec![0.0; num_actions],
            expected_utility: 0.0,
            belief: Vec::new(),
            likelihood: 0.0,
        }
    }

    /// Current belief that the opponent holds `card`.
    pub fn belief_of(&self, card: C) -> Option<f64> {
        self.belief
            .iter()
            .find(|(c, _)| *c == card)
            .map(|&(_, p)| p)
    }

    /// Positive part of `utility[a] - expected_utility` for each action.
    pub fn instant_gains(&self) -> impl Iterator<Item = f64> + '_ {
        self.utility
            .iter()
            .map(move |&u| (u - self.expected_utility).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::kuhn::{KuhnAction, KuhnCard};

    #[test]
    fn test_key_display_and_navigation() {
        let key = InfoSetKey::new(KuhnCard::King, vec![KuhnAction::Pass, KuhnAction::Bet]);
        assert_eq!(key.to_string(), "Kpb");
        assert_eq!(key.player(), 0);
        assert_eq!(key.last_action(), Some(KuhnAction::Bet));

        let parent = key.ancestor(1).unwrap();
        assert_eq!(parent.to_string(), "Kp");
        assert_eq!(parent.player(), 1);
        assert_eq!(key.ancestor(2).unwrap(), InfoSetKey::root(KuhnCard::King));
        assert!(key.ancestor(3).is_none());

        assert_eq!(key.with_card(KuhnCard::Jack).to_string(), "Jpb");
        assert_eq!(parent.child(KuhnAction::Bet), key);
    }

    #[test]
    fn test_new_data_is_uniform() {
        let data: InfoSetData<KuhnCard> = InfoSetData::new(2);
        assert_eq!(data.strategy, vec![0.5, 0.5]);
        assert_eq!(data.cumulative_gain, data.strategy);
        assert!(data.belief.is_empty());
        assert_eq!(data.belief_of(KuhnCard::Queen), None);
    }

    #[test]
    fn test_instant_gains_clip_at_zero() {
        let mut data: InfoSetData<KuhnCard> = InfoSetData::new(2);
        data.utility = vec![1.5, 0.75];
        data.expected_utility = 1.125;
        let gains: Vec<f64> = data.instant_gains().collect();
        assert_eq!(gains, vec![0.375, 0.0]);
    }
}
