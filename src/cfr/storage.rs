//! Storage for per-information-set solver state.
//!
//! The store is the single owner of every [`InfoSetData`]. The passes of an
//! iteration read and write through it by key; nothing else keeps copies.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::cfr::error::SolverError;
use crate::cfr::game::{Action, Card, Game};
use crate::cfr::info_set::{InfoSetData, InfoSetKey};

/// Owner of all information-set state.
///
/// Besides the map itself the store keeps a precomputed evaluation order:
/// every key sorted by non-decreasing history length. Forward passes walk it
/// front to back, backward induction walks it back to front, so every
/// dependency of a key is always visited before the key itself.
#[derive(Debug, Clone)]
pub struct InfoSetStore<C, A> {
    /// info_key -> solver state
    info_sets: FxHashMap<InfoSetKey<C, A>, InfoSetData<C>>,

    /// All keys, sorted by history length
    order: Vec<InfoSetKey<C, A>>,
}

impl<C: Card, A: Action> Default for InfoSetStore<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Card, A: Action> InfoSetStore<C, A> {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self {
            info_sets: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Create storage with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            info_sets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Create one information set per (card, decision history) pair.
    ///
    /// Keys that already exist keep their state untouched.
    ///
    /// # Returns
    /// The number of information sets newly created.
    pub fn initialize<G>(&mut self, game: &G) -> usize
    where
        G: Game<Card = C, Action = A>,
    {
        let mut histories = game.decision_histories();
        histories.sort_by_key(Vec::len);

        let num_actions = game.actions().len();
        let mut created = 0;
        for history in histories {
            for &card in game.deck() {
                let key = InfoSetKey::new(card, history.clone());
                if self.info_sets.contains_key(&key) {
                    continue;
                }
                log::debug!("Initializing: {}", key);
                self.info_sets.insert(key.clone(), InfoSetData::new(num_actions));
                self.order.push(key);
                created += 1;
            }
        }

        // Stable: keeps deck order within each history length.
        self.order.sort_by_key(|key| key.history.len());
        created
    }

    /// Every stored key, in non-decreasing history length.
    pub fn all_decision_info_sets(&self) -> &[InfoSetKey<C, A>] {
        &self.order
    }

    /// Get the state of an information set.
    ///
    /// # Errors
    /// [`SolverError::NotFound`] if `key` was never initialized.
    pub fn get(&self, key: &InfoSetKey<C, A>) -> Result<&InfoSetData<C>, SolverError> {
        self.info_sets.get(key).ok_or_else(|| SolverError::NotFound {
            key: key.to_string(),
        })
    }

    /// Get mutable access to the state of an information set.
    ///
    /// # Errors
    /// [`SolverError::NotFound`] if `key` was never initialized.
    pub fn get_mut(&mut self, key: &InfoSetKey<C, A>) -> Result<&mut InfoSetData<C>, SolverError> {
        self.info_sets.get_mut(key).ok_or_else(|| SolverError::NotFound {
            key: key.to_string(),
        })
    }

    /// Probability that the player at `key` chooses `action`.
    pub fn strategy_for(&self, key: &InfoSetKey<C, A>, action: A) -> Result<f64, SolverError> {
        Ok(self.get(key)?.strategy[action.index()])
    }

    /// Iterate over all information sets in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&InfoSetKey<C, A>, &InfoSetData<C>)> {
        self.order
            .iter()
            .filter_map(move |key| self.info_sets.get(key).map(|data| (key, data)))
    }

    /// Get the number of information sets stored.
    pub fn num_info_sets(&self) -> usize {
        self.info_sets.len()
    }

    /// Whether the store holds no information sets.
    pub fn is_empty(&self) -> bool {
        self.info_sets.is_empty()
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, key: &InfoSetKey<C, A>) -> bool {
        self.info_sets.contains_key(key)
    }

    /// Clear all stored data.
    pub fn clear(&mut self) {
        self.info_sets.clear();
        self.order.clear();
    }

    /// Copy out every information set for reporting.
    pub fn export(&self, iteration: u64) -> Snapshot<C> {
        let info_sets = self
            .iter()
            .map(|(key, data)| SnapshotEntry {
                key: key.to_string(),
                player: key.player(),
                data: data.clone(),
            })
            .collect();
        Snapshot {
            iteration,
            info_sets,
        }
    }
}

/// Read-only copy of the store taken between iterations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<C> {
    /// Number of completed iterations when the snapshot was taken.
    pub iteration: u64,
    /// Every information set, in evaluation order.
    pub info_sets: Vec<SnapshotEntry<C>>,
}

/// One information set inside a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry<C> {
    /// Display form of the key, e.g. `Kpb`.
    pub key: String,
    /// Acting player.
    pub player: usize,
    /// Solver state at snapshot time.
    #[serde(flatten)]
    pub data: InfoSetData<C>,
}

impl<C: Card> Snapshot<C> {
    /// Look up an information set by its display key.
    pub fn get(&self, key: &str) -> Option<&InfoSetData<C>> {
        self.info_sets
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.data)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
