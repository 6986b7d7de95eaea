//! Iteration driver for the belief-based regret minimization solver.
//!
//! One iteration runs four passes over the information-set store, strictly
//! in this order:
//!
//! 1. **Beliefs**: posterior over the opponent's card at every information set
//! 2. **Utilities**: backward induction, longest histories first
//! 3. **Reach**: forward pass, shortest histories first
//! 4. **Regret**: accumulate reach-weighted positive regret, then regret-match
//!
//! Each pass completes over every information set before the next starts, and
//! the convergence metric is only returned once all four are done.

use std::time::Instant;

use crate::cfr::belief::update_beliefs;
use crate::cfr::config::{SolverConfig, SolverStats};
use crate::cfr::error::SolverError;
use crate::cfr::game::Game;
use crate::cfr::info_set::InfoSetKey;
use crate::cfr::reach::update_reach;
use crate::cfr::regret::{accumulate_regret, update_strategies};
use crate::cfr::storage::{InfoSetStore, Snapshot};
use crate::cfr::utility::update_utilities;

/// Lifecycle of a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPhase {
    /// The store has not been populated yet.
    Uninitialized,
    /// Iterations may run.
    Ready,
}

/// The main solver.
///
/// # Example
/// ```
/// use kuhn_cfr::cfr::{CfrSolver, SolverConfig};
/// use kuhn_cfr::games::kuhn::KuhnPoker;
///
/// let mut solver = CfrSolver::new(KuhnPoker::new(), SolverConfig::default());
/// solver.initialize();
///
/// let total_gain = solver.run_iteration().unwrap();
/// assert!((total_gain - 6.875).abs() < 1e-12);
///
/// let snapshot = solver.snapshot().unwrap();
/// assert!(snapshot.get("Kpb").is_some());
/// ```
pub struct CfrSolver<G: Game> {
    /// The game being solved.
    game: G,

    /// Configuration for the solver.
    config: SolverConfig,

    /// Per-information-set state.
    store: InfoSetStore<G::Card, G::Action>,

    /// Whether `initialize` has run.
    phase: SolverPhase,

    /// Completed iteration count.
    iteration: u64,

    /// Statistics tracking.
    stats: SolverStats,
}

impl<G: Game> CfrSolver<G> {
    /// Create a new, uninitialized solver for the given game.
    pub fn new(game: G, config: SolverConfig) -> Self {
        Self {
            game,
            config,
            store: InfoSetStore::new(),
            phase: SolverPhase::Uninitialized,
            iteration: 0,
            stats: SolverStats::new(),
        }
    }

    /// Populate the store with one uniform information set per
    /// (card, decision history) pair and enter the ready state.
    ///
    /// Calling this again leaves existing information sets untouched.
    ///
    /// # Returns
    /// The number of information sets newly created.
    pub fn initialize(&mut self) -> usize {
        let created = self.store.initialize(&self.game);
        self.phase = SolverPhase::Ready;
        self.stats.info_sets = self.store.num_info_sets();
        created
    }

    /// Run a single iteration.
    ///
    /// # Returns
    /// The convergence metric: the sum of instantaneous positive regret over
    /// every information set and action in this iteration.
    pub fn run_iteration(&mut self) -> Result<f64, SolverError> {
        self.ensure_ready()?;

        update_beliefs(&self.game, &mut self.store)?;
        update_utilities(&self.game, &mut self.store)?;
        update_reach(&self.game, &mut self.store)?;
        let total_gain = accumulate_regret(&mut self.store)?;
        update_strategies(&mut self.store)?;

        self.iteration += 1;
        self.stats.total_gain = Some(total_gain);
        log::trace!("iteration {} total gain {:.6}", self.iteration, total_gain);

        Ok(total_gain)
    }

    /// Train the solver for a specified number of iterations.
    ///
    /// The convergence metric is sampled `config.num_reports` times over the
    /// run, starting with the first iteration.
    pub fn train(&mut self, iterations: u64) -> Result<&SolverStats, SolverError> {
        let interval = (iterations / self.config.num_reports.max(1)).max(1);
        let start_time = Instant::now();
        log::info!("training {} iterations over {} info sets", iterations, self.store.num_info_sets());

        for i in 0..iterations {
            let total_gain = self.run_iteration()?;
            if i % interval == 0 {
                self.stats.record_gain(self.iteration, total_gain);
            }
        }

        self.finish_stats(start_time);
        log::info!(
            "finished {} iterations in {:.2}s (total gain {:.6})",
            self.iteration,
            self.stats.elapsed_seconds,
            self.stats.total_gain.unwrap_or_default()
        );
        Ok(&self.stats)
    }

    /// Train with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run
    /// * `callback_interval` - How often to call the callback
    /// * `callback` - Receives the iteration number and its metric
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> Result<&SolverStats, SolverError>
    where
        F: FnMut(u64, f64),
    {
        let callback_interval = callback_interval.max(1);
        let start_time = Instant::now();

        for i in 0..iterations {
            let total_gain = self.run_iteration()?;
            if (i + 1) % callback_interval == 0 {
                callback(self.iteration, total_gain);
            }
        }

        self.finish_stats(start_time);
        Ok(&self.stats)
    }

    /// Validate the configuration, initialize if needed, and run the
    /// configured number of iterations.
    pub fn solve(&mut self) -> Result<&SolverStats, SolverError> {
        self.config.validate()?;
        if self.phase == SolverPhase::Uninitialized {
            self.initialize();
        }
        self.train(self.config.iterations)
    }

    /// Overwrite the current strategy at `key`.
    ///
    /// Cumulative gains are left as they are, so the override only shapes
    /// the next iteration's beliefs and utilities.
    pub fn set_strategy(
        &mut self,
        key: &InfoSetKey<G::Card, G::Action>,
        strategy: &[f64],
    ) -> Result<(), SolverError> {
        self.ensure_ready()?;

        let invalid = |reason: String| SolverError::InvalidStrategy {
            key: key.to_string(),
            reason,
        };
        let num_actions = self.game.actions().len();
        if strategy.len() != num_actions {
            return Err(invalid(format!(
                "expected {} probabilities, got {}",
                num_actions,
                strategy.len()
            )));
        }
        if strategy.iter().any(|p| !(p.is_finite() && *p >= 0.0)) {
            return Err(invalid("probabilities must be finite and non-negative".into()));
        }
        let total: f64 = strategy.iter().sum();
        if (total - 1.0).abs() > self.config.tolerance {
            return Err(invalid(format!("probabilities sum to {}", total)));
        }

        self.store.get_mut(key)?.strategy = strategy.to_vec();
        Ok(())
    }

    /// Copy out the full store for reporting.
    pub fn snapshot(&self) -> Result<Snapshot<G::Card>, SolverError> {
        self.ensure_ready()?;
        Ok(self.store.export(self.iteration))
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the lifecycle phase.
    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    /// Get the number of information sets.
    pub fn num_info_sets(&self) -> usize {
        self.store.num_info_sets()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Get reference to the store for analysis.
    pub fn store(&self) -> &InfoSetStore<G::Card, G::Action> {
        &self.store
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Reset the solver to its uninitialized state.
    pub fn reset(&mut self) {
        self.store.clear();
        self.phase = SolverPhase::Uninitialized;
        self.iteration = 0;
        self.stats = SolverStats::new();
    }

    fn ensure_ready(&self) -> Result<(), SolverError> {
        match self.phase {
            SolverPhase::Ready => Ok(()),
            SolverPhase::Uninitialized => Err(SolverError::NotInitialized),
        }
    }

    fn finish_stats(&mut self, start_time: Instant) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.store.num_info_sets();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::kuhn::{KuhnAction, KuhnCard, KuhnPoker};

    use KuhnAction::{Bet, Pass};
    use KuhnCard::{Jack, King, Queen};

    fn solver() -> CfrSolver<KuhnPoker> {
        let mut solver = CfrSolver::new(KuhnPoker::new(), SolverConfig::default());
        solver.initialize();
        solver
    }

    #[test]
    fn test_requires_initialization() {
        let mut solver = CfrSolver::new(KuhnPoker::new(), SolverConfig::default());
        assert_eq!(solver.phase(), SolverPhase::Uninitialized);
        assert!(matches!(solver.run_iteration(), Err(SolverError::NotInitialized)));
        assert!(matches!(solver.snapshot(), Err(SolverError::NotInitialized)));

        assert_eq!(solver.initialize(), 12);
        assert_eq!(solver.phase(), SolverPhase::Ready);
        assert_eq!(solver.initialize(), 0);
        assert!(solver.run_iteration().is_ok());
    }

    #[test]
    fn test_first_iteration_fixture() {
        let mut solver = solver();
        let total_gain = solver.run_iteration().unwrap();
        assert!((total_gain - 55.0 / 8.0).abs() < 1e-12);

        let snapshot = solver.snapshot().unwrap();
        let expected = [
            ("K", 9.0 / 8.0),
            ("Q", 1.0 / 8.0),
            ("J", -7.0 / 8.0),
            ("Kb", 0.5),
            ("Qb", -0.5),
            ("Jb", -1.5),
            ("Kp", 1.25),
            ("Qp", 0.25),
            ("Jp", -0.75),
            ("Kpb", 0.5),
            ("Qpb", -0.5),
            ("Jpb", -1.5),
        ];
        for (key, value) in expected {
            let data = snapshot.get(key).unwrap();
            assert!(
                (data.expected_utility - value).abs() < 1e-12,
                "{}: {} != {}",
                key,
                data.expected_utility,
                value
            );
            let likelihood = if key.len() == 1 { 1.0 / 3.0 } else { 1.0 / 6.0 };
            assert!((data.likelihood - likelihood).abs() < 1e-12);
        }

        // K: gain 3/8 on bet weighted by 1/3 on top of the 1/2 seed
        let king = snapshot.get("K").unwrap();
        assert!((king.strategy[0] - 5.0 / 9.0).abs() < 1e-12);
        let king_calls = snapshot.get("Kb").unwrap();
        assert!((king_calls.strategy[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_distributions_stay_normalized() {
        let mut solver = solver();
        for _ in 0..500 {
            let total_gain = solver.run_iteration().unwrap();
            assert!(total_gain >= 0.0);

            for (_, data) in solver.store().iter() {
                let strategy: f64 = data.strategy.iter().sum();
                let belief: f64 = data.belief.iter().map(|&(_, p)| p).sum();
                assert!((strategy - 1.0).abs() < 1e-9);
                assert!((belief - 1.0).abs() < 1e-9);
                assert!(data.strategy.iter().all(|&p| p > 0.0));
                assert!((0.0..=1.0).contains(&data.likelihood));
            }
        }
    }

    #[test]
    fn test_cumulative_gain_never_decreases() {
        let mut solver = solver();
        let mut previous = solver.snapshot().unwrap();
        for _ in 0..100 {
            solver.run_iteration().unwrap();
            let current = solver.snapshot().unwrap();
            for (before, after) in previous.info_sets.iter().zip(&current.info_sets) {
                for (b, a) in before.data.cumulative_gain.iter().zip(&after.data.cumulative_gain) {
                    assert!(a >= b);
                }
            }
            previous = current;
        }
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut solver = solver();
        solver.train(10).unwrap();
        let first = solver.snapshot().unwrap();
        let second = solver.snapshot().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iteration, 10);
    }

    #[test]
    fn test_train_records_gain_history() {
        let config = SolverConfig::new().with_num_reports(10);
        let mut solver = CfrSolver::new(KuhnPoker::new(), config);
        solver.initialize();
        let stats = solver.train(100).unwrap();

        assert_eq!(stats.iterations, 100);
        assert_eq!(stats.info_sets, 12);
        assert_eq!(stats.gain_history.len(), 10);
        assert_eq!(stats.gain_history[0].iteration, 1);
        assert!((stats.gain_history[0].total_gain - 6.875).abs() < 1e-12);
        assert_eq!(stats.gain_history[1].iteration, 11);
    }

    #[test]
    fn test_train_with_callback() {
        let mut solver = solver();
        let mut seen = Vec::new();
        solver
            .train_with_callback(20, 5, |iteration, gain| seen.push((iteration, gain)))
            .unwrap();
        let iterations: Vec<u64> = seen.iter().map(|&(i, _)| i).collect();
        assert_eq!(iterations, vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_solve_validates_config() {
        let config = SolverConfig::new().with_iterations(0);
        let mut solver = CfrSolver::new(KuhnPoker::new(), config);
        assert!(matches!(solver.solve(), Err(SolverError::Config(_))));

        let config = SolverConfig::new().with_iterations(25);
        let mut solver = CfrSolver::new(KuhnPoker::new(), config);
        assert_eq!(solver.solve().unwrap().iterations, 25);
    }

    #[test]
    fn test_set_strategy() {
        let mut solver = solver();
        let key = InfoSetKey::root(Queen);
        solver.set_strategy(&key, &[0.0, 1.0]).unwrap();
        assert_eq!(solver.store().get(&key).unwrap().strategy, vec![0.0, 1.0]);

        assert!(matches!(
            solver.set_strategy(&key, &[0.5]),
            Err(SolverError::InvalidStrategy { .. })
        ));
        assert!(matches!(
            solver.set_strategy(&key, &[0.7, 0.7]),
            Err(SolverError::InvalidStrategy { .. })
        ));
        assert!(matches!(
            solver.set_strategy(&key, &[1.5, -0.5]),
            Err(SolverError::InvalidStrategy { .. })
        ));

        let missing = InfoSetKey::new(Jack, vec![Bet, Pass]);
        assert!(matches!(
            solver.set_strategy(&missing, &[0.5, 0.5]),
            Err(SolverError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_strategy_shapes_next_iteration() {
        let mut solver = solver();
        for card in [King, Queen, Jack] {
            solver
                .set_strategy(&InfoSetKey::new(card, vec![Bet]), &[1.0, 0.0])
                .unwrap();
        }
        solver.run_iteration().unwrap();

        let snapshot = solver.snapshot().unwrap();
        let jack = snapshot.get("J").unwrap();
        assert!((jack.utility[0] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut solver = solver();
        solver.train(5).unwrap();
        solver.reset();
        assert_eq!(solver.phase(), SolverPhase::Uninitialized);
        assert_eq!(solver.iteration(), 0);
        assert_eq!(solver.num_info_sets(), 0);
    }
}
