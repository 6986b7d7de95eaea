//! Belief-based Counterfactual Regret Minimization.
//!
//! This module computes an approximate Nash equilibrium for small two-player
//! zero-sum games with one private card per player. Every information set is
//! held in an [`InfoSetStore`] and updated in place once per iteration.
//!
//! # Overview
//!
//! Each iteration:
//! 1. Infers each player's belief about the opponent's card from the
//!    opponent's strategies ([`belief`])
//! 2. Scores every action by backward induction ([`utility`])
//! 3. Computes how likely current strategies reach each information set
//!    ([`reach`])
//! 4. Accumulates reach-weighted positive regret and regret-matches the next
//!    strategy ([`regret`])
//!
//! # Example
//!
//! ```
//! use kuhn_cfr::cfr::{CfrSolver, SolverConfig};
//! use kuhn_cfr::games::kuhn::KuhnPoker;
//!
//! let config = SolverConfig::default().with_iterations(1_000);
//! let mut solver = CfrSolver::new(KuhnPoker::new(), config);
//! let stats = solver.solve().unwrap();
//! println!("{} info sets, total gain {:?}", stats.info_sets, stats.total_gain);
//! ```
//!
//! # Theory
//!
//! **Gain**: the shortfall of the current strategy against a single action.
//! ```text
//! Gain(a) = max(0, Utility(a) - ExpectedUtility)
//! ```
//!
//! **Regret Matching**: strategy proportional to cumulative reach-weighted gain.
//! ```text
//! Strategy(a) = CumulativeGain(a) / sum(CumulativeGain(a'))
//! ```
//!
//! The summed gain of an iteration trends toward zero as strategies approach
//! equilibrium.

pub mod belief;
pub mod config;
pub mod error;
pub mod game;
pub mod info_set;
pub mod reach;
pub mod regret;
pub mod solver;
pub mod storage;
pub mod utility;

// Re-export main types for convenient access
pub use config::{ConfigError, GainPoint, SolverConfig, SolverStats};
pub use error::SolverError;
pub use game::{Action, Card, Game};
pub use info_set::{InfoSetData, InfoSetKey};
pub use solver::{CfrSolver, SolverPhase};
pub use storage::{InfoSetStore, Snapshot, SnapshotEntry};
