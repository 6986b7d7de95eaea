//! # Kuhn CFR
//!
//! An iterative regret-minimization solver for Kuhn poker that reasons
//! explicitly about beliefs over the opponent's hidden card.
//!
//! ## Quick Start
//!
//! ```
//! use kuhn_cfr::cfr::{CfrSolver, SolverConfig};
//! use kuhn_cfr::games::kuhn::KuhnPoker;
//!
//! let mut solver = CfrSolver::new(KuhnPoker::new(), SolverConfig::default());
//! solver.initialize();
//!
//! for _ in 0..100 {
//!     let total_gain = solver.run_iteration().unwrap();
//!     assert!(total_gain >= 0.0);
//! }
//!
//! let snapshot = solver.snapshot().unwrap();
//! let king = snapshot.get("K").unwrap();
//! println!("K bets {:.3}", king.strategy[0]);
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Information-set store, the four per-iteration passes, and the
//!   solver driving them
//! - [`games`]: Game definitions (Kuhn Poker)
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          CfrSolver                            │
//! │   beliefs → utilities → reach → regret, once per iteration    │
//! └───────────────────────────────────────────────────────────────┘
//!                │ reads/writes                │ reads
//!                ▼                             ▼
//!        ┌───────────────┐             ┌───────────────┐
//!        │ InfoSetStore  │             │  Game (Kuhn)  │
//!        └───────────────┘             └───────────────┘
//! ```

#![warn(missing_docs)]

/// Regret minimization solver module.
///
/// This is the core module containing the store, the passes, and the solver.
pub mod cfr;

/// Game definitions module.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{CfrSolver, Game, InfoSetKey, SolverConfig, SolverError, SolverStats};
