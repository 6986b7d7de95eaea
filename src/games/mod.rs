//! Game definitions for the solver.
//!
//! Each game is static data: a deck, an action alphabet, the decision and
//! terminal histories, and a payoff table. Games with a known equilibrium
//! double as validation for the solver.
//!
//! ## Available Games
//!
//! - [`kuhn`]: Kuhn Poker - a 3-card poker game with known Nash equilibrium

pub mod kuhn;
