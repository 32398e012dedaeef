//! Role assignment for Barricade.
//!
//! Each seated player submits a [`PreferenceRanking`] — their personal
//! most-to-least ordering of the eight roles. [`assign`] turns those
//! rankings into one role per player while minimizing the summed
//! dissatisfaction (rank position of the role each player received).
//!
//! The optimizer is an exhaustive search over all `8! = 40320` role
//! permutations. That is deliberate: the role pool is fixed and small,
//! the search is exact, and the whole thing stays a pure function. It
//! must **not** be scaled to a larger pool — at that point it should be
//! replaced by a polynomial-time bipartite matching (Hungarian).
//!
//! # Key types
//!
//! - [`PreferenceRanking`] — one player's ordering of the roles
//! - [`CostMatrix`] — player × role grid of preference ranks
//! - [`RoleAssignment`] — the resulting player → role map
//! - [`AssignError`] — the single failure mode (too many players)

mod engine;
mod error;
mod matrix;

pub use engine::{assign, RoleAssignment};
pub use error::AssignError;
pub use matrix::{CostMatrix, PreferenceRanking};
