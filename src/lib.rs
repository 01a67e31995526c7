//! Draws rounds of a two-team debating tournament: pairs teams (or awards
//! byes), allocates judging panels, and flags anything wrong with the result.
//!
//! The draw is a pure function of the state of the tournament just before the
//! round. Callers load that state, call
//! [`generate_tournament_pairings`], and persist the rooms it returns.

pub mod config;
pub mod test;
pub mod tournaments;

pub use tournaments::rounds::draws::manage::{
    drawalgs::{MakeDrawError, generate_tournament_pairings},
    validate::validate_pairing,
};
