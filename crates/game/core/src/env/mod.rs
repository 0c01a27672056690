//! Deterministic environment inputs for the battle rules.
//!
//! The rules never read ambient randomness or clocks: randomness comes from
//! [`RngOracle`] seeded by [`compute_seed`], timestamps are passed in by the
//! caller.

mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed, context};
