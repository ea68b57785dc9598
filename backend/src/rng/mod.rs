//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, seedable sampling.
//! All KPI jitter in the engine goes through this module so a seed fully
//! determines the outcome of a run.

mod xorshift;

pub use xorshift::RngManager;
