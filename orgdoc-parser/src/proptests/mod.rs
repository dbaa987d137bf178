//! Property-based tests for the block parser
//!
//! These check invariants that must hold for any input rather than for specific
//! fixtures: the parser never panics, tables always have consistent column counts,
//! and region content survives the escape and indentation round trip.

mod generators;
mod invariants;
