//! Shared fixtures for sphere-cluster tests and benchmarks.
//!
//! Every dataset here is deterministic: fixed coordinates, or a seeded
//! ChaCha8 generator. Each geometric fixture comes with the trained sphere
//! that separates it, so tests exercise the clustering core without an
//! SVDD solver.

pub mod fixtures;

pub use fixtures::*;
