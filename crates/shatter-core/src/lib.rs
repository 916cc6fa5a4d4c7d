#![forbid(unsafe_code)]

//! Explode kernel: fixed-point math, seeded noise, and shard partitioning.
//!
//! The partition engine decomposes a source image into a fixed number of
//! pseudo-random shards, displaces each shard outward from center, and
//! provides exact forward and best-effort inverse pixel transforms. All
//! randomness is consumed at seed time; the transform hot path is pure,
//! allocation-free integer arithmetic.

pub mod fixed;
pub mod noise;
pub mod partition;
pub mod rng;

pub use partition::{DEFAULT_SEED, NUM_SHARDS, Partition, PartitionError};
