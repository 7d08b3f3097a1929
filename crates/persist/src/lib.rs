//! Checkpointing: capture a running simulation, restore it later, resume
//! bit-identically.
//!
//! # Invariants
//! - Captured component state survives a save/restore cycle bit-exactly.
//! - Checkpoints carry a content hash; corruption fails closed on load.

pub mod checkpoint;

pub use checkpoint::{Checkpoint, CheckpointError};
