//! Classifier artifact handling for epitriage.
//!
//! Trained classifiers are produced and serialized elsewhere; this crate
//! consumes the exported JSON artifacts. It normalizes the three artifact
//! shapes found in the wild into a canonical [`ModelBundle`], validates the
//! weights structurally, and runs single-row inference over an
//! already-aligned feature vector.

pub mod artifact;
pub mod classifier;

pub use artifact::*;
pub use classifier::*;
