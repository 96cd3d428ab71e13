//! Trained enclosing sphere: model types, the fixed part and membership.
//!
//! # Components
//!
//! - [`SphereModel`] / [`TrainedSphere`]: consumed output of an SVDD trainer
//! - [`SphereTrainer`]: the seam an external solver implements
//! - [`FixedPart`]: the query-independent term, computed once per run
//! - [`SphereMembership`]: decides whether a feature vector lies inside

mod membership;
mod model;

pub use membership::{accept, SphereMembership};
pub use model::{FixedPart, PrecomputedSphere, SphereModel, SphereTrainer, TrainedSphere};
