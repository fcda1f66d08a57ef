#![deny(missing_docs)]
#![doc = "Kullback-Leibler divergence between Gaussian shock distributions and the \
ambiguity-set budget built on it."]

/// Ambiguity sets bounded by a divergence budget.
pub mod ambiguity;
/// Closed-form Gaussian divergence.
pub mod divergence;
pub mod linalg;

pub use ambiguity::AmbiguitySet;
pub use divergence::{divergence, NEGATIVE_TOLERANCE};
