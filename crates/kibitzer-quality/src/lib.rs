//! Move-quality classification and game statistics.
//!
//! - [`classify`] maps a pawn evaluation to a [`QualityTier`] with a
//!   templated explanation and tactical/strategic tags
//! - [`phase_of`] derives the optional game-phase tag from material
//! - [`aggregate`] folds a move list into [`GameStats`]
//!
//! [`QualityTier`]: kibitzer_core::QualityTier
//! [`GameStats`]: kibitzer_core::GameStats

mod classifier;
mod phase;
mod stats;

pub use classifier::{
    classify, tier_for, DECISIVE_TACTICAL, IMPORTANT_POSITIONAL, SIGNIFICANT_TACTICAL,
};
pub use phase::{phase_from_counts, phase_of};
pub use stats::{aggregate, parse_raw_eval};
