use std::fmt;

use serde::{Deserialize, Serialize};

use super::Color;

/// Move-quality tiers, ordered from most white-favourable to most
/// black-favourable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Brilliant,
    Excellent,
    Good,
    Correct,
    Theoretical,
    Balanced,
    Passable,
    Dubious,
    Mediocre,
    Weak,
}

impl QualityTier {
    /// The tier the same magnitude earns for the other side.
    pub fn mirror(self) -> Self {
        match self {
            QualityTier::Brilliant => QualityTier::Weak,
            QualityTier::Excellent => QualityTier::Mediocre,
            QualityTier::Good => QualityTier::Dubious,
            QualityTier::Correct => QualityTier::Passable,
            QualityTier::Theoretical => QualityTier::Theoretical,
            QualityTier::Balanced => QualityTier::Balanced,
            QualityTier::Passable => QualityTier::Correct,
            QualityTier::Dubious => QualityTier::Good,
            QualityTier::Mediocre => QualityTier::Excellent,
            QualityTier::Weak => QualityTier::Brilliant,
        }
    }

    /// Reads the tier from the point of view of the side that moved.
    pub fn for_mover(self, mover: Color) -> Self {
        match mover {
            Color::White => self,
            Color::Black => self.mirror(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Brilliant => "Brilliant move",
            QualityTier::Excellent => "Excellent move",
            QualityTier::Good => "Good move",
            QualityTier::Correct => "Correct move",
            QualityTier::Theoretical => "Theoretical move",
            QualityTier::Balanced => "Balanced",
            QualityTier::Passable => "Passable move",
            QualityTier::Dubious => "Dubious move",
            QualityTier::Mediocre => "Mediocre move",
            QualityTier::Weak => "Weak move",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse game phase derived from the material left on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Middlegame,
    AdvancedMiddlegame,
    Endgame,
}

impl GamePhase {
    pub fn tag(self) -> &'static str {
        match self {
            GamePhase::Middlegame => "middlegame",
            GamePhase::AdvancedMiddlegame => "advanced middlegame",
            GamePhase::Endgame => "endgame",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveQuality {
    pub tier: QualityTier,
    pub explanation: String,
    pub evaluation: f64,
    pub tactical_tags: Vec<String>,
    pub strategic_tags: Vec<String>,
}
