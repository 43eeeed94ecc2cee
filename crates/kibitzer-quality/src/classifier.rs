//! Evaluation to move-quality classification.
//!
//! Evaluations are signed pawn units from white's point of view. Mate
//! scores arrive already saturated to ±100, so the bands below cover every
//! input the engine client produces.

use kibitzer_core::{GamePhase, MoveQuality, QualityTier, MATE_SCORE};

pub const DECISIVE_TACTICAL: &str = "decisive tactical advantage";
pub const SIGNIFICANT_TACTICAL: &str = "significant tactical advantage";
pub const IMPORTANT_POSITIONAL: &str = "important positional advantage";

/// Classifies an evaluation. `phase` only adds a strategic tag.
pub fn classify(evaluation: f64, phase: Option<GamePhase>) -> MoveQuality {
    let evaluation = sanitize(evaluation);
    let magnitude = evaluation.abs();

    let mut tactical_tags = Vec::new();
    if magnitude > 3.0 {
        tactical_tags.push(DECISIVE_TACTICAL.to_string());
    } else if magnitude > 2.0 {
        tactical_tags.push(SIGNIFICANT_TACTICAL.to_string());
    }

    let mut strategic_tags = Vec::new();
    if magnitude > 1.5 {
        strategic_tags.push(IMPORTANT_POSITIONAL.to_string());
    }

    let tier = tier_for(evaluation);
    let mut explanation = describe(
        tier,
        evaluation,
        !tactical_tags.is_empty(),
        !strategic_tags.is_empty(),
    );

    if let Some(phase) = phase {
        strategic_tags.push(phase.tag().to_string());
    }

    if !tactical_tags.is_empty() {
        explanation.push_str("\n\nTactical elements: ");
        explanation.push_str(&tactical_tags.join(", "));
    }
    if !strategic_tags.is_empty() {
        explanation.push_str("\n\nStrategic elements: ");
        explanation.push_str(&strategic_tags.join(", "));
    }

    MoveQuality {
        tier,
        explanation,
        evaluation,
        tactical_tags,
        strategic_tags,
    }
}

/// NaN reads as balanced; infinities saturate like mate scores.
fn sanitize(evaluation: f64) -> f64 {
    if evaluation.is_nan() {
        0.0
    } else {
        evaluation.clamp(-MATE_SCORE, MATE_SCORE)
    }
}

pub fn tier_for(evaluation: f64) -> QualityTier {
    let magnitude = evaluation.abs();
    let white_tier = if evaluation == 0.0 {
        return QualityTier::Balanced;
    } else if magnitude > 3.0 {
        QualityTier::Brilliant
    } else if magnitude > 2.0 {
        QualityTier::Excellent
    } else if magnitude > 1.0 {
        QualityTier::Good
    } else if magnitude > 0.5 {
        QualityTier::Correct
    } else {
        QualityTier::Theoretical
    };

    if evaluation > 0.0 {
        white_tier
    } else {
        white_tier.mirror()
    }
}

fn describe(tier: QualityTier, evaluation: f64, tactical: bool, strategic: bool) -> String {
    let mut text = String::new();
    match tier {
        QualityTier::Brilliant => {
            text.push_str("This move gives white a decisive advantage. ");
            if tactical {
                text.push_str("White has a crushing tactical edge. ");
            }
            if strategic {
                text.push_str("The position is strategically dominant. ");
            }
            text.push_str("Black is in a very difficult position.");
        }
        QualityTier::Excellent => {
            text.push_str("This move gives white a significant advantage. ");
            if tactical {
                text.push_str("White has a clear tactical edge. ");
            }
            if strategic {
                text.push_str("The position is strategically favourable. ");
            }
            text.push_str("Black must play precisely to hold the balance.");
        }
        QualityTier::Good => {
            text.push_str("This move gives white a moderate advantage. ");
            if tactical {
                text.push_str("White has a small tactical edge. ");
            }
            if strategic {
                text.push_str("The position is slightly favourable. ");
            }
            text.push_str("Black can still defend with accurate play.");
        }
        QualityTier::Correct => {
            text.push_str("This move gives white a small advantage. ");
            text.push_str(
                "The position is slightly favourable, but black can easily keep the balance.",
            );
        }
        QualityTier::Theoretical if evaluation > 0.2 => {
            text.push_str("This move keeps a slight edge for white. ");
            text.push_str("The position is balanced with a little white initiative.");
        }
        QualityTier::Theoretical if evaluation < -0.2 => {
            text.push_str("This move keeps a slight disadvantage for white. ");
            text.push_str("The position is balanced with a little black initiative.");
        }
        QualityTier::Theoretical | QualityTier::Balanced => {
            text.push_str("This move keeps the position in perfect balance. ");
            text.push_str("Neither side has a significant advantage.");
        }
        QualityTier::Passable => {
            text.push_str("This move gives black a small advantage. ");
            text.push_str(
                "The position is slightly unfavourable, but white can easily keep the balance.",
            );
        }
        QualityTier::Dubious => {
            text.push_str("This move gives black a moderate advantage. ");
            if tactical {
                text.push_str("White's position is tactically difficult. ");
            }
            if strategic {
                text.push_str("The position is strategically disadvantageous. ");
            }
            text.push_str("White can still defend with accurate play.");
        }
        QualityTier::Mediocre => {
            text.push_str("This move gives black a significant advantage. ");
            if tactical {
                text.push_str("White's position is tactically weak. ");
            }
            if strategic {
                text.push_str("The position is strategically unfavourable. ");
            }
            text.push_str("White must play precisely to hold the balance.");
        }
        QualityTier::Weak => {
            text.push_str("This move gives black a decisive advantage. ");
            if tactical {
                text.push_str("White is tactically lost. ");
            }
            if strategic {
                text.push_str("The position is strategically lost. ");
            }
            text.push_str("White is in a very difficult position.");
        }
    }
    text
}
