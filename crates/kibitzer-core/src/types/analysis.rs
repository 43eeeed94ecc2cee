use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pawn value reported for any forced mate, signed by the winning side.
pub const MATE_SCORE: f64 = 100.0;

pub const DEFAULT_DEPTH: u8 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub id: Uuid,
    pub fen: String,
    pub depth: u8,
}

impl EvaluationRequest {
    pub fn new(fen: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            fen: fen.into(),
            depth: DEFAULT_DEPTH,
        }
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    Centipawns,
    Mate,
}

/// An engine score. `normalized` is in pawns; mate scores saturate to
/// [`MATE_SCORE`] and must not be combined arithmetically with centipawn
/// values without checking `score_type`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineEvaluation {
    pub score_type: ScoreType,
    pub raw_value: i32,
    pub normalized: f64,
}

impl EngineEvaluation {
    pub fn centipawns(cp: i32) -> Self {
        Self {
            score_type: ScoreType::Centipawns,
            raw_value: cp,
            normalized: f64::from(cp) / 100.0,
        }
    }

    pub fn mate(moves: i32) -> Self {
        let normalized = if moves > 0 { MATE_SCORE } else { -MATE_SCORE };
        Self {
            score_type: ScoreType::Mate,
            raw_value: moves,
            normalized,
        }
    }

    pub fn neutral() -> Self {
        Self::centipawns(0)
    }

    pub fn is_mate(&self) -> bool {
        self.score_type == ScoreType::Mate
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Complete,
    /// No `bestmove` arrived in time; the evaluation is the last one seen.
    TimedOut,
    /// The engine could not be reached; the evaluation is neutral.
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineAnalysis {
    pub id: Uuid,
    pub fen: String,
    pub best_move: Option<String>,
    pub evaluation: EngineEvaluation,
    pub depth_reached: u8,
    pub principal_variation: Vec<String>,
    pub status: AnalysisStatus,
    pub completed_at: DateTime<Utc>,
}

impl EngineAnalysis {
    pub fn neutral(request: &EvaluationRequest) -> Self {
        Self {
            id: request.id,
            fen: request.fen.clone(),
            best_move: None,
            evaluation: EngineEvaluation::neutral(),
            depth_reached: 0,
            principal_variation: Vec::new(),
            status: AnalysisStatus::Unavailable,
            completed_at: Utc::now(),
        }
    }

    /// Evaluation in pawns, as consumed by the classifier.
    pub fn pawns(&self) -> f64 {
        self.evaluation.normalized
    }
}
