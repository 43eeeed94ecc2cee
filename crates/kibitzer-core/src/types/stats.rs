use serde::{Deserialize, Serialize};

use super::{Color, QualityTier};

/// One half-move as supplied by the move-list source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub number: u32,
    pub color: Color,
    #[serde(alias = "move")]
    pub text: String,
    /// Evaluation as the source displays it, e.g. `"1.25"` or `"M3"`.
    #[serde(default)]
    pub raw_eval: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveStatsRow {
    pub number: u32,
    pub color: Color,
    pub move_text: String,
    pub tier: QualityTier,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_moves: usize,
    pub moves: Vec<MoveStatsRow>,
    pub white_good_moves: usize,
    pub black_good_moves: usize,
    pub white_excellent_moves: usize,
    pub black_excellent_moves: usize,
}

impl GameStats {
    pub fn good_moves(&self, color: Color) -> usize {
        match color {
            Color::White => self.white_good_moves,
            Color::Black => self.black_good_moves,
        }
    }

    pub fn excellent_moves(&self, color: Color) -> usize {
        match color {
            Color::White => self.white_excellent_moves,
            Color::Black => self.black_excellent_moves,
        }
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("Game summary:\n");
        out.push_str(&format!("  Total moves: {}\n", self.total_moves));
        out.push_str(&format!("  Good moves (white): {}\n", self.white_good_moves));
        out.push_str(&format!("  Good moves (black): {}\n", self.black_good_moves));
        out.push_str(&format!(
            "  Excellent moves (white): {}\n",
            self.white_excellent_moves
        ));
        out.push_str(&format!(
            "  Excellent moves (black): {}\n",
            self.black_excellent_moves
        ));
        if !self.moves.is_empty() {
            out.push_str("\nMoves:\n");
            for row in &self.moves {
                out.push_str(&format!(
                    "  {:>3} {:<5} {:<8} {}\n",
                    row.number, row.color, row.move_text, row.tier
                ));
            }
        }
        out
    }
}
