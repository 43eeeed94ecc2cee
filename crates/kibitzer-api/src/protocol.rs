use kibitzer_core::{AnalysisStatus, GameStats, MoveQuality, MoveRecord, Piece, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    AnalyzePosition {
        id: String,
        /// `None` when the host could not find a board to read.
        pieces: Option<Vec<Piece>>,
        depth: Option<u8>,
    },
    Classify {
        id: String,
        evaluation: f64,
        pieces: Option<usize>,
        pawns: Option<usize>,
    },
    ShowStats {
        id: String,
        /// `None` when the host could not find a move list.
        moves: Option<Vec<MoveRecord>>,
    },
    Ping {
        id: String,
    },
}

impl ClientMessage {
    pub fn id(&self) -> &str {
        match self {
            ClientMessage::AnalyzePosition { id, .. }
            | ClientMessage::Classify { id, .. }
            | ClientMessage::ShowStats { id, .. }
            | ClientMessage::Ping { id } => id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub evaluation: f64,
    pub best_move: Option<String>,
    pub pieces: Position,
    pub fen: String,
    pub move_quality: String,
    pub move_explanation: String,
    pub quality: MoveQuality,
    pub status: AnalysisStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    PositionAnalysis {
        id: String,
        analysis: PositionReport,
    },
    Quality {
        id: String,
        quality: MoveQuality,
    },
    Stats {
        id: String,
        stats: GameStats,
    },
    NotFound {
        id: String,
        message: String,
    },
    Error {
        id: Option<String>,
        code: u16,
        message: String,
    },
    Pong {
        id: String,
    },
}
