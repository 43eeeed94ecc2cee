use std::sync::Arc;

use tracing::{debug, warn};

use kibitzer_core::{fen, AnalysisEngine, EvaluationRequest, MoveRecord, Piece, Position};
use kibitzer_quality::{aggregate, classify, phase_from_counts, phase_of};

use crate::protocol::{ClientMessage, PositionReport, ServerMessage};

/// Routes protocol messages to the engine, the classifier and the
/// aggregator. Every request gets exactly one answer.
pub struct Session {
    engine: Arc<dyn AnalysisEngine>,
    default_depth: u8,
}

impl Session {
    pub fn new(engine: Arc<dyn AnalysisEngine>, default_depth: u8) -> Self {
        Self {
            engine,
            default_depth: default_depth.max(1),
        }
    }

    /// Decodes one JSON line and answers it. Undecodable input is answered
    /// with a 400 error rather than dropped.
    pub async fn handle_line(&self, line: &str) -> ServerMessage {
        match serde_json::from_str::<ClientMessage>(line) {
            Ok(msg) => self.handle_message(msg).await,
            Err(e) => {
                debug!(error = %e, "rejecting malformed request");
                ServerMessage::Error {
                    id: None,
                    code: 400,
                    message: format!("invalid message: {}", e),
                }
            }
        }
    }

    pub async fn handle_message(&self, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::AnalyzePosition { id, pieces, depth } => {
                self.handle_analyze(id, pieces, depth).await
            }
            ClientMessage::Classify {
                id,
                evaluation,
                pieces,
                pawns,
            } => {
                let phase = match (pieces, pawns) {
                    (Some(pieces), Some(pawns)) => Some(phase_from_counts(pieces, pawns)),
                    _ => None,
                };
                ServerMessage::Quality {
                    id,
                    quality: classify(evaluation, phase),
                }
            }
            ClientMessage::ShowStats { id, moves } => self.handle_stats(id, moves),
            ClientMessage::Ping { id } => ServerMessage::Pong { id },
        }
    }

    async fn handle_analyze(
        &self,
        id: String,
        pieces: Option<Vec<Piece>>,
        depth: Option<u8>,
    ) -> ServerMessage {
        let Some(pieces) = pieces else {
            return ServerMessage::NotFound {
                id,
                message: "board not found".to_string(),
            };
        };

        let position = Position::new(pieces);
        let fen = fen::encode(&position);
        let request =
            EvaluationRequest::new(fen.clone()).with_depth(depth.unwrap_or(self.default_depth));
        debug!(%id, %fen, depth = request.depth, "analyzing position");

        let analysis = self.engine.evaluate_or_neutral(request).await;
        if analysis.best_move.is_none() {
            warn!(%id, status = ?analysis.status, "engine returned no best move");
        }

        let quality = classify(analysis.pawns(), Some(phase_of(&position)));
        ServerMessage::PositionAnalysis {
            id,
            analysis: PositionReport {
                evaluation: quality.evaluation,
                best_move: analysis.best_move,
                pieces: position,
                fen,
                move_quality: quality.tier.label().to_string(),
                move_explanation: quality.explanation.clone(),
                quality,
                status: analysis.status,
            },
        }
    }

    fn handle_stats(&self, id: String, moves: Option<Vec<MoveRecord>>) -> ServerMessage {
        match moves {
            Some(moves) => ServerMessage::Stats {
                id,
                stats: aggregate(&moves),
            },
            None => ServerMessage::NotFound {
                id,
                message: "move list not found".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use kibitzer_core::{
        AnalysisStatus, EngineAnalysis, EngineEvaluation, Error, QualityTier, Result,
    };
    use serde_json::json;

    struct FixedEngine(Option<EngineEvaluation>);

    #[async_trait]
    impl AnalysisEngine for FixedEngine {
        async fn evaluate(&self, request: EvaluationRequest) -> Result<EngineAnalysis> {
            let evaluation = self
                .0
                .ok_or_else(|| Error::ChannelUnavailable("engine offline".into()))?;
            Ok(EngineAnalysis {
                id: request.id,
                fen: request.fen,
                best_move: Some("e2e4".into()),
                evaluation,
                depth_reached: request.depth,
                principal_variation: vec!["e2e4".into()],
                status: AnalysisStatus::Complete,
                completed_at: Utc::now(),
            })
        }

        async fn shutdown(&self) -> Result<()> {
            Ok(())
        }

        fn is_ready(&self) -> bool {
            self.0.is_some()
        }
    }

    fn session(evaluation: Option<EngineEvaluation>) -> Session {
        Session::new(Arc::new(FixedEngine(evaluation)), 15)
    }

    #[tokio::test]
    async fn test_analyze_position() {
        let s = session(Some(EngineEvaluation::centipawns(250)));
        let line = json!({
            "type": "analyze_position",
            "id": "a1",
            "pieces": [
                {"type": "k", "color": "w", "square": "e1"},
                {"type": "k", "color": "b", "square": "e8"}
            ]
        })
        .to_string();

        match s.handle_line(&line).await {
            ServerMessage::PositionAnalysis { id, analysis } => {
                assert_eq!(id, "a1");
                assert_eq!(analysis.evaluation, 2.5);
                assert_eq!(analysis.best_move.as_deref(), Some("e2e4"));
                assert_eq!(analysis.fen, "4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1");
                assert_eq!(analysis.quality.tier, QualityTier::Excellent);
                assert_eq!(analysis.move_quality, "Excellent move");
                assert!(analysis.quality.strategic_tags.contains(&"endgame".to_string()));
                assert_eq!(analysis.status, AnalysisStatus::Complete);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_engine_failure_degrades_to_neutral() {
        let s = session(None);
        let reply = s
            .handle_message(ClientMessage::AnalyzePosition {
                id: "n".into(),
                pieces: Some(Vec::new()),
                depth: Some(3),
            })
            .await;
        match reply {
            ServerMessage::PositionAnalysis { analysis, .. } => {
                assert_eq!(analysis.evaluation, 0.0);
                assert!(analysis.best_move.is_none());
                assert_eq!(analysis.quality.tier, QualityTier::Balanced);
                assert_eq!(analysis.status, AnalysisStatus::Unavailable);
                assert_eq!(analysis.fen, "8/8/8/8/8/8/8/8 w KQkq - 0 1");
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_board_is_not_found() {
        let s = session(Some(EngineEvaluation::neutral()));
        let reply = s
            .handle_line(r#"{"type":"analyze_position","id":"x"}"#)
            .await;
        assert!(matches!(reply, ServerMessage::NotFound { ref id, .. } if id == "x"));
    }

    #[tokio::test]
    async fn test_missing_move_list_is_not_found() {
        let s = session(Some(EngineEvaluation::neutral()));
        let reply = s.handle_line(r#"{"type":"show_stats","id":"s"}"#).await;
        match reply {
            ServerMessage::NotFound { message, .. } => assert_eq!(message, "move list not found"),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_show_stats() {
        let s = session(Some(EngineEvaluation::neutral()));
        let line = json!({
            "type": "show_stats",
            "id": "s",
            "moves": [
                {"number": 1, "color": "w", "move": "e4", "rawEval": "1.3"},
                {"number": 1, "color": "b", "move": "e5", "rawEval": "-1.3"}
            ]
        })
        .to_string();
        match s.handle_line(&line).await {
            ServerMessage::Stats { stats, .. } => {
                assert_eq!(stats.total_moves, 2);
                assert_eq!(stats.white_good_moves, 1);
                assert_eq!(stats.black_good_moves, 1);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classify_with_phase_counts() {
        let s = session(None);
        let reply = s
            .handle_message(ClientMessage::Classify {
                id: "c".into(),
                evaluation: -0.8,
                pieces: Some(3),
                pawns: Some(6),
            })
            .await;
        match reply {
            ServerMessage::Quality { quality, .. } => {
                assert_eq!(quality.tier, QualityTier::Passable);
                assert_eq!(quality.strategic_tags, vec!["endgame"]);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_line_is_400() {
        let s = session(None);
        for line in ["not json", r#"{"type":"teleport","id":"1"}"#] {
            match s.handle_line(line).await {
                ServerMessage::Error { id, code, .. } => {
                    assert_eq!(code, 400);
                    assert!(id.is_none());
                }
                other => panic!("unexpected reply: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_ping() {
        let s = session(None);
        let reply = s.handle_line(r#"{"type":"ping","id":"p"}"#).await;
        assert!(matches!(reply, ServerMessage::Pong { ref id } if id == "p"));
    }
}
