use std::path::Path;

use tracing::{info, warn};

use kibitzer_core::{fen, AnalysisEngine, AnalysisStatus, EngineAnalysis, EvaluationRequest, Position};
use kibitzer_engine::{EngineClient, EngineConfig};
use kibitzer_quality::{classify, phase_of};

use super::classify::print_quality;
use super::read_position;
use crate::config::Config;

pub async fn execute(
    config: &Config,
    input: Option<&Path>,
    placement: Option<&str>,
    depth: Option<u8>,
) -> anyhow::Result<()> {
    let position = match (input, placement) {
        (Some(path), _) => read_position(path)?,
        (None, Some(placement)) => fen::parse_placement(placement)?,
        (None, None) => anyhow::bail!("either a pieces file or --fen is required"),
    };
    let fen = fen::encode(&position);
    let depth = depth.unwrap_or(config.engine.depth);

    info!("analyzing {} at depth {}", fen, depth);
    let request = EvaluationRequest::new(fen.clone()).with_depth(depth);
    let analysis = run_engine(&config.engine_config(), request).await;

    report(&position, &fen, analysis.best_move.as_deref(), analysis.status);
    print_quality(&classify(analysis.pawns(), Some(phase_of(&position))));
    Ok(())
}

/// Missing or failing engines yield a neutral analysis.
async fn run_engine(config: &EngineConfig, request: EvaluationRequest) -> EngineAnalysis {
    let client = match EngineClient::spawn(config).await {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "engine unavailable, using neutral evaluation");
            return EngineAnalysis::neutral(&request);
        }
    };
    let analysis = client.evaluate_or_neutral(request).await;
    client.shutdown();
    analysis
}

fn report(position: &Position, fen: &str, best_move: Option<&str>, status: AnalysisStatus) {
    println!("Position: {}", fen);
    println!(
        "Material: {} pieces, {} pawns",
        position.piece_count(),
        position.pawn_count()
    );
    println!("Best move: {}", best_move.unwrap_or("(none)"));
    match status {
        AnalysisStatus::TimedOut => {
            println!("Search timed out; showing the last evaluation reported")
        }
        AnalysisStatus::Unavailable => println!("Engine unavailable; evaluation is neutral"),
        AnalysisStatus::Complete => {}
    }
    println!();
}
