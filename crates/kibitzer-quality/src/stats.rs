use tracing::debug;

use kibitzer_core::{Color, GameStats, MoveRecord, MoveStatsRow, QualityTier, MATE_SCORE};

use crate::classifier::classify;

/// Reads an evaluation as a move list displays it. Mate notations (`M3`,
/// `#-2`) saturate; anything unreadable is 0.
pub fn parse_raw_eval(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0.0;
    };

    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if let Some(moves) = body.strip_prefix('M').or_else(|| body.strip_prefix('#')) {
        return match moves.parse::<i32>() {
            Ok(n) if (n < 0) != negative => -MATE_SCORE,
            Ok(_) => MATE_SCORE,
            Err(_) => 0.0,
        };
    }

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Classifies every move and tallies good and excellent moves per side.
///
/// Tiers are read from the mover's side, so a black move that leaves black
/// moderately better counts as a good move for black.
pub fn aggregate(records: &[MoveRecord]) -> GameStats {
    let mut stats = GameStats {
        total_moves: records.len(),
        moves: Vec::with_capacity(records.len()),
        ..Default::default()
    };

    for record in records {
        let evaluation = parse_raw_eval(record.raw_eval.as_deref());
        let quality = classify(evaluation, None);

        match (record.color, quality.tier.for_mover(record.color)) {
            (Color::White, QualityTier::Good) => stats.white_good_moves += 1,
            (Color::Black, QualityTier::Good) => stats.black_good_moves += 1,
            (Color::White, QualityTier::Excellent) => stats.white_excellent_moves += 1,
            (Color::Black, QualityTier::Excellent) => stats.black_excellent_moves += 1,
            _ => {}
        }

        stats.moves.push(MoveStatsRow {
            number: record.number,
            color: record.color,
            move_text: record.text.clone(),
            tier: quality.tier,
            explanation: quality.explanation,
        });
    }

    debug!(
        total = stats.total_moves,
        white_good = stats.white_good_moves,
        black_good = stats.black_good_moves,
        "aggregated game stats"
    );
    stats
}
