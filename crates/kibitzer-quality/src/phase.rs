use kibitzer_core::{GamePhase, Position};

/// Phase from remaining material. `pieces` counts knights, bishops, rooks
/// and queens of both sides; `pawns` counts pawns of both sides.
pub fn phase_from_counts(pieces: usize, pawns: usize) -> GamePhase {
    if pieces <= 4 {
        GamePhase::Endgame
    } else if pieces <= 8 || pawns <= 8 {
        GamePhase::AdvancedMiddlegame
    } else {
        GamePhase::Middlegame
    }
}

pub fn phase_of(position: &Position) -> GamePhase {
    phase_from_counts(position.piece_count(), position.pawn_count())
}
