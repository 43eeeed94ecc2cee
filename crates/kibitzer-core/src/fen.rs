//! FEN encoding of scraped piece placements.
//!
//! Only the placement field is derived from the board. Side to move,
//! castling rights, en passant and the move counters are not observable from
//! a piece list, so every encoded position carries [`FEN_TRAILER`].

use crate::error::{Error, Result};
use crate::types::{Color, Piece, PieceKind, Position, Square};

/// White to move, full castling rights, no en passant square, fresh clocks.
pub const FEN_TRAILER: &str = " w KQkq - 0 1";

type Grid = [[Option<char>; 8]; 8];

/// Encodes a position as a full FEN string.
///
/// Duplicate squares are resolved by the later piece overwriting the earlier.
pub fn encode(position: &Position) -> String {
    let mut fen = encode_placement(position);
    fen.push_str(FEN_TRAILER);
    fen
}

/// Encodes only the piece-placement field, rank 8 first.
pub fn encode_placement(position: &Position) -> String {
    let mut grid: Grid = [[None; 8]; 8];
    for piece in position.pieces() {
        grid[piece.square.grid_row()][piece.square.file() as usize] = Some(piece.fen_char());
    }

    let mut fen = String::with_capacity(72);
    for (row, rank) in grid.iter().enumerate() {
        let mut empty = 0u8;
        for cell in rank {
            match cell {
                Some(c) => {
                    if empty > 0 {
                        fen.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    fen.push(*c);
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push((b'0' + empty) as char);
        }
        if row < 7 {
            fen.push('/');
        }
    }
    fen
}

/// Parses the placement field of a FEN string (anything after the first
/// space is ignored). Pieces come back in board order: rank 8 to rank 1,
/// a-file to h-file.
pub fn parse_placement(fen: &str) -> Result<Position> {
    let placement = fen
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::InvalidFen("empty".into()))?;

    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(Error::InvalidFen(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut pieces = Vec::new();
    for (row, rank) in ranks.iter().enumerate() {
        let rank_index = 7 - row as u8;
        let mut file: u8 = 0;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(Error::InvalidFen(format!("bad empty count '{c}'")));
                }
                file += skip as u8;
            } else {
                let kind = PieceKind::from_char(c)
                    .ok_or_else(|| Error::InvalidFen(format!("unknown piece '{c}'")))?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let square = Square::new(file, rank_index)
                    .map_err(|_| Error::InvalidFen(format!("rank '{rank}' is too wide")))?;
                pieces.push(Piece::new(kind, color, square));
                file += 1;
            }
            if file > 8 {
                return Err(Error::InvalidFen(format!("rank '{rank}' is too wide")));
            }
        }
        if file != 8 {
            return Err(Error::InvalidFen(format!(
                "rank '{rank}' covers {file} files"
            )));
        }
    }

    Ok(Position::new(pieces))
}
