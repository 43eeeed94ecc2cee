use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Color {
    #[serde(rename = "w", alias = "white")]
    White,
    #[serde(rename = "b", alias = "black")]
    Black,
}

impl Color {
    pub fn from_fen(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PieceKind {
    #[serde(rename = "p")]
    Pawn,
    #[serde(rename = "n")]
    Knight,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "k")]
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Accepts either case; FEN letters carry color in their case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// A board coordinate. `file` 0 is the a-file, `rank` 0 is the first rank.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Result<Self> {
        if file > 7 || rank > 7 {
            return Err(Error::InvalidSquare(format!("file {file}, rank {rank}")));
        }
        Ok(Self { file, rank })
    }

    /// Parses the board reader's numeric notation, where `"52"` is file 5
    /// (e) and rank 2.
    pub fn from_numeric(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(Error::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'1');
        let rank = bytes[1].wrapping_sub(b'1');
        Self::new(file, rank).map_err(|_| Error::InvalidSquare(s.to_string()))
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Row index in a FEN grid: 0 for the eighth rank, 7 for the first.
    pub fn grid_row(self) -> usize {
        7 - self.rank as usize
    }
}

impl FromStr for Square {
    type Err = Error;

    /// Accepts algebraic `"e2"` and numeric `"52"` notation.
    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(Error::InvalidSquare(s.to_string()));
        }
        if bytes[0].is_ascii_digit() {
            return Self::from_numeric(s);
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Self::new(file, rank).map_err(|_| Error::InvalidSquare(s.to_string()))
    }
}

impl TryFrom<String> for Square {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            square,
        }
    }

    /// Builds a piece from the board-source letters, e.g. `('n', 'w', "g1")`.
    pub fn from_letters(kind: char, color: char, square: &str) -> Result<Self> {
        let kind =
            PieceKind::from_char(kind).ok_or_else(|| Error::InvalidPiece(kind.to_string()))?;
        let color = Color::from_fen(color).ok_or_else(|| Error::InvalidPiece(color.to_string()))?;
        Ok(Self::new(kind, color, square.parse()?))
    }

    pub fn fen_char(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// An analysis snapshot of piece placements, in board-reader order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Position {
    pieces: Vec<Piece>,
}

impl Position {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Knights, bishops, rooks and queens of both colors.
    pub fn piece_count(&self) -> usize {
        self.pieces
            .iter()
            .filter(|p| !matches!(p.kind, PieceKind::Pawn | PieceKind::King))
            .count()
    }

    pub fn pawn_count(&self) -> usize {
        self.pieces
            .iter()
            .filter(|p| p.kind == PieceKind::Pawn)
            .count()
    }
}

impl From<Vec<Piece>> for Position {
    fn from(pieces: Vec<Piece>) -> Self {
        Self::new(pieces)
    }
}

impl FromIterator<Piece> for Position {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
