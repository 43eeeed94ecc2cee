pub mod analyze;
pub mod classify;
pub mod encode;
pub mod serve;
pub mod stats;

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use kibitzer_core::{Piece, Position};

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub(crate) fn read_position(path: &Path) -> anyhow::Result<Position> {
    let pieces: Vec<Piece> = read_json(path)?;
    Ok(Position::new(pieces))
}
