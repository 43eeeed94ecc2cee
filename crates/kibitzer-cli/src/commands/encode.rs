use std::path::Path;

use kibitzer_core::fen;

use super::read_position;

pub fn execute(input: &Path) -> anyhow::Result<()> {
    let position = read_position(input)?;
    println!("{}", fen::encode(&position));
    Ok(())
}
