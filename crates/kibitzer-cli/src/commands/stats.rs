use std::path::Path;

use kibitzer_core::MoveRecord;
use kibitzer_quality::aggregate;

use super::read_json;

pub fn execute(input: &Path, json: bool) -> anyhow::Result<()> {
    let records: Vec<MoveRecord> = read_json(input)?;
    let stats = aggregate(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats.summary());
    }
    Ok(())
}
