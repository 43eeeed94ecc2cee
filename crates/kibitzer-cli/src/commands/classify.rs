use kibitzer_core::MoveQuality;
use kibitzer_quality::{classify, phase_from_counts};

pub fn execute(evaluation: f64, pieces: Option<usize>, pawns: Option<usize>) -> anyhow::Result<()> {
    let phase = match (pieces, pawns) {
        (Some(pieces), Some(pawns)) => Some(phase_from_counts(pieces, pawns)),
        (None, None) => None,
        _ => anyhow::bail!("--pieces and --pawns must be given together"),
    };
    print_quality(&classify(evaluation, phase));
    Ok(())
}

pub(crate) fn print_quality(quality: &MoveQuality) {
    println!("Quality: {}", quality.tier);
    println!("Evaluation: {:+.2}", quality.evaluation);
    if !quality.tactical_tags.is_empty() {
        println!("Tactical: {}", quality.tactical_tags.join(", "));
    }
    if !quality.strategic_tags.is_empty() {
        println!("Strategic: {}", quality.strategic_tags.join(", "));
    }
    println!();
    println!("{}", quality.explanation);
}
