mod analysis;
mod chess;
mod quality;
mod stats;

pub use analysis::*;
pub use chess::*;
pub use quality::*;
pub use stats::*;
