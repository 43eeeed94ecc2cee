//! JSON-lines request protocol for hosts that drive the analyzer: position
//! analysis, standalone classification and game statistics.

pub mod protocol;
pub mod session;
pub mod transport;

pub use protocol::{ClientMessage, PositionReport, ServerMessage};
pub use session::Session;
pub use transport::serve_lines;
