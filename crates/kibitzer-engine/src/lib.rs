mod channel;
mod client;
mod config;
mod pool;
mod uci;

pub use channel::{EngineSide, LineChannel};
pub use client::{ChannelState, EngineClient};
pub use config::{BusyPolicy, EngineConfig};
pub use pool::EnginePool;
pub use uci::{BestMove, EngineLine, UciInfo};
