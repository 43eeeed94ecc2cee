use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What to do with an evaluation requested while another is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
    /// Serve requests one at a time in arrival order.
    #[default]
    Queue,
    /// Fail the new request with `Error::Busy`.
    Reject,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub binary_path: String,
    pub pool_size: usize,
    pub threads: u16,
    pub multipv: u8,
    pub skill_level: u8,
    pub timeout: Duration,
    pub busy_policy: BusyPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary_path: "/usr/local/bin/stockfish".to_string(),
            pool_size: 1,
            threads: 4,
            multipv: 1,
            skill_level: 20,
            timeout: Duration::from_secs(30),
            busy_policy: BusyPolicy::Queue,
        }
    }
}

impl EngineConfig {
    /// Handshake and option commands sent before the first evaluation.
    pub fn handshake(&self) -> Vec<String> {
        vec![
            "uci".to_string(),
            format!("setoption name Threads value {}", self.threads),
            format!("setoption name MultiPV value {}", self.multipv),
            format!("setoption name Skill Level value {}", self.skill_level),
        ]
    }
}
