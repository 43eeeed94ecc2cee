use std::time::Duration;

use kibitzer_engine::{ChannelState, EngineClient, EngineConfig, EngineSide, LineChannel};
use tokio::task::JoinHandle;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// The engine end of a [`LineChannel::pair`], driven line by line.
pub struct ScriptedEngine {
    side: EngineSide,
}

impl ScriptedEngine {
    pub async fn recv(&mut self) -> Option<String> {
        tokio::time::timeout(RECV_TIMEOUT, self.side.commands.recv())
            .await
            .expect("engine recv timeout")
    }

    pub async fn expect(&mut self, expected: &str) {
        assert_eq!(self.recv().await.as_deref(), Some(expected));
    }

    pub async fn expect_search(&mut self, fen: &str, depth: u8) {
        self.expect(&format!("position fen {}", fen)).await;
        self.expect(&format!("go depth {}", depth)).await;
    }

    /// Asserts that nothing is sent to the engine for `window`.
    pub async fn expect_silence(&mut self, window: Duration) {
        if let Ok(cmd) = tokio::time::timeout(window, self.side.commands.recv()).await {
            panic!("unexpected command: {:?}", cmd);
        }
    }

    pub async fn emit(&self, lines: &[&str]) {
        for line in lines {
            self.side
                .output
                .send(line.to_string())
                .await
                .expect("client dropped engine output");
        }
    }

    /// Answers every `go` with the next script, until `quit` or the
    /// scripts run out.
    pub fn respond_with(mut self, scripts: Vec<Vec<&'static str>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut scripts = scripts.into_iter();
            while let Some(cmd) = self.side.commands.recv().await {
                if cmd == "quit" {
                    break;
                }
                if cmd.starts_with("go ") {
                    match scripts.next() {
                        Some(lines) => self.emit(&lines).await,
                        None => break,
                    }
                }
            }
        })
    }
}

pub fn fast_config(timeout_ms: u64) -> EngineConfig {
    EngineConfig {
        timeout: Duration::from_millis(timeout_ms),
        ..Default::default()
    }
}

/// Starts a client over an in-process channel and consumes its handshake.
pub async fn start_client(config: EngineConfig) -> (EngineClient, ScriptedEngine) {
    let (channel, side) = LineChannel::pair();
    let client = EngineClient::start(channel, &config)
        .await
        .expect("start client");
    let mut engine = ScriptedEngine { side };
    for cmd in config.handshake() {
        engine.expect(&cmd).await;
    }
    (client, engine)
}

pub async fn wait_for_state(client: &EngineClient, expected: ChannelState) {
    let mut state = client.subscribe();
    let wait = async {
        while *state.borrow_and_update() != expected {
            if state.changed().await.is_err() {
                break;
            }
        }
    };
    tokio::time::timeout(RECV_TIMEOUT, wait)
        .await
        .expect("state wait timeout");
    assert_eq!(client.state(), expected);
}
