use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use kibitzer_core::{Error, Result};

const CHANNEL_BUFFER: usize = 256;

/// A bidirectional text-line connection to one engine.
///
/// `inbound` yielding `None` means the engine side has gone away.
pub struct LineChannel {
    pub outbound: mpsc::Sender<String>,
    pub inbound: mpsc::Receiver<String>,
}

/// The engine end of an in-process [`LineChannel`].
pub struct EngineSide {
    pub commands: mpsc::Receiver<String>,
    pub output: mpsc::Sender<String>,
}

impl LineChannel {
    /// Connects a client-side channel to an in-process engine.
    pub fn pair() -> (LineChannel, EngineSide) {
        let (out_tx, out_rx) = mpsc::channel(CHANNEL_BUFFER);
        let (in_tx, in_rx) = mpsc::channel(CHANNEL_BUFFER);
        (
            LineChannel {
                outbound: out_tx,
                inbound: in_rx,
            },
            EngineSide {
                commands: out_rx,
                output: in_tx,
            },
        )
    }

    /// Spawns an engine binary and pumps its stdin/stdout through the
    /// channel. The process is killed once the outbound side is dropped.
    pub fn spawn_process(binary_path: &str) -> Result<Self> {
        let mut process = Command::new(binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::ChannelUnavailable(format!("failed to spawn {}: {}", binary_path, e))
            })?;
        let mut stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::ChannelUnavailable("failed to get stdin".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::ChannelUnavailable("failed to get stdout".into()))?;

        let (out_tx, mut out_rx) = mpsc::channel::<String>(CHANNEL_BUFFER);
        let (in_tx, in_rx) = mpsc::channel::<String>(CHANNEL_BUFFER);

        tokio::spawn(async move {
            // owns the child so that dropping the writer kills the engine
            let _process = process;
            while let Some(cmd) = out_rx.recv().await {
                trace!("sending command: {}", cmd);
                if let Err(e) = stdin.write_all(format!("{}\n", cmd).as_bytes()).await {
                    warn!("engine write failed: {}", e);
                    break;
                }
                if let Err(e) = stdin.flush().await {
                    warn!("engine flush failed: {}", e);
                    break;
                }
            }
            debug!("engine writer finished");
        });

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        trace!("received: {}", line.trim());
                        if in_tx.send(line).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("engine closed stdout");
                        break;
                    }
                    Err(e) => {
                        warn!("engine read failed: {}", e);
                        break;
                    }
                }
            }
        });

        debug!(binary = binary_path, "engine process spawned");
        Ok(Self {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}
