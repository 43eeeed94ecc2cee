use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

use kibitzer_core::{
    AnalysisEngine, AnalysisStatus, EngineAnalysis, EngineEvaluation, Error, EvaluationRequest,
    Result,
};

use crate::channel::LineChannel;
use crate::config::{BusyPolicy, EngineConfig};
use crate::uci::{BestMove, EngineLine, UciInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Uninitialized,
    Ready,
    Busy(Uuid),
    /// A timed-out search was stopped and its `bestmove` is still owed.
    Draining,
    Closed,
}

type Reply = oneshot::Sender<Result<EngineAnalysis>>;

enum Command {
    Evaluate {
        request: EvaluationRequest,
        reply: Reply,
    },
}

/// Client for one engine connection.
///
/// A worker task owns the channel and serves evaluations one at a time.
/// UCI output carries no request identifier, so at most one `position` +
/// `go` pair is outstanding; further requests are queued or rejected per
/// [`BusyPolicy`].
pub struct EngineClient {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<ChannelState>,
    cancel: CancellationToken,
}

impl EngineClient {
    /// Spawns the configured engine binary and initializes it.
    pub async fn spawn(config: &EngineConfig) -> Result<Self> {
        let channel = LineChannel::spawn_process(&config.binary_path)?;
        Self::start(channel, config).await
    }

    /// Sends the handshake over `channel` and starts serving requests.
    pub async fn start(channel: LineChannel, config: &EngineConfig) -> Result<Self> {
        let (state_tx, state_rx) = watch::channel(ChannelState::Uninitialized);

        for cmd in config.handshake() {
            send(&channel, cmd).await?;
        }
        state_tx.send_replace(ChannelState::Ready);
        debug!("engine initialized");

        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let worker = Worker {
            channel,
            commands: cmd_rx,
            state: state_tx,
            cancel: cancel.clone(),
            queue: VecDeque::new(),
            active: None,
            drain_deadline: None,
            timeout: config.timeout,
            policy: config.busy_policy,
        };
        tokio::spawn(worker.run());

        Ok(Self {
            commands: cmd_tx,
            state: state_rx,
            cancel,
        })
    }

    #[instrument(skip(self, request), fields(id = %request.id, depth = request.depth))]
    pub async fn evaluate(&self, request: EvaluationRequest) -> Result<EngineAnalysis> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Evaluate { request, reply })
            .await
            .map_err(|_| Error::ChannelUnavailable("engine client stopped".into()))?;
        rx.await
            .map_err(|_| Error::ChannelUnavailable("engine client stopped".into()))?
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Sends `quit` and fails every request still pending.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EngineClient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[async_trait]
impl AnalysisEngine for EngineClient {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<EngineAnalysis> {
        EngineClient::evaluate(self, request).await
    }

    async fn evaluate_or_neutral(&self, request: EvaluationRequest) -> EngineAnalysis {
        let fallback = EngineAnalysis::neutral(&request);
        match EngineClient::evaluate(self, request).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "analysis failed, using neutral evaluation");
                fallback
            }
        }
    }

    async fn shutdown(&self) -> Result<()> {
        EngineClient::shutdown(self);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.state() == ChannelState::Ready
    }
}

async fn send(channel: &LineChannel, cmd: String) -> Result<()> {
    trace!("sending command: {}", cmd);
    channel
        .outbound
        .send(cmd)
        .await
        .map_err(|_| Error::ChannelUnavailable("engine input closed".into()))
}

struct Pending {
    request: EvaluationRequest,
    reply: Reply,
}

struct Active {
    pending: Pending,
    last_scored: Option<UciInfo>,
    deadline: Instant,
}

impl Active {
    fn finish(self, status: AnalysisStatus, best_move: Option<String>) {
        let info = self.last_scored.unwrap_or_default();
        let analysis = EngineAnalysis {
            id: self.pending.request.id,
            fen: self.pending.request.fen,
            best_move,
            evaluation: info.score.unwrap_or_else(EngineEvaluation::neutral),
            depth_reached: info.depth.unwrap_or(0),
            principal_variation: info.pv,
            status,
            completed_at: Utc::now(),
        };
        // the caller may have stopped waiting
        let _ = self.pending.reply.send(Ok(analysis));
    }
}

struct Worker {
    channel: LineChannel,
    commands: mpsc::Receiver<Command>,
    state: watch::Sender<ChannelState>,
    cancel: CancellationToken,
    queue: VecDeque<Pending>,
    active: Option<Active>,
    drain_deadline: Option<Instant>,
    timeout: Duration,
    policy: BusyPolicy,
}

impl Worker {
    async fn run(mut self) {
        let reason = loop {
            let deadline = self
                .active
                .as_ref()
                .map(|a| a.deadline)
                .or(self.drain_deadline);

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    let _ = self.channel.outbound.send("quit".to_string()).await;
                    break "engine client shut down";
                }
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Evaluate { request, reply }) => {
                        if self.submit(Pending { request, reply }).await.is_err() {
                            break "engine input closed";
                        }
                    }
                    None => break "engine client dropped",
                },
                line = self.channel.inbound.recv() => match line {
                    Some(line) => {
                        if self.handle_line(&line).await.is_err() {
                            break "engine input closed";
                        }
                    }
                    None => break "engine output closed",
                },
                _ = sleep_until_opt(deadline) => {
                    if self.drain_deadline.is_some() {
                        // a bestmove still owed would be credited to the next search
                        warn!("engine never answered stop");
                        break "engine ignored stop";
                    }
                    if self.handle_deadline().await.is_err() {
                        break "engine input closed";
                    }
                }
            }
        };
        self.close(reason);
    }

    fn is_busy(&self) -> bool {
        self.active.is_some() || self.drain_deadline.is_some()
    }

    async fn submit(&mut self, pending: Pending) -> Result<()> {
        if self.policy == BusyPolicy::Reject && self.is_busy() {
            debug!(id = %pending.request.id, "rejecting request, engine busy");
            let _ = pending.reply.send(Err(Error::Busy));
            return Ok(());
        }
        debug!(
            id = %pending.request.id,
            queued = self.queue.len(),
            "evaluation requested"
        );
        self.queue.push_back(pending);
        self.start_next().await
    }

    async fn start_next(&mut self) -> Result<()> {
        if self.is_busy() {
            return Ok(());
        }
        while let Some(pending) = self.queue.pop_front() {
            if pending.reply.is_closed() {
                debug!(id = %pending.request.id, "skipping abandoned request");
                continue;
            }
            let id = pending.request.id;
            let position = format!("position fen {}", pending.request.fen);
            let go = format!("go depth {}", pending.request.depth);
            self.active = Some(Active {
                pending,
                last_scored: None,
                deadline: Instant::now() + self.timeout,
            });
            self.state.send_replace(ChannelState::Busy(id));
            send(&self.channel, position).await?;
            send(&self.channel, go).await?;
            return Ok(());
        }
        self.state.send_replace(ChannelState::Ready);
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<()> {
        match EngineLine::parse(line) {
            EngineLine::Info(info) => {
                // secondary multipv lines score worse alternatives
                if info.score.is_none() || matches!(info.multipv, Some(n) if n > 1) {
                    return Ok(());
                }
                // later lines come from deeper iterations and replace earlier ones
                if let Some(active) = self.active.as_mut() {
                    active.last_scored = Some(info);
                }
                Ok(())
            }
            EngineLine::BestMove(BestMove { mv, ponder }) => {
                if self.drain_deadline.take().is_some() {
                    debug!("discarded bestmove of stopped search");
                } else if let Some(active) = self.active.take() {
                    debug!(id = %active.pending.request.id, best_move = ?mv, ponder = ?ponder, "analysis complete");
                    active.finish(AnalysisStatus::Complete, mv);
                } else {
                    debug!("ignoring unsolicited bestmove");
                    return Ok(());
                }
                self.start_next().await
            }
            EngineLine::Other => Ok(()),
        }
    }

    async fn handle_deadline(&mut self) -> Result<()> {
        if let Some(active) = self.active.take() {
            warn!(
                id = %active.pending.request.id,
                timeout_ms = self.timeout.as_millis() as u64,
                "analysis timed out"
            );
            active.finish(AnalysisStatus::TimedOut, None);
            self.drain_deadline = Some(Instant::now() + self.timeout);
            self.state.send_replace(ChannelState::Draining);
            send(&self.channel, "stop".to_string()).await?;
        }
        Ok(())
    }

    fn close(&mut self, reason: &str) {
        info!(reason, "engine channel closed");
        self.state.send_replace(ChannelState::Closed);
        self.commands.close();

        let mut failed = self.queue.drain(..).collect::<Vec<_>>();
        if let Some(active) = self.active.take() {
            failed.insert(0, active.pending);
        }
        while let Ok(Command::Evaluate { request, reply }) = self.commands.try_recv() {
            failed.push(Pending { request, reply });
        }
        for pending in failed {
            let _ = pending
                .reply
                .send(Err(Error::ChannelUnavailable(reason.to_string())));
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
