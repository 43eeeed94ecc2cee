use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use kibitzer_core::Result;

use crate::protocol::ServerMessage;
use crate::session::Session;

/// Serves newline-delimited JSON requests until `reader` hits EOF.
///
/// Requests are handled concurrently, so replies may come back in a
/// different order than the requests; clients correlate by `id`. Returns
/// once every in-flight request has been answered.
pub async fn serve_lines<R, W>(session: Arc<Session>, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(64);

    let writer_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let mut json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "failed to encode reply");
                    continue;
                }
            };
            json.push('\n');
            if writer.write_all(json.as_bytes()).await.is_err() || writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut lines = reader.lines();
    let mut handled = 0usize;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        handled += 1;
        let session = session.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let reply = session.handle_line(&line).await;
            if tx.send(reply).await.is_err() {
                debug!("reply dropped, writer closed");
            }
        });
    }

    drop(tx);
    if let Err(e) = writer_task.await {
        warn!(error = %e, "writer task failed");
    }
    info!(requests = handled, "input closed");
    Ok(())
}
