//! Slot tasks: the OAuth callback listener and the live log stream

use area_api::{authorize, logs_url, AreaApi, LogStream, LogStreamEvent};
use area_core::Authenticator;
use tracing::{debug, info, warn};

use crate::message::{Message, OAuthPurpose};

use super::{ActionContext, TaskSlot};

/// Open the authorization page and wait for the redirect.
///
/// Replaces any flow still waiting; the aborted listener releases its port.
pub(super) fn spawn_oauth<A>(
    ctx: &ActionContext<A>,
    authenticator: Authenticator,
    purpose: OAuthPurpose,
) where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let redirect_uri = ctx.redirect_uri.clone();
    let timeout = ctx.callback_timeout;
    let tx = ctx.msg_tx.clone();

    ctx.vacate(TaskSlot::OAuth);
    let handle = tokio::spawn(async move {
        let result = authorize(&authenticator, &redirect_uri, timeout)
            .await
            .map_err(|e| e.to_string());
        let _ = tx
            .send(Message::OAuthFinished {
                purpose,
                authenticator: authenticator.name,
                result,
            })
            .await;
    });
    ctx.occupy(TaskSlot::OAuth, handle);
}

/// Follow `applet_id`'s log WebSocket until it closes or the page is left.
pub(super) fn spawn_log_stream<A>(ctx: &ActionContext<A>, applet_id: String)
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let tx = ctx.msg_tx.clone();
    let url = match logs_url(&ctx.api_base, ctx.log_stream_url.as_deref(), &applet_id) {
        Ok(url) => url,
        Err(e) => {
            warn!("Cannot build the log stream URL: {}", e);
            tokio::spawn(async move {
                let _ = tx
                    .send(Message::LogStreamClosed {
                        applet_id,
                        error: Some(e.to_string()),
                    })
                    .await;
            });
            return;
        }
    };
    let mut shutdown_rx = ctx.shutdown_rx.clone();

    ctx.vacate(TaskSlot::LogStream);
    let handle = tokio::spawn(async move {
        let mut stream = match LogStream::connect(&url).await {
            Ok(stream) => stream,
            Err(e) => {
                let _ = tx
                    .send(Message::LogStreamClosed {
                        applet_id,
                        error: Some(e.to_string()),
                    })
                    .await;
                return;
            }
        };

        // `None` means shutdown, otherwise the close reason
        let ended = loop {
            tokio::select! {
                event = stream.recv() => match event {
                    Some(LogStreamEvent::Message(text)) => {
                        let frame = Message::LogFrame {
                            applet_id: applet_id.clone(),
                            text,
                        };
                        if tx.send(frame).await.is_err() {
                            return;
                        }
                    }
                    Some(LogStreamEvent::Error(e)) => break Some(Some(e)),
                    Some(LogStreamEvent::Closed) | None => break Some(None),
                },
                _ = shutdown_rx.changed() => break None,
            }
        };
        let Some(error) = ended else {
            debug!("Closing log stream for shutdown");
            stream.close().await;
            return;
        };

        info!("Log stream of applet {} ended", applet_id);
        let _ = tx
            .send(Message::LogStreamClosed { applet_id, error })
            .await;
    });
    ctx.occupy(TaskSlot::LogStream, handle);
}
