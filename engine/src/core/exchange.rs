//! Request/reply exchange over a message channel

use serde_json::Value;
use std::time::Duration;

use crate::error::{EngineError, EngineResult};
use crate::traits::MessageChannel;

/// Publish `request` and return the first reply seen on `reply_destination`
///
/// The subscription is started alongside the publish and polled first, so a
/// responder that answers before `publish` even returns is still observed.
/// A publish failure is returned as soon as it happens; the pending
/// subscription is dropped. Publish and reply share the reply deadline, so a
/// publish that never completes still ends in a timeout.
pub async fn exchange<C>(
    channel: &C,
    request_destination: &str,
    request: &Value,
    reply_destination: &str,
    reply_timeout: Duration,
) -> EngineResult<Value>
where
    C: MessageChannel + ?Sized,
{
    tracing::debug!(
        "📨 Exchanging {} -> {} (reply timeout {:?})",
        request_destination,
        reply_destination,
        reply_timeout
    );

    let reply = channel.subscribe(reply_destination, reply_timeout);
    let publish = channel.publish(request_destination, request);

    // try_join! polls its arguments in order on the first pass, and the
    // deadline covers the publish as well as the reply
    match tokio::time::timeout(reply_timeout, async { tokio::try_join!(reply, publish) }).await {
        Ok(result) => result.map(|(reply, ())| reply),
        Err(_) => Err(EngineError::timeout(
            format!("reply on '{reply_destination}'"),
            reply_timeout,
        )),
    }
}
