//! Chat transports and reply delivery

pub mod console;
pub mod irc;

use crate::domain::entities::Reply;
use crate::domain::traits::ChatTransport;

/// Wait out the reply delay, then send each line. A failed send drops the
/// rest of this reply only.
pub async fn deliver(transport: &dyn ChatTransport, reply: Reply) {
    if let Some(delay) = reply.delay {
        tracing::debug!("Delaying reply to {} by {:?}", transport.bot_info().channel, delay);
        tokio::time::sleep(delay).await;
    }

    for line in reply.lines() {
        if let Err(e) = transport.send_message(line).await {
            tracing::warn!("Dropping reply: {}", e);
            return;
        }
    }
}
