//! In-process publish/subscribe hub standing in for the hosted real-time
//! messaging provider.
//!
//! Each channel is a `tokio::sync::broadcast` sender created on first use
//! and dropped once its last subscription ends. Payloads travel as JSON so
//! every subscriber decodes its own copy, the same way messages arrive from
//! a hosted provider.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::{
    domain::message::{ConnectionId, Message},
    usecases::contracts::{MessageTransport, TransportError, TransportSubscription},
};

const HUB_CHANNEL_CAPACITY: usize = 256;
const SUBSCRIPTION_BUFFER: usize = 64;
const HUB_SUBSCRIBER_LAGGED: &str = "HUB_SUBSCRIBER_LAGGED";
const HUB_PAYLOAD_DECODE_FAILED: &str = "HUB_PAYLOAD_DECODE_FAILED";

/// One published event as seen by subscribers.
#[derive(Debug, Clone)]
struct HubEnvelope {
    name: String,
    connection_id: ConnectionId,
    data: Value,
}

#[derive(Clone, Default)]
pub struct LocalHub {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<HubEnvelope>>>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new connection with its own identity.
    pub fn connect(&self) -> LocalConnection {
        LocalConnection {
            hub: self.clone(),
            connection_id: ConnectionId::new(Uuid::new_v4().to_string()),
        }
    }

    /// Channels that currently have a sender.
    pub fn channel_count(&self) -> usize {
        self.channels().len()
    }

    fn sender(&self, channel: &str) -> Option<broadcast::Sender<HubEnvelope>> {
        self.channels().get(channel).cloned()
    }

    /// Subscribes under the map lock so a concurrent release cannot drop the
    /// sender between lookup and subscribe.
    fn receiver(&self, channel: &str) -> broadcast::Receiver<HubEnvelope> {
        self.channels()
            .entry(channel.to_owned())
            .or_insert_with(|| broadcast::channel(HUB_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    fn release(&self, channel: &str) {
        let mut channels = self.channels();
        if channels
            .get(channel)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(channel);
            tracing::trace!(channel, "hub channel released");
        }
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<String, broadcast::Sender<HubEnvelope>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LocalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalHub")
            .field("channels", &self.channel_count())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LocalConnection {
    hub: LocalHub,
    connection_id: ConnectionId,
}

#[async_trait]
impl MessageTransport for LocalConnection {
    fn connection_id(&self) -> ConnectionId {
        self.connection_id.clone()
    }

    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: &Message,
    ) -> Result<(), TransportError> {
        let data = serde_json::to_value(payload).map_err(|_| TransportError::Encode)?;
        let envelope = HubEnvelope {
            name: event.to_owned(),
            connection_id: self.connection_id.clone(),
            data,
        };

        // No subscribers is not an error: the message is simply not heard.
        if let Some(sender) = self.hub.sender(channel) {
            let _ = sender.send(envelope);
        }
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<TransportSubscription, TransportError> {
        let inbound = self.hub.receiver(channel);
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let hub = self.hub.clone();
        let channel_name = channel.to_owned();

        tokio::spawn(async move {
            forward(&channel_name, inbound, tx).await;
            hub.release(&channel_name);
        });

        Ok(TransportSubscription::new(channel, rx))
    }
}

/// Pumps hub envelopes into one subscription until either side goes away.
async fn forward(
    channel: &str,
    mut inbound: broadcast::Receiver<HubEnvelope>,
    tx: mpsc::Sender<Message>,
) {
    loop {
        tokio::select! {
            _ = tx.closed() => return,
            received = inbound.recv() => match received {
                Ok(envelope) => {
                    let Some(message) = decode(channel, envelope) else {
                        continue;
                    };
                    if tx.send(message).await.is_err() {
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        code = HUB_SUBSCRIBER_LAGGED,
                        channel,
                        skipped,
                        "subscriber fell behind; messages dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return,
            },
        }
    }
}

fn decode(channel: &str, envelope: HubEnvelope) -> Option<Message> {
    match serde_json::from_value::<Message>(envelope.data) {
        Ok(message) => Some(message),
        Err(error) => {
            tracing::warn!(
                code = HUB_PAYLOAD_DECODE_FAILED,
                channel,
                event = %envelope.name,
                from = %envelope.connection_id,
                error = %error,
                "dropping undecodable payload"
            );
            None
        }
    }
}
