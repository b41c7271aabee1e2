use crate::{message::OutboundMessage, Error, Result};
use rdkafka::error::KafkaError;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::future_producer::OwnedDeliveryResult;
use rdkafka::producer::{DeliveryFuture, FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper around the rdkafka producer.
///
/// Configuration comes entirely from the properties file: every pair is
/// passed through verbatim as a client option. Submission is asynchronous;
/// the caller gets a [`DeliveryHandle`] that resolves to exactly one
/// delivery outcome, and the caller alone decides what to do with it.
pub struct KafkaPublisher {
    producer: FutureProducer,
}

/// Builds a client configuration from the raw option map.
pub(super) fn client_config_from(options: &HashMap<String, String>) -> ClientConfig {
    let mut config = ClientConfig::new();
    for (key, value) in options {
        config.set(key, value);
    }
    config
}

impl KafkaPublisher {
    /// Creates a connected producer handle from the option map.
    ///
    /// Any option rejected by librdkafka fails here, before any network
    /// activity, naming the offending key.
    pub fn new(options: &HashMap<String, String>) -> Result<Self> {
        let producer: FutureProducer =
            client_config_from(options).create().map_err(|e| match e {
                KafkaError::ClientConfig(_, reason, key, _) => {
                    Error::ConfigOption { key, reason }
                }
                other => Error::Kafka(other),
            })?;

        debug!(options = options.len(), "Kafka producer created");
        Ok(Self { producer })
    }

    /// Enqueues the message for asynchronous delivery.
    ///
    /// Returns immediately with a handle for the eventual outcome. Fails
    /// only when the message cannot be enqueued at all (full send queue,
    /// shut-down client); broker-side errors such as an unknown topic or an
    /// authorization failure surface through [`DeliveryHandle::wait`].
    pub fn submit(&self, message: &OutboundMessage) -> Result<DeliveryHandle> {
        let record = FutureRecord {
            topic: &message.topic,
            partition: None,
            payload: Some(message.value.as_slice()),
            key: message.key.as_deref(),
            timestamp: None,
            headers: owned_headers(&message.headers),
        };

        let future = self
            .producer
            .send_result(record)
            .map_err(|(e, _)| Error::Submit(e))?;

        Ok(DeliveryHandle { future })
    }
}

/// The pending delivery outcome of one submitted message.
pub struct DeliveryHandle {
    future: DeliveryFuture,
}

/// Partition assignment reported by the broker on successful delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

impl DeliveryHandle {
    /// Waits for the delivery outcome, bounded by `wait_timeout`.
    ///
    /// This is the flush step of the handshake: it blocks the calling task
    /// until the broker acknowledges or rejects the message, or the
    /// deadline elapses with the message still undelivered.
    pub async fn wait(self, wait_timeout: Duration) -> Result<Delivery> {
        await_outcome(self.future, wait_timeout).await
    }
}

/// Resolves exactly one delivery outcome, bounded by `wait_timeout`.
///
/// The outer layer is the report channel itself: if the client is dropped
/// before the outcome fires, the channel closes and the delivery is
/// reported as canceled.
pub(super) async fn await_outcome<F, E>(future: F, wait_timeout: Duration) -> Result<Delivery>
where
    F: Future<Output = std::result::Result<OwnedDeliveryResult, E>>,
{
    match tokio::time::timeout(wait_timeout, future).await {
        Ok(Ok(Ok((partition, offset)))) => Ok(Delivery { partition, offset }),
        Ok(Ok(Err((e, _)))) => Err(Error::Delivery(e)),
        Ok(Err(_)) => Err(Error::Delivery(KafkaError::Canceled)),
        Err(_) => Err(Error::Timeout {
            timeout_ms: wait_timeout.as_millis() as u64,
        }),
    }
}

pub(super) fn owned_headers(headers: &[(String, String)]) -> Option<OwnedHeaders> {
    if headers.is_empty() {
        return None;
    }

    let mut owned = OwnedHeaders::new_with_capacity(headers.len());
    for (key, value) in headers {
        owned = owned.insert(Header {
            key: key.as_str(),
            value: Some(value.as_bytes()),
        });
    }
    Some(owned)
}
