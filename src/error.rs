//! Error types and result handling for kafka-publish.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate. Every variant maps to
//! exit code 1 at the CLI driver; the variant only determines the message
//! printed to standard error.

use thiserror::Error;

/// The main error type for kafka-publish operations.
///
/// This enum represents all possible errors on the path from configuration
/// loading to delivery confirmation.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be read or is malformed
    /// properties-format text.
    #[error("configuration error: {0}")]
    Config(String),

    /// The Kafka client rejected a configuration option from the
    /// properties file.
    #[error("invalid configuration option {key:?}: {reason}")]
    ConfigOption {
        /// The offending property key, exactly as it appeared in the file
        key: String,
        /// The client's description of why the option was rejected
        reason: String,
    },

    /// Kafka client error not tied to a single configuration option.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// JSON serialization error when encoding the message payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The message could not be enqueued for delivery, typically because
    /// the producer's send queue is full or the client is shut down.
    #[error("failed to enqueue message: {0}")]
    Submit(rdkafka::error::KafkaError),

    /// The broker reported a delivery failure for the submitted message.
    #[error("delivery failed: {0}")]
    Delivery(rdkafka::error::KafkaError),

    /// No delivery outcome arrived within the flush deadline.
    #[error("no delivery confirmation within {timeout_ms} ms")]
    Timeout {
        /// The deadline that elapsed, in milliseconds
        timeout_ms: u64,
    },
}

/// A convenient Result type alias for kafka-publish operations.
pub type Result<T> = std::result::Result<T, Error>;
