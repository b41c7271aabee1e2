#[cfg(test)]
mod tests {
    use super::super::producer::{await_outcome, client_config_from, owned_headers};
    use super::super::*;
    use crate::message::OutboundMessage;
    use crate::Error;
    use rdkafka::error::KafkaError;
    use rdkafka::message::{Headers, OwnedMessage, Timestamp};
    use rdkafka::producer::future_producer::OwnedDeliveryResult;
    use rdkafka::types::RDKafkaErrorCode;
    use std::collections::HashMap;
    use std::time::Duration;

    // The outcome shape seen by `await_outcome`: the outer layer is the
    // report channel, the inner layer the broker's verdict.
    type Outcome = Result<OwnedDeliveryResult, ()>;

    fn create_test_options() -> HashMap<String, String> {
        let mut options = HashMap::new();
        options.insert("bootstrap.servers".to_string(), "localhost:9092".to_string());
        options.insert("message.timeout.ms".to_string(), "5000".to_string());
        options
    }

    #[test]
    fn test_client_config_passes_options_verbatim() {
        let options = create_test_options();
        let config = client_config_from(&options);

        assert_eq!(config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(config.get("message.timeout.ms"), Some("5000"));
    }

    #[test]
    fn test_unknown_option_is_rejected_before_any_network_activity() {
        let mut options = create_test_options();
        options.insert("no.such.option".to_string(), "1".to_string());

        match KafkaPublisher::new(&options) {
            Err(Error::ConfigOption { key, .. }) => assert_eq!(key, "no.such.option"),
            other => panic!("expected ConfigOption error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_header_conversion_preserves_order_and_duplicates() {
        let headers = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "3".to_string()),
        ];

        let owned = owned_headers(&headers).unwrap();
        assert_eq!(owned.count(), 3);

        let first = owned.get(0);
        assert_eq!(first.key, "a");
        assert_eq!(first.value, Some(b"1".as_slice()));

        let last = owned.get(2);
        assert_eq!(last.key, "a");
        assert_eq!(last.value, Some(b"3".as_slice()));
    }

    #[test]
    fn test_no_headers_means_none() {
        assert!(owned_headers(&[]).is_none());
    }

    #[tokio::test]
    async fn test_wait_maps_successful_outcome() {
        let outcome: Outcome = Ok(Ok((3, 42)));
        let delivery = await_outcome(std::future::ready(outcome), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            delivery,
            Delivery {
                partition: 3,
                offset: 42
            }
        );
    }

    #[tokio::test]
    async fn test_wait_maps_broker_failure() {
        let message = OwnedMessage::new(
            None,
            None,
            "events".to_string(),
            Timestamp::NotAvailable,
            -1,
            -1,
            None,
        );
        let outcome: Outcome = Ok(Err((
            KafkaError::MessageProduction(RDKafkaErrorCode::UnknownTopicOrPartition),
            message,
        )));

        let err = await_outcome(std::future::ready(outcome), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
    }

    #[tokio::test]
    async fn test_wait_reports_dropped_client_as_canceled_delivery() {
        let outcome: Outcome = Err(());
        let err = await_outcome(std::future::ready(outcome), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Delivery(KafkaError::Canceled)));
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let err = await_outcome(std::future::pending::<Outcome>(), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { timeout_ms: 20 }));
    }

    #[tokio::test]
    #[ignore] // May fail if system has specific network configurations
    async fn test_publisher_creation() {
        let options = create_test_options();
        let result = KafkaPublisher::new(&options);

        // Should succeed even if Kafka is not running (just creates the client)
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires running Kafka
    async fn test_submit_and_wait() {
        let options = create_test_options();
        let publisher = KafkaPublisher::new(&options).unwrap();

        let message =
            OutboundMessage::build("test-topic", "hello", Some("k1"), Some("a=1")).unwrap();
        let handle = publisher.submit(&message).unwrap();

        let delivery = handle
            .wait(std::time::Duration::from_secs(15))
            .await
            .unwrap();
        assert!(delivery.offset >= 0);
    }
}
