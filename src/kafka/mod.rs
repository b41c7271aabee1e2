pub mod producer;

#[cfg(test)]
mod tests;

pub use producer::{Delivery, DeliveryHandle, KafkaPublisher};
