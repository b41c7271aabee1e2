pub mod config;
pub mod error;
pub mod message;

pub mod kafka;

pub use error::{Error, Result};
pub use message::OutboundMessage;
