//! Structured console logging.

mod subscriber;

pub use subscriber::init_subscriber;
