//! Clients for upstream data APIs

pub mod artemis;

pub use artemis::ArtemisClient;
