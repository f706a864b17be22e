pub mod behavioral;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod freshness;
pub mod metrics;
pub mod protocol;
pub mod scoring;
pub mod server;
pub mod similarity;
pub mod store;
pub mod transport;
pub mod types;
