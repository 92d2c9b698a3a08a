pub mod analytics;
pub mod export;
pub mod network;
pub mod store;
