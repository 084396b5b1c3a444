// src/config/mod.rs

pub mod adapter_config;

pub use adapter_config::{AdapterConfig, DEFAULT_AUCTION_TYPE, DEFAULT_CURRENCY};
