// src/config/adapter_config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AdapterError, AdapterResult};

pub const DEFAULT_CURRENCY: &str = "JPY";
/// 1 = 一价拍卖
pub const DEFAULT_AUCTION_TYPE: i32 = 1;

/// UNICORN 适配器配置，构造后不可变
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    pub endpoint: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_auction_type")]
    pub auction_type: i32,
    /// 是否改写 app.ext（旧版本适配器的行为），默认关闭
    #[serde(default)]
    pub stamp_app_ext: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_auction_type() -> i32 {
    DEFAULT_AUCTION_TYPE
}

impl AdapterConfig {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            currency: default_currency(),
            auction_type: default_auction_type(),
            stamp_app_ext: false,
        }
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn with_auction_type(mut self, auction_type: i32) -> Self {
        self.auction_type = auction_type;
        self
    }

    pub fn with_app_ext(mut self, enabled: bool) -> Self {
        self.stamp_app_ext = enabled;
        self
    }

    pub fn from_json(content: &str) -> AdapterResult<Self> {
        let config: AdapterConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> AdapterResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> AdapterResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(AdapterError::Config("endpoint must not be empty".to_string()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(AdapterError::Config(format!(
                "endpoint must be an http(s) url, got {}",
                self.endpoint
            )));
        }
        if self.currency.len() != 3 {
            return Err(AdapterError::Config(format!(
                "currency must be an ISO-4217 code, got {:?}",
                self.currency
            )));
        }
        Ok(())
    }
}
