// src/error.rs

use thiserror::Error;

/// 适配器错误类型
///
/// - `BadInput`：调用方输入有误（imp.ext / ext 解析失败、上游返回 400），本适配器退出本轮竞价，其他适配器照常进行
/// - `BadServerResponse`：上游返回非预期状态码
/// - `Serialization`：请求编码或响应解码失败，原样透传
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("{message}")]
    BadInput { message: String },

    #[error("{message}")]
    BadServerResponse { message: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdapterError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        AdapterError::BadInput { message: message.into() }
    }

    pub fn bad_server_response(message: impl Into<String>) -> Self {
        AdapterError::BadServerResponse { message: message.into() }
    }

    pub fn is_bad_input(&self) -> bool {
        matches!(self, AdapterError::BadInput { .. })
    }

    pub fn is_bad_server_response(&self) -> bool {
        matches!(self, AdapterError::BadServerResponse { .. })
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
