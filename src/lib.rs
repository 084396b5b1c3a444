// src/lib.rs

//! UNICORN bidder adapter.
//!
//! 把宿主的 OpenRTB BidRequest 改写成 UNICORN 需要的格式，并把 UNICORN 的
//! BidResponse 转换回宿主的带类型出价。HTTP 收发、超时、重试由宿主负责。

pub mod bidding;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod openrtb;

pub use bidding::{builder, UnicornAdapter};
pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult};
pub use model::{BidType, Bidder, BidderResponse, ExtraRequestInfo, RequestData, ResponseData, TypedBid};
