// src/model/bids.rs

use serde::{Deserialize, Serialize};

use crate::openrtb::response::Bid;

/// 出价的广告类型，UNICORN 只投放 banner 与 native
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    Banner,
    Native,
}

/// 带类型的出价；bid_type 为 None 表示无法归类，出价仍然保留
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypedBid {
    pub bid: Bid,
    pub bid_type: Option<BidType>,
}

/// 交还给宿主的出价集合
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BidderResponse {
    pub currency: String,
    pub bids: Vec<TypedBid>,
}

impl BidderResponse {
    /// capacity 只是容量提示
    pub fn with_bids_capacity(capacity: usize) -> Self {
        Self {
            currency: "USD".to_string(),
            bids: Vec::with_capacity(capacity),
        }
    }
}
