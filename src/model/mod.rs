// src/model/mod.rs

pub mod adapters;
pub mod bids;
pub mod ext;
pub mod placements;

pub use adapters::{Bidder, ExtraRequestInfo, RequestData, ResponseData};
pub use bids::{BidType, BidderResponse, TypedBid};
