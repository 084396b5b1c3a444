// src/openrtb/mod.rs

pub mod request;
pub mod response;

pub use request::{App, BidRequest, ExtRegs, Imp, Regs, Source};
pub use response::{Bid, BidResponse, SeatBid};
