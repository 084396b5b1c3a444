// src/bidding/mod.rs

pub mod unicorn;

pub use unicorn::{builder, UnicornAdapter};
