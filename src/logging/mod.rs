// src/logging/mod.rs

pub mod logger;
