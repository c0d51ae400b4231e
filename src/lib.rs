// src/lib.rs

//! postfeed: multi-source blog content loader

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
