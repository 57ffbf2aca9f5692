//! # Formats Module
//!
//! Decoding of the files the promoter reads from disk.

mod model_info;

pub use model_info::*;
