// src/api/mod.rs
pub mod export;
pub mod search;

pub use export::*;
pub use search::*;
