// src/config/mod.rs
pub mod crawler;

pub use crawler::{AppConfig, Mode};
