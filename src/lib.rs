//! Brew log viewer: load brews, filter them, and find the rating sweet spot
//! on brew ratio or brew time.

pub mod analysis;
pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
