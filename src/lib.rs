// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod logging;
pub mod utils;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

pub use config::GameConfig;
pub use controller::{FrameReport, Game};
pub use model::GameOutcome;
