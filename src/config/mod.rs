//! Configuration management
//!
//! - **settings**: editor settings persisted as JSON between runs

pub mod settings;

pub use settings::Settings;
