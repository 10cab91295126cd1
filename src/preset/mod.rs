//! Presets: reusable collections of settings
//!
//! - **codec**: preset JSON encode and lenient/strict decode
//! - **builtin**: the shipped preset catalogue

pub mod builtin;
pub mod codec;

pub use codec::{decode, decode_strict, encode};
