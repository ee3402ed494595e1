//! Core module - Engine configuration and its error type
//!
//! # Contents
//!
//! - [`GameSettings`] - Rule limits and the default promotion piece
//! - [`load_settings`] / [`save_settings`] - JSON persistence for settings
//! - [`CoreError`] - Failures while reading or writing settings

pub mod error;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use settings::{load_settings, read_settings, save_settings, GameSettings};
