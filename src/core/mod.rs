//! Core application modules
//!
//! This module contains configuration, constants, and logging functionality.

pub mod config;
pub mod constants;
pub mod logging;
