//! API data models
//!
//! This module contains the service's own request/response types plus the
//! wire shapes of every upstream surface it talks to.

pub mod api;
pub mod football;
pub mod gemini;
pub mod market;
pub mod odds;
pub mod openai;
