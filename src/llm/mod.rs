//! LLM provider layer
//!
//! Provider trait, implementations, model routing, and reply parsing.

pub mod provider;
pub mod providers;
pub mod response;
pub mod router;
