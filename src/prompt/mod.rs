//! Prompt assembly
//!
//! One builder per analysis kind. Each embeds the fetched upstream data and
//! instructs the model to answer with a single JSON object of a fixed shape.

pub mod fixture;
pub mod market;
pub mod odds;
