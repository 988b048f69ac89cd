//! Technical analysis over price series

pub mod indicators;
pub mod report;
