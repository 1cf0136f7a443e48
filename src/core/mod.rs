//! Core lifecycle logic.
//!
//! This module contains:
//! - Processor: the content lifecycle manager
//! - PipelineOverview: per-owner status summary

pub mod processor;

// Re-export commonly used types
pub use processor::{wait_for_status, PipelineOverview, Processor, ProcessorConfig};
