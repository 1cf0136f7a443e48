//! Upload intake.
//!
//! This module handles the intake of uploaded media into the postflow
//! system. Incoming uploads are validated against a policy (size, media
//! type) and turned into `NewContent` records ready for the store:
//!
//! ```text
//! Upload (declared facts) → UploadPolicy::accept → NewContent → store
//! ```
//!
//! The HTTP surface that receives the bytes is out of scope; intake works
//! on the declared facts alone.

pub mod upload;

// Re-export key types
pub use upload::{media_type_for_extension, Upload, UploadError, UploadPolicy};
