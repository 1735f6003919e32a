//! Content-addressed upload gateway.

pub mod upload;

pub use upload::{HttpUploader, Uploader};
