//! Pinterest v5 API integration
//!
//! The client used by the publish proxy to list boards and to run the
//! register -> pre-signed upload -> create sequence.

pub mod client;
pub mod types;

pub use client::{decode_image, PinterestClient, UpstreamResponse};
pub use types::{CreatePinPayload, MediaSource, PinData, UploadSession};
