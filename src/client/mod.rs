//! Remote processing client.
//!
//! All pixel work happens in an external service; this module owns the wire
//! shapes ([`protocol`]) and the synchronous HTTP exchange ([`http`]).

pub mod http;
pub mod protocol;

// Re-export commonly used types
pub use http::{ProcessingClient, DEFAULT_BASE_URL};
pub use protocol::{
    HealthStatus, ProcessRequest, ProcessResponse, ResultEntry, ResultKind, UploadedImage,
};
