//! imgmeta infrastructure library
//!
//! Shared plumbing for the HTTP service:
//! - Telemetry initialization (tracing-subscriber, text or JSON output)
//! - Middleware (request ID, security headers)

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeadersConfig, REQUEST_ID_HEADER,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, LogFormat};
