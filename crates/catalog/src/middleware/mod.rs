//! HTTP middleware stack for the catalog.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`, capture errors and transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (propagate or mint `x-request-id`)
//! 4. Security headers (CSP, frame and sniffing protection)

pub mod request_id;
pub mod security_headers;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
