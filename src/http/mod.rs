//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign / keep request ID)
//!     → server.rs (trace span, timeout, metrics)
//!     → security::auth (bearer token unless public path)
//!     → server.rs handlers (catalog answer or orchestrator forward)
//!     → response.rs (error mapping to {"detail"})
//!     → Send to client with x-request-id
//! ```

pub mod openapi;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer, Pregunta, Respuesta, TokenResponse};
