//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → auth.rs (public path? else static bearer token)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Fail closed: anything but an exact `Bearer <token>` is rejected
//! - Public paths are prefixes, checked before the header

pub mod auth;

pub use auth::{bearer_auth, is_authorized, is_public_path};
