//! Process lifecycle for one service role.
//!
//! # Data Flow
//! ```text
//! startup.rs:
//!     CLI options → config file or defaults → role/bind overrides → validate
//!     → logging + optional Prometheus listener → optional watcher → bind → serve
//!
//! signals.rs + shutdown.rs:
//!     Ctrl+C / SIGTERM → Shutdown::trigger → axum graceful shutdown
//! ```
//!
//! # Design Decisions
//! - An invalid configuration at startup is fatal; an invalid reload is not
//! - The listener binds after everything else is ready

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, StartupError, StartupOptions};
