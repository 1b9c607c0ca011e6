//! Keyword matching subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming question text
//!     → normalize.rs (lowercase, optionally fold diacritics)
//!     → table.rs (ordered rule scan)
//!     → matcher.rs (evaluate keyword conditions)
//!     → Return: payload of first matching rule, or None
//!
//! Table Compilation (at startup and on reload):
//!     RuleConfig[]
//!     → Normalize keywords with the table's mode
//!     → Compile matchers
//!     → Freeze as immutable KeywordTable
//! ```
//!
//! # Design Decisions
//! - Tables compiled once, immutable at runtime
//! - Plain substring tests, no regex
//! - Deterministic: same input always matches same rule
//! - First match wins (declaration order)

pub mod matcher;
pub mod normalize;
pub mod table;

pub use normalize::Normalization;
pub use table::{KeywordRule, KeywordTable};
