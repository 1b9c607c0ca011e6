//! Mutation-testing report subsystem.
//!
//! # Data Flow
//! ```text
//! runner.rs (init → baseline? → exec → dump, sequential)
//!     → dump file (flat JSON | paired-list JSON | NDJSON)
//!     → parse.rs (shape detection, lenient record extraction)
//!     → aggregate.rs (outcome tallies, score, survivors)
//!     → render.rs (Markdown or JSON)
//! ```
//!
//! # Design Decisions
//! - Format is detected from content, never from the file name
//! - Unreadable NDJSON lines are skipped and counted, not fatal
//! - Record fields pass through untouched

pub mod aggregate;
pub mod model;
pub mod parse;
pub mod render;
pub mod runner;

pub use aggregate::{summarize, MutationSummary, Survivor, Tally};
pub use model::{MutantRecord, Outcome};
pub use parse::{parse_dump, parse_file, DumpFormat, ParseError, ParsedDump};
pub use render::{render_json, render_markdown};
pub use runner::{MutationRunner, RunnerError, Step};
