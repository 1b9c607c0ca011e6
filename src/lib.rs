//! Mock banking agent: an orchestrator routing questions to four
//! keyword-matching responder services, plus a mutation-testing report tool.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod matching;
pub mod mutation;
pub mod observability;
pub mod orchestrator;
pub mod security;

pub use config::schema::AgentConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
