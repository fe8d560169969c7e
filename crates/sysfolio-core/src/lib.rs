//! Core of the sysfolio portfolio simulator.
//!
//! Two stateful pieces live here: the scripted [`terminal::Terminal`], which
//! maps input lines to canned output over a read-only
//! [`service::ServiceDirectory`], and the [`telemetry::LoadTestSession`],
//! which synthesizes metrics once per tick. Both take an injected random
//! source and are advanced by direct calls, so tests drive them without
//! timers.

pub mod config;
pub mod error;
pub mod log_stream;
pub mod service;
pub mod telemetry;
pub mod terminal;

// Re-export common error type
pub use error::{FolioError, Result};

pub use config::SysfolioConfig;
pub use service::{Service, ServiceDirectory, ServiceStatus};
pub use telemetry::{LoadTestConfig, LoadTestSession};
pub use terminal::{CommandRecord, Execution, Terminal};
