//! Simulated services: canned status, stats and logs.

pub mod directory;
pub mod model;

pub use directory::{generate_service_logs, ServiceDirectory};
pub use model::{LogType, Service, ServiceLog, ServiceStat, ServiceStatus};
