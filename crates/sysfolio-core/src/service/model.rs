//! Service directory domain models.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Canned health state of a simulated service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceStatus {
    Online,
    Warning,
    Error,
}

/// Category of a service log line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogType {
    Info,
    Req,
    Res,
    Warn,
    Error,
}

impl LogType {
    /// Upper-case tag used when rendering a log line (`[INFO]`, `[REQ]`, ...).
    pub fn label(self) -> String {
        self.as_ref().to_uppercase()
    }
}

/// A single canned log entry attached to a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLog {
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl ServiceLog {
    pub fn new(log_type: LogType, message: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            log_type,
            message: message.into(),
            timestamp,
        }
    }

    /// Renders the entry as `[HH:MM:SS] [TYPE] message`.
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.log_type.label(),
            self.message
        )
    }
}

/// One labelled figure from a service's stats panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStat {
    pub label: String,
    pub value: String,
}

impl ServiceStat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A simulated backend service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Lookup key used by `ping`, `deploy` and `service --logs`
    pub id: String,
    /// Display name
    pub name: String,
    pub status: ServiceStatus,
    /// Free-form uptime string, e.g. `7d 12h 45m`
    pub uptime: String,
    pub port: u16,
    #[serde(default)]
    pub stats: Vec<ServiceStat>,
    #[serde(default)]
    pub logs: Vec<ServiceLog>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_status_display_is_lowercase() {
        assert_eq!(ServiceStatus::Online.to_string(), "online");
        assert_eq!(ServiceStatus::Warning.to_string(), "warning");
        assert_eq!(ServiceStatus::from_str("error").unwrap(), ServiceStatus::Error);
    }

    #[test]
    fn test_log_type_parse_ignores_case() {
        assert_eq!(LogType::from_str("WARN").unwrap(), LogType::Warn);
        assert_eq!(LogType::Req.label(), "REQ");
    }

    #[test]
    fn test_log_render() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();
        let log = ServiceLog::new(LogType::Error, "Failed to connect to cache server", at);
        assert_eq!(log.render(), "[14:05:09] [ERROR] Failed to connect to cache server");
    }
}
