//! The read-only service directory the interpreter and telemetry read from.
//!
//! The directory is built once per session, either from the canned service
//! list or from a TOML file, and is never mutated afterwards.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Local};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::debug;

use super::model::{LogType, Service, ServiceLog, ServiceStat, ServiceStatus};
use crate::error::{FolioError, Result};

/// Number of log entries generated for each canned service.
pub const CANNED_LOGS_PER_SERVICE: usize = 10;

/// On-disk shape of a directory file (`[[service]]` tables).
#[derive(Debug, Default, Serialize, Deserialize)]
struct DirectoryFile {
    #[serde(rename = "service", default)]
    services: Vec<Service>,
}

/// Ordered, read-only list of simulated services.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceDirectory {
    services: Vec<Service>,
}

impl ServiceDirectory {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// Builds the six canned services, generating their logs from `rng`
    /// relative to `now`.
    pub fn canned<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Local>) -> Self {
        let rows: [(&str, &str, ServiceStatus, &str, &str, u16, [(&str, &str); 4]); 6] = [
            (
                "auth-service",
                "Authentication Service",
                ServiceStatus::Online,
                "7d 12h 45m",
                "Authentication",
                9000,
                [
                    ("Avg. Response Time", "28ms"),
                    ("Success Rate", "99.98%"),
                    ("Requests/sec", "458"),
                    ("Active Sessions", "24,582"),
                ],
            ),
            (
                "data-processor",
                "Data Processing Service",
                ServiceStatus::Online,
                "12d 5h 12m",
                "DataProcessing",
                9001,
                [
                    ("Avg. Processing Time", "125ms"),
                    ("Queue Size", "42"),
                    ("Jobs/hour", "3,854"),
                    ("Worker Utilization", "76%"),
                ],
            ),
            (
                "api-gateway",
                "API Gateway",
                ServiceStatus::Online,
                "30d 8h 22m",
                "Gateway",
                8080,
                [
                    ("Avg. Response Time", "18ms"),
                    ("Success Rate", "99.95%"),
                    ("Requests/sec", "1,245"),
                    ("Cached Responses", "68%"),
                ],
            ),
            (
                "cache-service",
                "Cache Service",
                ServiceStatus::Warning,
                "15d 3h 50m",
                "Cache",
                6379,
                [
                    ("Hit Rate", "85%"),
                    ("Memory Usage", "78%"),
                    ("Evictions/min", "24"),
                    ("Avg. Lookup Time", "2ms"),
                ],
            ),
            (
                "search-engine",
                "Search Engine",
                ServiceStatus::Online,
                "6d 18h 10m",
                "Search",
                9200,
                [
                    ("Avg. Query Time", "72ms"),
                    ("Index Size", "8.2GB"),
                    ("Queries/min", "523"),
                    ("Indexing Latency", "4s"),
                ],
            ),
            (
                "notif-service",
                "Notification Service",
                ServiceStatus::Error,
                "0d 1h 15m",
                "Notification",
                8086,
                [
                    ("Queue Size", "1,280+"),
                    ("Delivery Rate", "0%"),
                    ("Retry Count", "5/5"),
                    ("Last Error", "Connection refused"),
                ],
            ),
        ];

        let services = rows
            .into_iter()
            .map(|(id, name, status, uptime, family, port, stats)| Service {
                id: id.to_string(),
                name: name.to_string(),
                status,
                uptime: uptime.to_string(),
                logs: generate_service_logs(rng, family, now),
                stats: stats
                    .iter()
                    .map(|(label, value)| ServiceStat::new(*label, *value))
                    .collect(),
                port,
            })
            .collect();

        Self { services }
    }

    /// Canned directory with logs drawn from the thread RNG at the current time.
    pub fn canned_now() -> Self {
        Self::canned(&mut rand::thread_rng(), Local::now())
    }

    /// Loads a directory from a TOML file of `[[service]]` tables.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FolioError::io(format!(
                "Failed to read service directory at {}: {}",
                path.display(),
                e
            ))
        })?;
        let file: DirectoryFile = toml::from_str(&content)?;
        debug!(path = %path.display(), count = file.services.len(), "loaded service directory");
        Ok(Self {
            services: file.services,
        })
    }

    /// Serializes the directory into the format read by [`ServiceDirectory::load_from`].
    pub fn to_toml_string(&self) -> Result<String> {
        let file = DirectoryFile {
            services: self.services.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Looks up a service by exact id.
    pub fn find(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Like [`ServiceDirectory::find`], but a miss is a `NotFound` error.
    pub fn get(&self, id: &str) -> Result<&Service> {
        self.find(id).ok_or_else(|| FolioError::not_found("service", id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn count_by_status(&self, status: ServiceStatus) -> usize {
        self.services.iter().filter(|s| s.status == status).count()
    }
}

/// Generates canned logs from the past hour for a service family, newest first.
pub fn generate_service_logs<R: Rng + ?Sized>(
    rng: &mut R,
    family: &str,
    now: DateTime<Local>,
) -> Vec<ServiceLog> {
    let types: Vec<LogType> = LogType::iter().collect();
    let path = family.to_lowercase();

    let mut logs: Vec<ServiceLog> = (0..CANNED_LOGS_PER_SERVICE)
        .map(|_| {
            let offset_ms = rng.gen_range(0..60 * 60 * 1000);
            let at = now - Duration::milliseconds(offset_ms);
            let log_type = *types.choose(rng).unwrap_or(&LogType::Info);

            let candidates: Vec<String> = match log_type {
                LogType::Info => vec![
                    format!("{family} service initialized"),
                    "Configuration loaded successfully".to_string(),
                    "Connected to database".to_string(),
                    format!("{family} worker pool started with 8 threads"),
                    "Health check passed".to_string(),
                ],
                LogType::Req => vec![
                    format!("Received request GET /api/v1/{path}/status"),
                    format!("Received request POST /api/v1/{path}/process"),
                    format!("Received request PUT /api/v1/{path}/config"),
                    format!("Received request DELETE /api/v1/{path}/cache"),
                ],
                LogType::Res => vec![
                    "Response sent: 200 OK (15ms)".to_string(),
                    "Response sent: 201 Created (42ms)".to_string(),
                    "Response sent: 204 No Content (8ms)".to_string(),
                    "Response sent: 304 Not Modified (5ms)".to_string(),
                ],
                LogType::Warn => vec![
                    "High memory usage detected (82%)".to_string(),
                    "Slow database query (325ms)".to_string(),
                    "Rate limit approaching for client 192.168.1.42".to_string(),
                    "Connection pool nearing capacity".to_string(),
                ],
                LogType::Error => vec![
                    "Failed to connect to cache server".to_string(),
                    "Database query timeout after 5000ms".to_string(),
                    "Invalid JSON in request body".to_string(),
                    "Unauthorized access attempt from 203.0.113.42".to_string(),
                ],
            };
            let index = rng.gen_range(0..candidates.len());
            ServiceLog::new(log_type, candidates[index].clone(), at)
        })
        .collect();

    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs
}
