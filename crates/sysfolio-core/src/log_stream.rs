//! Simulated live log stream for a service.
//!
//! Seeded with a service's canned logs, the stream occasionally appends a new
//! entry on each tick and keeps only the most recent `capacity` entries.

use std::collections::VecDeque;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::service::{LogType, ServiceLog};

/// Default number of entries retained.
pub const DEFAULT_CAPACITY: usize = 500;
/// A tick emits a new entry when a uniform draw exceeds this value.
pub const EMIT_THRESHOLD: f64 = 0.7;

const INFO_MESSAGES: [&str; 10] = [
    "Service initialized successfully",
    "Connection pool established",
    "Cache refreshed",
    "Background task completed",
    "Metrics snapshot captured",
    "Health check passed",
    "Config loaded from environment",
    "Scheduled job started",
    "Worker process spawned",
    "Memory usage optimized",
];

const REQ_MESSAGES: [&str; 10] = [
    "GET /api/users",
    "POST /api/auth/login",
    "PUT /api/items/1234",
    "DELETE /api/sessions/abc123",
    "GET /api/status",
    "POST /api/uploads",
    "GET /api/metrics",
    "PATCH /api/profiles/user123",
    "OPTIONS /api/permissions",
    "HEAD /api/heartbeat",
];

const RES_MESSAGES: [&str; 10] = [
    "200 OK - Response time: 42ms",
    "201 Created - User registered successfully",
    "204 No Content - Resource deleted",
    "206 Partial Content - Streaming initiated",
    "304 Not Modified - Using cached data",
    "400 Bad Request - Invalid parameters",
    "401 Unauthorized - Authentication required",
    "403 Forbidden - Insufficient permissions",
    "404 Not Found - Resource unavailable",
    "500 Internal Server Error - Database connection failed",
];

const WARN_MESSAGES: [&str; 10] = [
    "High memory usage detected (78%)",
    "Slow query executed (342ms)",
    "Rate limit approaching (85/100)",
    "Deprecated API call detected",
    "Connection retries increasing",
    "Cache hit ratio dropping (65%)",
    "Unusual traffic pattern detected",
    "Background task taking longer than expected",
    "Stale configuration detected",
    "Resource pool near capacity",
];

const ERROR_MESSAGES: [&str; 10] = [
    "Database connection failed after 5 retries",
    "Uncaught exception in request handler",
    "API rate limit exceeded",
    "Authentication service unreachable",
    "File system permission denied",
    "Memory limit exceeded",
    "Deadlock detected in transaction",
    "TLS handshake failed with remote service",
    "Invalid state in message processor",
    "Critical security constraint violation",
];

fn messages(log_type: LogType) -> &'static [&'static str] {
    match log_type {
        LogType::Info => &INFO_MESSAGES,
        LogType::Req => &REQ_MESSAGES,
        LogType::Res => &RES_MESSAGES,
        LogType::Warn => &WARN_MESSAGES,
        LogType::Error => &ERROR_MESSAGES,
    }
}

/// Picks a log type from a uniform draw in `[0, 1)`.
///
/// Cumulative weights: info 0.45, req 0.65, res 0.85, warn 0.95, error 1.0.
pub fn log_type_for(draw: f64) -> LogType {
    if draw < 0.45 {
        LogType::Info
    } else if draw < 0.65 {
        LogType::Req
    } else if draw < 0.85 {
        LogType::Res
    } else if draw < 0.95 {
        LogType::Warn
    } else {
        LogType::Error
    }
}

/// Which entries a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFilter {
    #[default]
    All,
    Only(LogType),
}

impl LogFilter {
    pub fn matches(&self, log: &ServiceLog) -> bool {
        match self {
            Self::All => true,
            Self::Only(log_type) => log.log_type == *log_type,
        }
    }
}

impl FromStr for LogFilter {
    type Err = crate::error::FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        LogType::from_str(s)
            .map(Self::Only)
            .map_err(|_| crate::error::FolioError::invalid_input(format!("unknown log filter '{s}'")))
    }
}

/// Per-type entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogCounts {
    pub info: usize,
    pub req: usize,
    pub res: usize,
    pub warn: usize,
    pub error: usize,
}

impl LogCounts {
    pub fn get(&self, log_type: LogType) -> usize {
        match log_type {
            LogType::Info => self.info,
            LogType::Req => self.req,
            LogType::Res => self.res,
            LogType::Warn => self.warn,
            LogType::Error => self.error,
        }
    }

    pub fn total(&self) -> usize {
        LogType::iter().map(|t| self.get(t)).sum()
    }
}

/// Bounded, append-only simulated log stream.
#[derive(Debug, Clone)]
pub struct LogStream {
    entries: VecDeque<ServiceLog>,
    capacity: usize,
    paused: bool,
}

impl LogStream {
    /// Creates a stream seeded with `initial`, keeping at most `capacity` entries.
    pub fn new(initial: impl IntoIterator<Item = ServiceLog>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut stream = Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            paused: false,
        };
        for log in initial {
            stream.push(log);
        }
        stream
    }

    fn push(&mut self, log: ServiceLog) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(log);
    }

    /// Applies one tick; returns the new entry if one was emitted.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Local>) -> Option<&ServiceLog> {
        if self.paused || rng.r#gen::<f64>() <= EMIT_THRESHOLD {
            return None;
        }
        let log_type = log_type_for(rng.r#gen::<f64>());
        let pool = messages(log_type);
        let message = pool[rng.gen_range(0..pool.len())];
        self.push(ServiceLog::new(log_type, message, now));
        self.entries.back()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn entries(&self) -> &VecDeque<ServiceLog> {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries passing `filter` whose message or type label contains `search`
    /// (case-insensitive). An empty search matches everything.
    pub fn filtered(&self, filter: LogFilter, search: &str) -> Vec<&ServiceLog> {
        self.entries
            .iter()
            .filter(|log| matches(log, filter, search))
            .collect()
    }

    pub fn counts(&self) -> LogCounts {
        let mut counts = LogCounts::default();
        for log in &self.entries {
            match log.log_type {
                LogType::Info => counts.info += 1,
                LogType::Req => counts.req += 1,
                LogType::Res => counts.res += 1,
                LogType::Warn => counts.warn += 1,
                LogType::Error => counts.error += 1,
            }
        }
        counts
    }
}

/// Whether `log` passes `filter` and its message or type label contains
/// `search`, ignoring case. An empty search matches everything.
pub fn matches(log: &ServiceLog, filter: LogFilter, search: &str) -> bool {
    if !filter.matches(log) {
        return false;
    }
    let needle = search.to_lowercase();
    needle.is_empty()
        || log.message.to_lowercase().contains(&needle)
        || log.log_type.as_ref().contains(needle.as_str())
}

/// Renders entries one per line as `[HH:MM:SS] [TYPE] message`.
pub fn render<'a>(entries: impl IntoIterator<Item = &'a ServiceLog>) -> String {
    entries
        .into_iter()
        .map(ServiceLog::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name used when exporting a service's logs, e.g.
/// `api-gateway-logs-2024-03-01.log`.
pub fn export_file_name(service_name: &str, date: NaiveDate) -> String {
    let slug = service_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("{}-logs-{}.log", slug, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn log(log_type: LogType, message: &str) -> ServiceLog {
        ServiceLog::new(log_type, message, Local::now())
    }

    #[test]
    fn test_log_type_weights() {
        assert_eq!(log_type_for(0.0), LogType::Info);
        assert_eq!(log_type_for(0.45), LogType::Req);
        assert_eq!(log_type_for(0.7), LogType::Res);
        assert_eq!(log_type_for(0.9), LogType::Warn);
        assert_eq!(log_type_for(0.99), LogType::Error);
    }

    #[test]
    fn test_stream_is_bounded() {
        let mut stream = LogStream::new(Vec::new(), 8);
        let mut rng = StdRng::seed_from_u64(10);
        let mut emitted = 0;
        for _ in 0..500 {
            if stream.tick(&mut rng, Local::now()).is_some() {
                emitted += 1;
            }
            assert!(stream.entries().len() <= 8);
        }
        assert!(emitted > 50, "roughly 30% of ticks should emit, got {emitted}");
        assert!(emitted < 250);
        assert_eq!(stream.entries().len(), 8);
    }

    #[test]
    fn test_paused_stream_emits_nothing() {
        let mut stream = LogStream::new(vec![log(LogType::Info, "boot")], DEFAULT_CAPACITY);
        stream.pause();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert!(stream.tick(&mut rng, Local::now()).is_none());
        }
        assert_eq!(stream.entries().len(), 1);
        stream.resume();
        assert!(!stream.is_paused());
    }

    #[test]
    fn test_filter_and_search() {
        let stream = LogStream::new(
            vec![
                log(LogType::Info, "Cache refreshed"),
                log(LogType::Warn, "Cache hit ratio dropping (65%)"),
                log(LogType::Error, "Memory limit exceeded"),
                log(LogType::Req, "GET /api/status"),
            ],
            DEFAULT_CAPACITY,
        );

        assert_eq!(stream.filtered(LogFilter::All, "").len(), 4);
        assert_eq!(stream.filtered(LogFilter::All, "CACHE").len(), 2);
        assert_eq!(stream.filtered(LogFilter::Only(LogType::Warn), "cache").len(), 1);
        assert_eq!(stream.filtered(LogFilter::All, "error").len(), 1);
        assert_eq!(stream.filtered(LogFilter::Only(LogType::Res), "").len(), 0);

        let counts = stream.counts();
        assert_eq!(counts.info, 1);
        assert_eq!(counts.res, 0);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_single_entry_match() {
        let warn = log(LogType::Warn, "Slow query executed (342ms)");
        assert!(matches(&warn, LogFilter::All, ""));
        assert!(matches(&warn, LogFilter::Only(LogType::Warn), "SLOW"));
        assert!(matches(&warn, LogFilter::All, "WaRn"));
        assert!(!matches(&warn, LogFilter::Only(LogType::Error), ""));
        assert!(!matches(&warn, LogFilter::All, "deadlock"));
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(LogFilter::from_str("all").unwrap(), LogFilter::All);
        assert_eq!(LogFilter::from_str("warn").unwrap(), LogFilter::Only(LogType::Warn));
        assert!(LogFilter::from_str("debug").is_err());
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            export_file_name("Cache  Service", date),
            "cache-service-logs-2024-03-01.log"
        );
    }
}
