pub use crate::{logging_alert, logging_critical, logging_debug, logging_emergency, logging_entry, logging_error, logging_information, logging_notice, logging_warning};
pub use common::utils::log_entry::diagnosis::DiagnosisEntry;
pub use common::utils::log_entry::io::IOEntry;
pub use common::utils::log_entry::network::NetworkEntry;
pub use common::utils::log_entry::system::SystemEntry;
pub use common::utils::logging::*;
pub use common::{alert_entry, critical_entry, debug_entry, emergency_entry, error_entry, information_entry, notice_entry, warning_entry};

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use std::collections::{HashMap, VecDeque};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Request logs kept in memory; the oldest request is evicted first.
pub const MAX_REQUEST_LOGS: usize = 256;

lazy_static! {
    static ref LOGGER: RwLock<Logger> = RwLock::new(Logger::new());
}

/// Process-wide log store: one system log plus one log per diagnosis request.
pub struct Logger {
    system_log: Vec<LogEntry>,
    request_log: HashMap<Uuid, Vec<LogEntry>>,
    request_order: VecDeque<Uuid>,
    request_capacity: usize,
}

impl Logger {
    fn new() -> Self {
        let mut system_log = Vec::new();
        let log_entry = LogEntry::new(LogLevel::Information, "Logger", "Online now", "");
        system_log.push(log_entry);
        Self {
            system_log,
            request_log: HashMap::new(),
            request_order: VecDeque::new(),
            request_capacity: MAX_REQUEST_LOGS,
        }
    }

    pub async fn instance() -> RwLockReadGuard<'static, Logger> {
        LOGGER.read().await
    }

    pub async fn instance_mut() -> RwLockWriteGuard<'static, Logger> {
        LOGGER.write().await
    }

    pub async fn add_system_log<T: Into<String>, U: Into<String>, V: Into<String>>(level: LogLevel, position: T, message: U, debug_info: V) {
        let log_entry = LogEntry::new(level, position, message, debug_info);
        Self::add_system_log_entry(log_entry).await;
    }

    pub async fn add_request_log<T: Into<String>, U: Into<String>, V: Into<String>>(request_id: Uuid, level: LogLevel, position: T, message: U, debug_info: V) {
        let log_entry = LogEntry::new(level, position, message, debug_info);
        Self::add_request_log_entry(request_id, log_entry).await;
    }

    pub async fn add_system_log_entry(log_entry: LogEntry) {
        Self::logging_console(log_entry.clone());
        let mut logger = Self::instance_mut().await;
        logger.system_log.push(log_entry);
    }

    pub async fn add_request_log_entry(request_id: Uuid, log_entry: LogEntry) {
        Self::logging_console(log_entry.clone());
        Self::instance_mut().await.push_request_entry(request_id, log_entry);
    }

    fn push_request_entry(&mut self, request_id: Uuid, log_entry: LogEntry) {
        if !self.request_log.contains_key(&request_id) {
            self.request_order.push_back(request_id);
            while self.request_order.len() > self.request_capacity {
                if let Some(oldest) = self.request_order.pop_front() {
                    self.request_log.remove(&oldest);
                }
            }
        }
        self.request_log.entry(request_id).or_default().push(log_entry);
    }

    pub fn logging_console(log_entry: LogEntry) {
        println!("{}", log_entry.to_colored_string());
    }

    pub async fn get_system_logs() -> Vec<LogEntry> {
        Self::instance().await.system_log.clone()
    }

    pub async fn get_request_logs(request_id: Uuid) -> Option<Vec<LogEntry>> {
        let logger = Self::instance().await;
        logger.request_log.get(&request_id).cloned()
    }

    pub async fn get_system_logs_since(time: DateTime<Local>) -> Vec<LogEntry> {
        let logger = Self::instance().await;
        let index = logger.system_log.partition_point(|entry| entry.timestamp < time);
        logger.system_log[index..].to_vec()
    }

    pub async fn get_request_logs_since(request_id: Uuid, time: DateTime<Local>) -> Option<Vec<LogEntry>> {
        let logger = Self::instance().await;
        let logs = logger.request_log.get(&request_id)?;
        let index = logs.partition_point(|entry| entry.timestamp < time);
        Some(logs[index..].to_vec())
    }

    pub fn format_logs(logs: &[LogEntry]) -> String {
        logs.iter().map(LogEntry::to_string).collect::<Vec<_>>().join("\n")
    }
}

#[macro_export]
macro_rules! logging_debug {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Debug, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Debug, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Debug, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_information {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Information, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Information, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Information, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_notice {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_warning {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_error {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Error, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Error, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Error, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_critical {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_alert {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Alert, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Alert, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Alert, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_emergency {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
    ($uuid:expr, $message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_request_log($uuid, $crate::utils::logging::LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_entry {
    ($entry:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($entry).await
    };
    ($uuid:expr, $entry:expr) => {
        $crate::utils::logging::Logger::add_request_log_entry($uuid, $entry).await
    };
}
