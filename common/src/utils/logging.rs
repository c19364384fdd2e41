use chrono::{DateTime, Local};
use colored::*;
use std::fmt::Display;

pub use crate::{alert_entry, critical_entry, debug_entry, emergency_entry, error_entry, information_entry, notice_entry, warning_entry};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Information,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    pub fn to_plain_string(&self) -> String {
        match self {
            LogLevel::Debug => "Debug      ".to_string(),
            LogLevel::Information => "Information".to_string(),
            LogLevel::Notice => "Notice     ".to_string(),
            LogLevel::Warning => "Warning    ".to_string(),
            LogLevel::Error => "Error      ".to_string(),
            LogLevel::Critical => "Critical   ".to_string(),
            LogLevel::Alert => "Alert      ".to_string(),
            LogLevel::Emergency => "Emergency  ".to_string(),
        }
    }

    pub fn to_colored_string(&self) -> ColoredString {
        match self {
            LogLevel::Debug => "Debug      ".to_string().bright_black(),
            LogLevel::Information => "Information".to_string().bright_blue(),
            LogLevel::Notice => "Notice     ".to_string().bright_green(),
            LogLevel::Warning => "Warning    ".to_string().yellow(),
            LogLevel::Error => "Error      ".to_string().bright_red(),
            LogLevel::Critical => "Critical   ".to_string().bright_yellow(),
            LogLevel::Alert => "Alert      ".to_string().red(),
            LogLevel::Emergency => "Emergency  ".to_string().magenta(),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub position: String,
    pub message: String,
    pub debug_info: String,
}

impl LogEntry {
    pub fn new<T: Into<String>, U: Into<String>, V: Into<String>>(level: LogLevel, position: T, message: U, debug_info: V) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            position: position.into(),
            message: message.into(),
            debug_info: debug_info.into(),
        }
    }

    pub fn to_plain_string(&self) -> String {
        let level = self.level.to_plain_string();
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S");
        if self.debug_info.is_empty() {
            format!("[{}] {} {}: {}", level, timestamp, self.position, self.message)
        } else {
            format!("[{}] {} {}: {}\n{}", level, timestamp, self.position, self.message, self.debug_info)
        }
    }

    pub fn to_colored_string(&self) -> String {
        let level = self.level.to_colored_string();
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S");
        let position = self.position.cyan();
        let message = self.message.white();
        if self.debug_info.is_empty() {
            format!("[{}] {} {}: {}", level, timestamp, position, message)
        } else {
            let debug_info = self.debug_info.bright_black();
            format!("[{}] {} {}: {}\n{}", level, timestamp, position, message, debug_info)
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[macro_export]
macro_rules! debug_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Debug, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Debug, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[macro_export]
macro_rules! information_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Information, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Information, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[macro_export]
macro_rules! notice_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[macro_export]
macro_rules! warning_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[macro_export]
macro_rules! error_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Error, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Error, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[macro_export]
macro_rules! critical_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[macro_export]
macro_rules! alert_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Alert, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Alert, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[macro_export]
macro_rules! emergency_entry {
    ($message:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, "")
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, $debug_info)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string_omits_empty_debug_info() {
        let entry = LogEntry::new(LogLevel::Warning, "detector", "No detections", "");
        let text = entry.to_plain_string();
        assert!(text.starts_with("[Warning    ]"));
        assert!(text.ends_with("detector: No detections"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn plain_string_appends_debug_info_on_new_line() {
        let entry = LogEntry::new(LogLevel::Error, "search", "Request failed", "timeout");
        assert!(entry.to_plain_string().ends_with("search: Request failed\ntimeout"));
    }

    #[test]
    fn entry_macro_records_call_site() {
        let entry = warning_entry!("Low confidence");
        assert_eq!(entry.level, LogLevel::Warning);
        assert!(entry.position.contains("logging.rs"));
        assert_eq!(entry.message, "Low confidence");
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Information);
        assert!(LogLevel::Error < LogLevel::Emergency);
    }
}
