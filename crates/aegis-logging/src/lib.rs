pub mod sanitize;
pub mod structured;
pub mod subscriber;

pub use sanitize::{is_sensitive_field, redact_fields, REDACTED};
pub use structured::{LogEntry, LogEntryBuilder, LogLevel};
pub use subscriber::{init, LoggingConfig};
