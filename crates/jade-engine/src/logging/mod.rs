//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; the backend is `env_logger`, installed once by the executable.

mod init;

pub use init::{init_logging, LoggingConfig};
