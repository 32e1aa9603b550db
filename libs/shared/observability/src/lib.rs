// [libs/shared/observability/src/lib.rs]
//! Structured logging bootstrap. One call at the top of every binary's
//! `main`; nothing downstream should touch `tracing_subscriber` directly.

use tracing_subscriber::{fmt, EnvFilter};

/// Output shape. JSON in anything that looks like production, compact and
/// human-readable everywhere else (local dev, CI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    /// `SYNC_LOG_FORMAT=json` opts in explicitly; anything else, including
    /// unset, falls back to compact.
    pub fn from_env() -> Self {
        match std::env::var("SYNC_LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Initializes the global tracing subscriber and installs a panic hook that
/// logs panics through `tracing` instead of letting them print straight to
/// stderr, so they land in the same place as everything else.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match LogFormat::from_env() {
        LogFormat::Json => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        LogFormat::Compact => {
            fmt().compact().with_env_filter(filter).with_target(false).init();
        }
    }

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));
}
