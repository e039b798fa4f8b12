// Centralized logging for ambientcg-fetcher
// Log lines go to stderr; a plain-text copy can also be written to a debug log file

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default location of the debug log file
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("ambientcg_fetcher_debug.txt")
}

/// Create (or truncate) the debug log and write its header
fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    let mut f = std::fs::File::create(path)?;
    writeln!(f, "=== ambientcg-fetcher Debug Log ===")?;
    writeln!(f, "Log file: {:?}", path)?;
    writeln!(f, "Timestamp: {:?}", std::time::SystemTime::now())?;
    writeln!(f, "Platform: {}", std::env::consts::OS)?;
    writeln!(f, "Arch: {}", std::env::consts::ARCH)?;
    writeln!(f)?;
    Ok(f)
}

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. When `log_file` is
/// given, everything that passes the filter is also appended there.
pub fn init(log_file: Option<&Path>) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)
                .map_err(|e| format!("Failed to create debug log {:?}: {}", path, e))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))
}
