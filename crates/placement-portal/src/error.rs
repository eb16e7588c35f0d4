use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::directory::DirectoryError;
use crate::workflows::drives::DriveError;
use crate::workflows::jobs::JobError;
use crate::workflows::reports::ReportError;

/// Process-level failure surfaced by the binaries.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
    #[error("drive error: {0}")]
    Drive(#[from] DriveError),
    #[error("job error: {0}")]
    Job(#[from] JobError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}
