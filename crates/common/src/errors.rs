use std::path::PathBuf;
use thiserror::Error;

/// Основная иерархия ошибок для benchplot
///
/// Все варианты фатальны для запуска: повторов и частичного вывода нет.
#[derive(Error, Debug)]
pub enum ReportError {
    // === Входные данные ===
    #[error("Report file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("Invalid {field} value: {value:?} is not a number")]
    Format { field: &'static str, value: String },

    // === Вывод ===
    #[error("Render error: {0}")]
    Render(String),

    // === Общие ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn parse(line: u64, reason: impl Into<String>) -> Self {
        ReportError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub fn format(field: &'static str, value: impl Into<String>) -> Self {
        ReportError::Format {
            field,
            value: value.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ReportError::NotFound(_) => "NOT_FOUND",
            ReportError::Parse { .. } => "PARSE_ERROR",
            ReportError::Format { .. } => "FORMAT_ERROR",
            ReportError::Render(_) => "RENDER_ERROR",
            ReportError::Config(_) => "CONFIG_ERROR",
            ReportError::Io(_) => "IO_ERROR",
        }
    }

    /// Код завершения процесса для CLI (2 занят ошибками использования clap)
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::NotFound(_) => 3,
            ReportError::Parse { .. } | ReportError::Format { .. } => 4,
            ReportError::Config(_) => 5,
            ReportError::Render(_) | ReportError::Io(_) => 1,
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => ReportError::Io(io),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => ReportError::parse(
                line,
                format!("expected {expected_len} fields, found {len}"),
            ),
            csv::ErrorKind::Utf8 { err, .. } => ReportError::parse(line, err.to_string()),
            other => ReportError::parse(line, format!("{other:?}")),
        }
    }
}

/// Result type alias для удобства
pub type ReportResult<T> = Result<T, ReportError>;
