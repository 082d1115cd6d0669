pub mod config;
pub mod render;
pub mod summary;

pub use config::ConfigCommand;
pub use render::RenderCommand;
pub use summary::SummaryCommand;

use std::path::Path;

use anyhow::{Context, Result};
use common::OperationTimer;
use report::{load_report, ReportTable};

/// Загрузить отчёт и добавить колонку `Mean_us`
pub fn load_table(path: &Path) -> Result<ReportTable> {
    let mut timer = OperationTimer::new("load_report");
    timer.add_field("path", path.display().to_string());

    let result = load_report(path).and_then(ReportTable::normalize);
    if let Ok(table) = &result {
        timer.add_field("rows", table.len());
    }
    timer.finish_with_result(&result);

    result.with_context(|| format!("failed to load report {}", path.display()))
}
